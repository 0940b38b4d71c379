use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::{
    format,
    key::Key,
    resource::{default_true, write_floats, Category, JsonResource},
    writer::JsonWriter,
    Error, Result,
};

/// Block or item model, `models/<path>.json`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Model {
    /// Loads a different model from the given path, in form of a resource
    /// location. If both "parent" and "elements" are set, the "elements" tag
    /// overrides the "elements" tag from the previous model.
    #[serde(default)]
    pub parent: Option<Key>,

    /// Whether to use ambient occlusion (true - default), or not (false).
    #[serde(default = "default_true", rename = "ambientocclusion")]
    pub ambient_occlusion: bool,

    /// Lighting of the model in the GUI, `side` for blocks and `front` for
    /// flat items.
    #[serde(default)]
    pub gui_light: Option<GuiLight>,

    /// Holds the different places where item models are displayed.
    #[serde(default)]
    pub display: IndexMap<String, Display>,

    /// Holds the textures of the model, in form of a resource location or can
    /// be another texture variable.
    #[serde(default)]
    pub textures: ModelTextures,

    /// Contains all the elements of the model. They can have only cubic forms.
    /// An empty list still overrides the elements of the parent.
    #[serde(default)]
    pub elements: Option<Vec<Element>>,

    #[serde(default)]
    pub overrides: Vec<ItemOverride>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            parent: None,
            ambient_occlusion: true,
            gui_light: None,
            display: IndexMap::new(),
            textures: ModelTextures::default(),
            elements: None,
            overrides: vec![],
            extra: Map::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuiLight {
    Front,
    Side,
}

impl GuiLight {
    fn name(self) -> &'static str {
        match self {
            GuiLight::Front => "front",
            GuiLight::Side => "side",
        }
    }
}

/// Texture of a model, either a resource location or a `#variable` resolved
/// against the textures of the model and its parents.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureRef {
    Key(Key),
    Variable(String),
}

impl FromStr for TextureRef {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.strip_prefix('#') {
            Some(variable) => Ok(TextureRef::Variable(variable.to_owned())),
            None => value.parse().map(TextureRef::Key),
        }
    }
}

impl fmt::Display for TextureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureRef::Key(key) => write!(f, "{key}"),
            TextureRef::Variable(variable) => write!(f, "#{variable}"),
        }
    }
}

impl From<Key> for TextureRef {
    fn from(value: Key) -> Self {
        TextureRef::Key(value)
    }
}

impl<'de> Deserialize<'de> for TextureRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

/// The `textures` object of a model. `layer0`, `layer1`, ... are generated
/// item layers, `particle` is used for particles and everything else is a
/// variable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelTextures {
    pub layers: Vec<TextureRef>,
    pub particle: Option<TextureRef>,
    pub variables: IndexMap<String, TextureRef>,
}

impl ModelTextures {
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.particle.is_none() && self.variables.is_empty()
    }

    fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        if let Some(particle) = &self.particle {
            writer.key("particle")?.string(&particle.to_string())?;
        }
        for (index, layer) in self.layers.iter().enumerate() {
            writer
                .key(&format!("layer{index}"))?
                .string(&layer.to_string())?;
        }
        for (name, texture) in self.variables.iter() {
            writer.key(name)?.string(&texture.to_string())?;
        }
        writer.end_object()?;
        Ok(())
    }
}

impl<'de> Deserialize<'de> for ModelTextures {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut variables = IndexMap::<String, TextureRef>::deserialize(deserializer)?;
        let particle = variables.shift_remove("particle");
        let mut layers = vec![];
        while let Some(layer) = variables.shift_remove(&format!("layer{}", layers.len())) {
            layers.push(layer);
        }
        Ok(Self {
            layers,
            particle,
            variables,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Display {
    /// Specifies the rotation of the model according to the scheme [x, y, z].
    #[serde(default)]
    pub rotation: [f32; 3],

    /// Specifies the position of the model according to the scheme [x, y, z].
    /// The values are clamped between -80 and 80.
    #[serde(default)]
    pub translation: [f32; 3],

    /// Specifies the scale of the model according to the scheme [x, y, z]. If
    /// the value is greater than 4, it is displayed as 4.
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            rotation: [0.0; 3],
            translation: [0.0; 3],
            scale: default_scale(),
            extra: Map::new(),
        }
    }
}

impl Display {
    fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        if self.rotation != [0.0; 3] {
            writer.key("rotation")?;
            write_floats(writer, &self.rotation)?;
        }
        if self.translation != [0.0; 3] {
            writer.key("translation")?;
            write_floats(writer, &self.translation)?;
        }
        if self.scale != default_scale() {
            writer.key("scale")?;
            write_floats(writer, &self.scale)?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Element {
    /// Start point of a cuboid according to the scheme [x, y, z]. Values must
    /// be between -16 and 32.
    pub from: [f32; 3],

    /// Stop point of a cuboid according to the scheme [x, y, z]. Values must be
    /// between -16 and 32.
    pub to: [f32; 3],

    /// Defines the rotation of an element.
    #[serde(default)]
    pub rotation: Option<ElementRotation>,

    /// Defines if shadows are rendered (true - default), not (false).
    #[serde(default = "default_true")]
    pub shade: bool,

    /// Minimum light level the element is rendered with, 0 to 15.
    #[serde(default)]
    pub light_emission: u8,

    /// Holds all the faces of the cuboid. If a face is left out, it does not
    /// render.
    #[serde(default)]
    pub faces: IndexMap<Face, ElementFace>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Element {
    fn write(&self, version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?.key("from")?;
        write_floats(writer, &self.from)?;
        writer.key("to")?;
        write_floats(writer, &self.to)?;
        if let Some(rotation) = &self.rotation {
            writer.key("rotation")?;
            rotation.write(writer)?;
        }
        if !self.shade {
            writer.key("shade")?.bool(false)?;
        }
        if self.light_emission != 0 && version >= format::ELEMENT_LIGHT_EMISSION {
            writer
                .key("light_emission")?
                .uint(self.light_emission as u64)?;
        }
        if !self.faces.is_empty() {
            writer.key("faces")?.begin_object()?;
            for (face, element_face) in self.faces.iter() {
                writer.key(face.name())?;
                element_face.write(writer)?;
            }
            writer.end_object()?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ElementRotation {
    /// Sets the center of the rotation according to the scheme [x, y, z].
    pub origin: [f32; 3],

    /// Specifies the direction of rotation, can be "x", "y" or "z".
    pub axis: Axis,

    /// Specifies the angle of rotation. Can be 45 through -45 degrees in 22.5
    /// degree increments.
    pub angle: f32,

    /// Specifies whether or not to scale the faces across the whole block. Can
    /// be true or false. Defaults to false.
    #[serde(default)]
    pub rescale: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ElementRotation {
    fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?.key("origin")?;
        write_floats(writer, &self.origin)?;
        writer
            .key("axis")?
            .string(self.axis.name())?
            .key("angle")?
            .float(self.angle)?;
        if self.rescale {
            writer.key("rescale")?.bool(true)?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Face {
    pub fn name(self) -> &'static str {
        match self {
            Face::North => "north",
            Face::South => "south",
            Face::East => "east",
            Face::West => "west",
            Face::Up => "up",
            Face::Down => "down",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ElementFace {
    /// Defines the area of the texture to use according to the scheme [x1, y1,
    /// x2, y2]. If the numbers of x1 and x2 are swapped, the texture flips. If
    /// not supplied it is generated from the element's position.
    #[serde(default)]
    pub uv: Option<[f32; 4]>,

    /// Specifies the texture in form of the texture variable prepended with a
    /// #.
    pub texture: TextureRef,

    /// Specifies whether a face does not need to be rendered when there is a
    /// block touching it in the specified position. It also determines the
    /// side of the block to use the light level from for lighting the face.
    #[serde(default)]
    pub cullface: Option<Face>,

    /// Rotates the texture by the specified number of degrees. Can be 0, 90,
    /// 180, or 270.
    #[serde(default)]
    pub rotation: u32,

    /// Tint index passed to the block and item colors, -1 disables tinting.
    #[serde(default = "default_tint_index")]
    pub tintindex: i32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ElementFace {
    fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        if let Some(uv) = &self.uv {
            writer.key("uv")?;
            write_floats(writer, uv)?;
        }
        writer.key("texture")?.string(&self.texture.to_string())?;
        if let Some(cullface) = self.cullface {
            writer.key("cullface")?.string(cullface.name())?;
        }
        if self.rotation != 0 {
            writer.key("rotation")?.uint(self.rotation as u64)?;
        }
        if self.tintindex != -1 {
            writer.key("tintindex")?.int(self.tintindex as i64)?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

/// Replaces the model of an item when every predicate is at least its value.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ItemOverride {
    pub predicate: IndexMap<String, f32>,

    pub model: Key,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemOverride {
    fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?.key("predicate")?.begin_object()?;
        for (name, value) in self.predicate.iter() {
            writer.key(name)?.float(*value)?;
        }
        writer
            .end_object()?
            .key("model")?
            .resource_key(&self.model)?
            .extra(&self.extra)?
            .end_object()?;
        Ok(())
    }
}

impl JsonResource for Model {
    const CATEGORY: Category = Category::Model;

    fn write(&self, version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        if let Some(parent) = &self.parent {
            writer.key("parent")?.resource_key(parent)?;
        }
        if !self.ambient_occlusion {
            writer.key("ambientocclusion")?.bool(false)?;
        }
        if let Some(gui_light) = self.gui_light {
            if version >= format::MODEL_GUI_LIGHT {
                writer.key("gui_light")?.string(gui_light.name())?;
            }
        }
        if !self.display.is_empty() {
            writer.key("display")?.begin_object()?;
            for (position, display) in self.display.iter() {
                writer.key(position)?;
                display.write(writer)?;
            }
            writer.end_object()?;
        }
        if !self.textures.is_empty() {
            writer.key("textures")?;
            self.textures.write(writer)?;
        }
        if let Some(elements) = &self.elements {
            writer.key("elements")?.begin_array()?;
            for element in elements {
                element.write(version, writer)?;
            }
            writer.end_array()?;
        }
        if !self.overrides.is_empty() {
            writer.key("overrides")?.begin_array()?;
            for item_override in self.overrides.iter() {
                item_override.write(writer)?;
            }
            writer.end_array()?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

fn default_scale() -> [f32; 3] {
    [1.0; 3]
}

fn default_tint_index() -> i32 {
    -1
}
