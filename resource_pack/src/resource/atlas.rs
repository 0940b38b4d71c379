use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::{
    format,
    key::Key,
    metadata::KeyPattern,
    resource::{from_fields, tagged, Category, JsonResource},
    writer::JsonWriter,
    Result,
};

/// Sprites stitched into an atlas texture, `atlases/<atlas>.json`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Atlas {
    #[serde(default)]
    pub sources: Vec<AtlasSource>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Atlas {
    pub fn new(sources: Vec<AtlasSource>) -> Self {
        Self {
            sources,
            extra: Map::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AtlasSource {
    Single(SingleSource),
    Directory(DirectorySource),
    Filter(FilterSource),
    Unstitch(UnstitchSource),
    PalettedPermutations(PalettedPermutationsSource),
    /// Source of a type this crate does not know, including its `type`.
    Unknown(Map<String, Value>),
}

impl AtlasSource {
    /// First pack format that reads this source.
    pub fn since(&self) -> u32 {
        match self {
            AtlasSource::PalettedPermutations(_) => format::ATLAS_PALETTED_PERMUTATIONS,
            _ => format::ATLAS,
        }
    }

    fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        match self {
            AtlasSource::Single(source) => {
                writer
                    .begin_object()?
                    .key("type")?
                    .string("single")?
                    .key("resource")?
                    .resource_key(&source.resource)?;
                if let Some(sprite) = &source.sprite {
                    writer.key("sprite")?.resource_key(sprite)?;
                }
                writer.extra(&source.extra)?.end_object()?;
            }
            AtlasSource::Directory(source) => {
                writer
                    .begin_object()?
                    .key("type")?
                    .string("directory")?
                    .key("source")?
                    .string(&source.source)?
                    .key("prefix")?
                    .string(&source.prefix)?
                    .extra(&source.extra)?
                    .end_object()?;
            }
            AtlasSource::Filter(source) => {
                writer
                    .begin_object()?
                    .key("type")?
                    .string("filter")?
                    .key("pattern")?;
                source.pattern.write(writer)?;
                writer.extra(&source.extra)?.end_object()?;
            }
            AtlasSource::Unstitch(source) => {
                writer
                    .begin_object()?
                    .key("type")?
                    .string("unstitch")?
                    .key("resource")?
                    .resource_key(&source.resource)?
                    .key("divisor_x")?
                    .double(source.divisor_x)?
                    .key("divisor_y")?
                    .double(source.divisor_y)?
                    .key("regions")?
                    .begin_array()?;
                for region in source.regions.iter() {
                    writer
                        .begin_object()?
                        .key("sprite")?
                        .resource_key(&region.sprite)?
                        .key("x")?
                        .double(region.x)?
                        .key("y")?
                        .double(region.y)?
                        .key("width")?
                        .double(region.width)?
                        .key("height")?
                        .double(region.height)?
                        .extra(&region.extra)?
                        .end_object()?;
                }
                writer.end_array()?.extra(&source.extra)?.end_object()?;
            }
            AtlasSource::PalettedPermutations(source) => {
                writer
                    .begin_object()?
                    .key("type")?
                    .string("paletted_permutations")?
                    .key("textures")?
                    .begin_array()?;
                for texture in source.textures.iter() {
                    writer.resource_key(texture)?;
                }
                writer
                    .end_array()?
                    .key("palette_key")?
                    .resource_key(&source.palette_key)?
                    .key("permutations")?
                    .begin_object()?;
                for (suffix, palette) in source.permutations.iter() {
                    writer.key(suffix)?.resource_key(palette)?;
                }
                writer.end_object()?.extra(&source.extra)?.end_object()?;
            }
            AtlasSource::Unknown(fields) => {
                writer.begin_object()?.extra(fields)?.end_object()?;
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for AtlasSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (kind, fields) = tagged(deserializer)?;
        Ok(match kind.as_deref() {
            Some("single") => AtlasSource::Single(from_fields(fields)?),
            Some("directory") => AtlasSource::Directory(from_fields(fields)?),
            Some("filter") => AtlasSource::Filter(from_fields(fields)?),
            Some("unstitch") => AtlasSource::Unstitch(from_fields(fields)?),
            Some("paletted_permutations") => {
                AtlasSource::PalettedPermutations(from_fields(fields)?)
            }
            _ => AtlasSource::Unknown(fields),
        })
    }
}

/// Adds a single texture, optionally under another sprite name.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SingleSource {
    pub resource: Key,

    #[serde(default)]
    pub sprite: Option<Key>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Adds every texture below a directory of `textures/`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DirectorySource {
    pub source: String,

    /// Prepended to the sprite names.
    pub prefix: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Removes sprites matching the pattern added by earlier sources.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FilterSource {
    pub pattern: KeyPattern,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cuts regions out of a texture.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UnstitchSource {
    pub resource: Key,

    #[serde(default = "default_1")]
    pub divisor_x: f64,

    #[serde(default = "default_1")]
    pub divisor_y: f64,

    #[serde(default)]
    pub regions: Vec<UnstitchRegion>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UnstitchRegion {
    pub sprite: Key,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Recolors textures once per palette, the sprites are named
/// `<texture>_<suffix>`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PalettedPermutationsSource {
    pub textures: Vec<Key>,

    pub palette_key: Key,

    pub permutations: IndexMap<String, Key>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JsonResource for Atlas {
    const CATEGORY: Category = Category::Atlas;

    fn write(&self, version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?.key("sources")?.begin_array()?;
        for source in self.sources.iter() {
            if version >= source.since() {
                source.write(writer)?;
            }
        }
        writer.end_array()?.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

fn default_1() -> f64 {
    1.0
}
