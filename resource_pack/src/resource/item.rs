use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::{
    format,
    key::Key,
    resource::{default_true, from_fields, tagged, Category, JsonResource},
    writer::JsonWriter,
    Result,
};

/// Item definition, `items/<item>.json`, decides which model an item stack
/// is rendered with.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Item {
    pub model: ItemModel,

    /// Whether the down-and-up animation plays when the item stack in the
    /// hand changes.
    #[serde(default = "default_true")]
    pub hand_animation_on_swap: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(model: ItemModel) -> Self {
        Self {
            model,
            hand_animation_on_swap: true,
            extra: Map::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ItemModel {
    Reference(ReferenceModel),
    Composite(CompositeModel),
    Condition(ConditionModel),
    Select(SelectModel),
    RangeDispatch(RangeDispatchModel),
    Empty,
    /// Model of a type this crate does not know, including its `type`.
    Unknown(Map<String, Value>),
}

/// Renders a model of `models/`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ReferenceModel {
    pub model: Key,

    /// Tint sources, one per tint index.
    #[serde(default)]
    pub tints: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Renders several models on top of each other.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CompositeModel {
    pub models: Vec<ItemModel>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Renders one of two models depending on a boolean property. Arguments of
/// the property (e.g. `component`) are kept in `extra`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ConditionModel {
    pub property: ConditionProperty,

    pub on_true: Box<ItemModel>,

    pub on_false: Box<ItemModel>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Renders the model of the case matching a property value.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SelectModel {
    pub property: Key,

    pub cases: Vec<SelectCase>,

    #[serde(default)]
    pub fallback: Option<Box<ItemModel>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SelectCase {
    /// Value or list of values of the property.
    pub when: Value,

    pub model: ItemModel,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Renders the model of the highest threshold not above a numeric property.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RangeDispatchModel {
    pub property: Key,

    /// Factor the property is multiplied with.
    #[serde(default = "default_scale")]
    pub scale: f32,

    #[serde(default)]
    pub entries: Vec<RangeDispatchEntry>,

    #[serde(default)]
    pub fallback: Option<Box<ItemModel>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RangeDispatchEntry {
    pub threshold: f32,

    pub model: ItemModel,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConditionProperty {
    UsingItem,
    Broken,
    Damaged,
    HasComponent,
    FishingRodCast,
    BundleHasSelectedItem,
    Selected,
    Carried,
    ExtendedView,
    KeybindDown,
    ViewEntity,
    CustomModelData,
    Other(Key),
}

macro_rules! condition_properties {
    ($($variant:ident => $name:literal),* $(,)?) => {
        impl ConditionProperty {
            fn write(&self, writer: &mut JsonWriter) -> Result<()> {
                match self {
                    $(ConditionProperty::$variant => writer.string(concat!("minecraft:", $name))?,)*
                    ConditionProperty::Other(key) => writer.resource_key(key)?,
                };
                Ok(())
            }

            fn from_key(key: Key) -> Self {
                if key.namespace() == Key::MINECRAFT {
                    match key.value() {
                        $($name => return ConditionProperty::$variant,)*
                        _ => {}
                    }
                }
                ConditionProperty::Other(key)
            }
        }
    };
}

condition_properties! {
    UsingItem => "using_item",
    Broken => "broken",
    Damaged => "damaged",
    HasComponent => "has_component",
    FishingRodCast => "fishing_rod/cast",
    BundleHasSelectedItem => "bundle/has_selected_item",
    Selected => "selected",
    Carried => "carried",
    ExtendedView => "extended_view",
    KeybindDown => "keybind_down",
    ViewEntity => "view_entity",
    CustomModelData => "custom_model_data",
}

impl<'de> Deserialize<'de> for ConditionProperty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        let key = value.parse().map_err(de::Error::custom)?;
        Ok(Self::from_key(key))
    }
}

impl<'de> Deserialize<'de> for ItemModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (kind, fields) = tagged(deserializer)?;
        Ok(match kind.as_deref() {
            Some("model") => ItemModel::Reference(from_fields(fields)?),
            Some("composite") => ItemModel::Composite(from_fields(fields)?),
            Some("condition") => ItemModel::Condition(from_fields(fields)?),
            Some("select") => ItemModel::Select(from_fields(fields)?),
            Some("range_dispatch") => ItemModel::RangeDispatch(from_fields(fields)?),
            Some("empty") if fields.len() == 1 => ItemModel::Empty,
            _ => ItemModel::Unknown(fields),
        })
    }
}

impl ItemModel {
    fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        let kind = match self {
            ItemModel::Reference(_) => "minecraft:model",
            ItemModel::Composite(_) => "minecraft:composite",
            ItemModel::Condition(_) => "minecraft:condition",
            ItemModel::Select(_) => "minecraft:select",
            ItemModel::RangeDispatch(_) => "minecraft:range_dispatch",
            ItemModel::Empty => "minecraft:empty",
            ItemModel::Unknown(fields) => {
                writer.begin_object()?.extra(fields)?.end_object()?;
                return Ok(());
            }
        };
        writer.begin_object()?.key("type")?.string(kind)?;
        match self {
            ItemModel::Reference(model) => {
                writer.key("model")?.resource_key(&model.model)?;
                if !model.tints.is_empty() {
                    writer.key("tints")?.begin_array()?;
                    for tint in model.tints.iter() {
                        writer.json(tint)?;
                    }
                    writer.end_array()?;
                }
                writer.extra(&model.extra)?;
            }
            ItemModel::Composite(model) => {
                writer.key("models")?.begin_array()?;
                for child in model.models.iter() {
                    child.write(writer)?;
                }
                writer.end_array()?.extra(&model.extra)?;
            }
            ItemModel::Condition(model) => {
                writer.key("property")?;
                model.property.write(writer)?;
                writer.extra(&model.extra)?.key("on_true")?;
                model.on_true.write(writer)?;
                writer.key("on_false")?;
                model.on_false.write(writer)?;
            }
            ItemModel::Select(model) => {
                writer
                    .key("property")?
                    .resource_key(&model.property)?
                    .extra(&model.extra)?
                    .key("cases")?
                    .begin_array()?;
                for case in model.cases.iter() {
                    writer.begin_object()?.key("when")?.json(&case.when)?.key("model")?;
                    case.model.write(writer)?;
                    writer.extra(&case.extra)?.end_object()?;
                }
                writer.end_array()?;
                if let Some(fallback) = &model.fallback {
                    writer.key("fallback")?;
                    fallback.write(writer)?;
                }
            }
            ItemModel::RangeDispatch(model) => {
                writer
                    .key("property")?
                    .resource_key(&model.property)?
                    .extra(&model.extra)?;
                if model.scale != 1.0 {
                    writer.key("scale")?.float(model.scale)?;
                }
                writer.key("entries")?.begin_array()?;
                for entry in model.entries.iter() {
                    writer
                        .begin_object()?
                        .key("threshold")?
                        .float(entry.threshold)?
                        .key("model")?;
                    entry.model.write(writer)?;
                    writer.extra(&entry.extra)?.end_object()?;
                }
                writer.end_array()?;
                if let Some(fallback) = &model.fallback {
                    writer.key("fallback")?;
                    fallback.write(writer)?;
                }
            }
            ItemModel::Empty | ItemModel::Unknown(_) => {}
        }
        writer.end_object()?;
        Ok(())
    }
}

impl JsonResource for Item {
    const CATEGORY: Category = Category::Item;

    fn write(&self, version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?.key("model")?;
        self.model.write(writer)?;
        if !self.hand_animation_on_swap && version >= format::ITEM_HAND_ANIMATION_ON_SWAP {
            writer.key("hand_animation_on_swap")?.bool(false)?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

fn default_scale() -> f32 {
    1.0
}
