//! Resources a pack consists of.
//!
//! JSON resources are decoded with serde and encoded through [`JsonWriter`],
//! fields this crate does not know are kept in an `extra` map and written
//! after the known ones. Blobs (textures, sounds, unknown files) are never
//! decoded.

use std::hash::{Hash, Hasher};

use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};

use crate::{format, key::Key, writer::JsonWriter, Result};

pub use atlas::{
    Atlas, AtlasSource, DirectorySource, FilterSource, PalettedPermutationsSource,
    SingleSource, UnstitchRegion, UnstitchSource,
};
pub use block_state::{BlockState, Case, Variant, VariantModel, When};
pub use font::{
    BitmapProvider, Font, FontProvider, ReferenceProvider, SizeOverride, SpaceProvider,
    TtfProvider, UnihexProvider,
};
pub use item::{
    CompositeModel, ConditionModel, ConditionProperty, Item, ItemModel, RangeDispatchEntry,
    RangeDispatchModel, ReferenceModel, SelectCase, SelectModel,
};
pub use language::Language;
pub use model::{
    Axis, Display, Element, ElementFace, ElementRotation, Face, GuiLight, ItemOverride, Model,
    ModelTextures, TextureRef,
};
pub use sound::{Sound, SoundEntry, SoundEntryType, SoundEvent, SoundRegistry};
pub use texture::Texture;
pub use unknown::UnknownFile;

mod atlas;
mod block_state;
mod font;
mod item;
mod language;
mod model;
mod sound;
mod texture;
mod unknown;

/// Kind of resource, decides where its files live below
/// `assets/<namespace>/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Texture,
    Model,
    Font,
    SoundRegistry,
    Sound,
    BlockState,
    Item,
    Language,
    Atlas,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Texture,
        Category::Model,
        Category::Font,
        Category::SoundRegistry,
        Category::Sound,
        Category::BlockState,
        Category::Item,
        Category::Language,
        Category::Atlas,
    ];

    /// Directory below the namespace, the sound registry is a single file at
    /// the namespace root.
    pub fn directory(self) -> &'static str {
        match self {
            Category::Texture => "textures",
            Category::Model => "models",
            Category::Font => "font",
            Category::SoundRegistry => "",
            Category::Sound => "sounds",
            Category::BlockState => "blockstates",
            Category::Item => "items",
            Category::Language => "lang",
            Category::Atlas => "atlases",
        }
    }

    /// Extension appended to the key, textures keep theirs in the key.
    pub fn extension(self) -> &'static str {
        match self {
            Category::Texture => "",
            Category::Sound => ".ogg",
            _ => ".json",
        }
    }

    /// First pack format that reads this category.
    pub fn since(self) -> u32 {
        match self {
            Category::Item => format::ITEM_DEFINITION,
            Category::Atlas => format::ATLAS,
            _ => 0,
        }
    }

    pub fn path(self, key: &Key) -> String {
        format!(
            "assets/{}/{}/{}{}",
            key.namespace(),
            self.directory(),
            key.value(),
            self.extension()
        )
    }
}

pub(crate) const SOUND_REGISTRY_FILE: &str = "sounds.json";

/// JSON resource stored at `assets/<namespace>/<directory>/<path>.json`.
pub trait JsonResource: DeserializeOwned {
    const CATEGORY: Category;

    fn write(&self, version: u32, writer: &mut JsonWriter) -> Result<()>;

    fn encode(&self, version: u32) -> Result<Vec<u8>> {
        let mut writer = JsonWriter::new();
        self.write(version, &mut writer)?;
        Ok(writer.finish()?.into_bytes())
    }

    fn decode(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncodedFile {
    pub path: String,
    pub content: Bytes,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Resource {
    Texture(Key, Texture),
    Model(Key, Model),
    Font(Key, Font),
    /// Sound registry of a namespace.
    SoundRegistry(String, SoundRegistry),
    Sound(Key, Sound),
    BlockState(Key, BlockState),
    Item(Key, Item),
    Language(Key, Language),
    Atlas(Key, Atlas),
    /// File no category claims, keyed by its path relative to the container.
    Unknown(String, UnknownFile),
}

impl Resource {
    pub fn category(&self) -> Option<Category> {
        Some(match self {
            Resource::Texture(..) => Category::Texture,
            Resource::Model(..) => Category::Model,
            Resource::Font(..) => Category::Font,
            Resource::SoundRegistry(..) => Category::SoundRegistry,
            Resource::Sound(..) => Category::Sound,
            Resource::BlockState(..) => Category::BlockState,
            Resource::Item(..) => Category::Item,
            Resource::Language(..) => Category::Language,
            Resource::Atlas(..) => Category::Atlas,
            Resource::Unknown(..) => return None,
        })
    }

    /// Files of this resource for the given pack format, empty if the format
    /// predates the category.
    pub fn serialize(&self, version: u32) -> Result<Vec<EncodedFile>> {
        if let Some(category) = self.category() {
            if version < category.since() {
                return Ok(vec![]);
            }
        }
        Ok(match self {
            Resource::Texture(key, texture) => texture.serialize(key, version)?,
            Resource::Model(key, model) => vec![json_file(key, model, version)?],
            Resource::Font(key, font) => vec![json_file(key, font, version)?],
            Resource::SoundRegistry(namespace, registry) => vec![EncodedFile {
                path: format!("assets/{namespace}/{SOUND_REGISTRY_FILE}"),
                content: registry.encode(version)?.into(),
            }],
            Resource::Sound(key, sound) => vec![EncodedFile {
                path: Category::Sound.path(key),
                content: sound.data.clone(),
            }],
            Resource::BlockState(key, block_state) => {
                vec![json_file(key, block_state, version)?]
            }
            Resource::Item(key, item) => vec![json_file(key, item, version)?],
            Resource::Language(key, language) => vec![json_file(key, language, version)?],
            Resource::Atlas(key, atlas) => vec![json_file(key, atlas, version)?],
            Resource::Unknown(path, file) => vec![EncodedFile {
                path: path.clone(),
                content: file.data.clone(),
            }],
        })
    }
}

fn json_file<R: JsonResource>(key: &Key, resource: &R, version: u32) -> Result<EncodedFile> {
    Ok(EncodedFile {
        path: R::CATEGORY.path(key),
        content: resource.encode(version)?.into(),
    })
}

/// Hashes the canonical encoding, resources that compare equal encode to the
/// same bytes.
impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        if let Ok(files) = self.serialize(u32::MAX) {
            files.hash(state);
        }
    }
}

/// Reads a tagged object, giving its type and all of its fields. Namespaced
/// types lose their `minecraft:` prefix.
pub(crate) fn tagged<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<(Option<String>, Map<String, Value>), D::Error> {
    let fields = Map::<String, Value>::deserialize(deserializer)?;
    let kind = match fields.get("type") {
        Some(Value::String(kind)) => {
            Some(kind.strip_prefix("minecraft:").unwrap_or(kind).to_owned())
        }
        _ => None,
    };
    Ok((kind, fields))
}

/// Deserializes the fields of a tagged object except for its type.
pub(crate) fn from_fields<T: DeserializeOwned, E: serde::de::Error>(
    fields: Map<String, Value>,
) -> std::result::Result<T, E> {
    let fields = fields
        .into_iter()
        .filter(|(name, _)| name != "type")
        .collect();
    serde_json::from_value(Value::Object(fields)).map_err(E::custom)
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn write_floats(writer: &mut JsonWriter, values: &[f32]) -> Result<()> {
    writer.begin_array()?;
    for value in values {
        writer.float(*value)?;
    }
    writer.end_array()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash(resource: &Resource) -> u64 {
        let mut hasher = DefaultHasher::new();
        resource.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn paths_per_category() {
        let key = Key::new("ns", "block/stone").unwrap();
        assert_eq!(
            Category::Model.path(&key),
            "assets/ns/models/block/stone.json"
        );
        assert_eq!(
            Category::Sound.path(&key),
            "assets/ns/sounds/block/stone.ogg"
        );
        let texture = Key::new("ns", "block/stone.png").unwrap();
        assert_eq!(
            Category::Texture.path(&texture),
            "assets/ns/textures/block/stone.png"
        );
    }

    #[test]
    fn equal_resources_hash_equally() {
        let a = Resource::Language(
            Key::new("ns", "en_us").unwrap(),
            Language::decode(br#"{"a":"b","c":"d"}"#).unwrap(),
        );
        let b = Resource::Language(
            Key::new("ns", "en_us").unwrap(),
            Language::decode(br#"{"a":"b","c":"d"}"#).unwrap(),
        );
        assert_eq!(a, b);
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn gated_categories_are_skipped() {
        let key = Key::new("ns", "blocks").unwrap();
        let atlas = Resource::Atlas(key, Atlas::decode(br#"{"sources":[]}"#).unwrap());
        assert!(atlas.serialize(format::ATLAS - 1).unwrap().is_empty());
        assert_eq!(
            atlas.serialize(format::ATLAS).unwrap(),
            vec![EncodedFile {
                path: "assets/ns/atlases/blocks.json".to_owned(),
                content: Bytes::from_static(br#"{"sources":[]}"#),
            }]
        );
    }

    #[test]
    fn unknown_files_are_verbatim() {
        let resource = Resource::Unknown(
            "credits.txt".to_owned(),
            UnknownFile::new(&b"\x00\xffhello"[..]),
        );
        assert_eq!(resource.category(), None);
        assert_eq!(
            resource.serialize(1).unwrap(),
            vec![EncodedFile {
                path: "credits.txt".to_owned(),
                content: Bytes::from_static(b"\x00\xffhello"),
            }]
        );
    }
}
