//! Metadata bundles, the content of `pack.mcmeta` and of the `.mcmeta` files
//! next to textures.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{writer::JsonWriter, Result};

pub use animation::{AnimationMeta, Frame};
pub use filter::{FilterMeta, KeyPattern};
pub use language::{LanguageEntry, LanguageMeta};
pub use overlays::{OverlayEntry, OverlaysMeta};
pub use pack::PackMeta;
pub use texture::{TextureMeta, VillagerMeta};

mod animation;
mod filter;
mod language;
mod overlays;
mod pack;
mod texture;

/// Strongly typed metadata section, identified by its name.
pub trait Section: DeserializeOwned + Into<MetadataSection> {
    const NAME: &'static str;

    fn write(&self, version: u32, writer: &mut JsonWriter) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum MetadataSection {
    Pack(PackMeta),
    Overlays(OverlaysMeta),
    Language(LanguageMeta),
    Filter(FilterMeta),
    Animation(AnimationMeta),
    Texture(TextureMeta),
    Villager(VillagerMeta),
    /// Section this crate does not know, kept as is.
    Unknown(Value),
}

macro_rules! sections {
    ($($variant:ident($section:ty)),* $(,)?) => {
        $(
            impl From<$section> for MetadataSection {
                fn from(value: $section) -> Self {
                    Self::$variant(value)
                }
            }
        )*

        impl MetadataSection {
            fn decode(name: &str, value: Value) -> serde_json::Result<Self> {
                $(
                    if name == <$section as Section>::NAME {
                        return Ok(Self::$variant(serde_json::from_value(value)?));
                    }
                )*
                Ok(Self::Unknown(value))
            }

            fn write(&self, version: u32, writer: &mut JsonWriter) -> Result<()> {
                match self {
                    $(Self::$variant(section) => section.write(version, writer),)*
                    Self::Unknown(value) => writer.json(value).map(drop),
                }
            }
        }
    };
}

sections! {
    Pack(PackMeta),
    Overlays(OverlaysMeta),
    Language(LanguageMeta),
    Filter(FilterMeta),
    Animation(AnimationMeta),
    Texture(TextureMeta),
    Villager(VillagerMeta),
}

/// Ordered set of sections, at most one per name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    sections: IndexMap<String, MetadataSection>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a section, replacing any section with the same name.
    pub fn insert<S: Section>(&mut self, section: S) -> &mut Self {
        self.sections.insert(S::NAME.to_owned(), section.into());
        self
    }

    pub fn insert_unknown(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.sections
            .insert(name.into(), MetadataSection::Unknown(value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&MetadataSection> {
        self.sections.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<MetadataSection> {
        self.sections.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataSection)> {
        self.sections
            .iter()
            .map(|(name, section)| (name.as_str(), section))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn pack(&self) -> Option<&PackMeta> {
        match self.sections.get(PackMeta::NAME) {
            Some(MetadataSection::Pack(section)) => Some(section),
            _ => None,
        }
    }

    pub fn overlays(&self) -> Option<&OverlaysMeta> {
        match self.sections.get(OverlaysMeta::NAME) {
            Some(MetadataSection::Overlays(section)) => Some(section),
            _ => None,
        }
    }

    pub fn language(&self) -> Option<&LanguageMeta> {
        match self.sections.get(LanguageMeta::NAME) {
            Some(MetadataSection::Language(section)) => Some(section),
            _ => None,
        }
    }

    pub fn filter(&self) -> Option<&FilterMeta> {
        match self.sections.get(FilterMeta::NAME) {
            Some(MetadataSection::Filter(section)) => Some(section),
            _ => None,
        }
    }

    pub fn animation(&self) -> Option<&AnimationMeta> {
        match self.sections.get(AnimationMeta::NAME) {
            Some(MetadataSection::Animation(section)) => Some(section),
            _ => None,
        }
    }

    pub fn texture(&self) -> Option<&TextureMeta> {
        match self.sections.get(TextureMeta::NAME) {
            Some(MetadataSection::Texture(section)) => Some(section),
            _ => None,
        }
    }

    pub fn villager(&self) -> Option<&VillagerMeta> {
        match self.sections.get(VillagerMeta::NAME) {
            Some(MetadataSection::Villager(section)) => Some(section),
            _ => None,
        }
    }

    pub fn decode(data: &[u8]) -> serde_json::Result<Self> {
        let fields: Map<String, Value> = serde_json::from_slice(data)?;
        let mut sections = IndexMap::with_capacity(fields.len());
        for (name, value) in fields {
            let section = MetadataSection::decode(&name, value)?;
            sections.insert(name, section);
        }
        Ok(Self { sections })
    }

    pub fn write(&self, version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        for (name, section) in self.sections.iter() {
            writer.key(name)?;
            section.write(version, writer)?;
        }
        writer.end_object()?;
        Ok(())
    }

    pub fn encode(&self, version: u32) -> Result<Vec<u8>> {
        let mut writer = JsonWriter::new();
        self.write(version, &mut writer)?;
        Ok(writer.finish()?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::format::FormatRange;

    #[test]
    fn pack_section_round_trip() {
        let mut metadata = Metadata::new();
        metadata.insert(PackMeta::new(15, "Hello"));
        let data = metadata.encode(15).unwrap();
        assert_eq!(
            std::str::from_utf8(&data).unwrap(),
            r#"{"pack":{"pack_format":15,"description":"Hello"}}"#
        );
        assert_eq!(Metadata::decode(&data).unwrap(), metadata);
    }

    #[test]
    fn unknown_sections_are_preserved_in_order() {
        let data = br#"{"custom":{"b":1,"a":[true]},"pack":{"pack_format":34,"description":{"text":"x","color":"red"},"future":7}}"#;
        let metadata = Metadata::decode(data).unwrap();
        assert_eq!(
            metadata.get("custom"),
            Some(&MetadataSection::Unknown(json!({"b": 1, "a": [true]})))
        );
        let pack = metadata.pack().unwrap();
        assert_eq!(pack.format, 34);
        assert_eq!(pack.description, json!({"text": "x", "color": "red"}));
        assert_eq!(metadata.encode(34).unwrap(), data.to_vec());
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut metadata = Metadata::new();
        metadata.insert(PackMeta::new(1, "a"));
        metadata.insert(PackMeta::new(2, "b"));
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.pack().unwrap().format, 2);
    }

    #[test]
    fn supported_formats_is_version_gated() {
        let mut pack = PackMeta::new(18, "x");
        pack.supported_formats = Some(FormatRange::inclusive(18, 22));
        let mut metadata = Metadata::new();
        metadata.insert(pack);

        assert_eq!(
            std::str::from_utf8(&metadata.encode(18).unwrap()).unwrap(),
            r#"{"pack":{"pack_format":18,"description":"x","supported_formats":[18,22]}}"#
        );
        assert_eq!(
            std::str::from_utf8(&metadata.encode(17).unwrap()).unwrap(),
            r#"{"pack":{"pack_format":18,"description":"x"}}"#
        );
    }

    #[test]
    fn empty_metadata() {
        let metadata = Metadata::decode(b"{}").unwrap();
        assert!(metadata.is_empty());
        assert_eq!(metadata.encode(1).unwrap(), b"{}".to_vec());
    }

    #[test]
    fn malformed_known_section_fails() {
        assert!(Metadata::decode(br#"{"pack":{"pack_format":"x"}}"#).is_err());
        assert!(Metadata::decode(b"[]").is_err());
    }
}
