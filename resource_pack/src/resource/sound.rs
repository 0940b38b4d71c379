use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::{
    key::Key,
    resource::{Category, JsonResource},
    writer::JsonWriter,
    Result,
};

/// Ogg Vorbis file below `sounds/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sound {
    pub data: Bytes,
}

impl Sound {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

/// Sound events of a namespace, `assets/<namespace>/sounds.json`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SoundRegistry {
    /// Events by their path, e.g. `entity.pig.ambient`.
    pub events: IndexMap<String, SoundEvent>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SoundEvent {
    /// If true, the sounds replace the ones of packs below instead of being
    /// added to them.
    #[serde(default)]
    pub replace: bool,

    /// Translation key of the subtitle shown when the event plays.
    #[serde(default)]
    pub subtitle: Option<String>,

    #[serde(default)]
    pub sounds: Vec<SoundEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A sound file or event one of which is picked randomly by weight. Entries
/// with only defaults are written as their name alone.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundEntry {
    /// Sound file in `sounds/` without extension, or an event if `type` is
    /// `event`.
    pub name: Key,

    pub volume: f32,

    pub pitch: f32,

    pub weight: u32,

    /// Streams the sound from disk instead of loading it at once.
    pub stream: bool,

    pub attenuation_distance: u32,

    pub preload: bool,

    pub kind: SoundEntryType,

    pub extra: Map<String, Value>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundEntryType {
    #[default]
    File,
    Event,
}

impl SoundEntry {
    pub fn new(name: Key) -> Self {
        Self {
            name,
            volume: 1.0,
            pitch: 1.0,
            weight: 1,
            stream: false,
            attenuation_distance: 16,
            preload: false,
            kind: SoundEntryType::File,
            extra: Map::new(),
        }
    }

    fn is_default(&self) -> bool {
        *self == Self::new(self.name.clone())
    }

    fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        if self.is_default() {
            writer.resource_key(&self.name)?;
            return Ok(());
        }
        writer.begin_object()?.key("name")?.resource_key(&self.name)?;
        if self.volume != 1.0 {
            writer.key("volume")?.float(self.volume)?;
        }
        if self.pitch != 1.0 {
            writer.key("pitch")?.float(self.pitch)?;
        }
        if self.weight != 1 {
            writer.key("weight")?.uint(self.weight as u64)?;
        }
        if self.stream {
            writer.key("stream")?.bool(true)?;
        }
        if self.attenuation_distance != 16 {
            writer
                .key("attenuation_distance")?
                .uint(self.attenuation_distance as u64)?;
        }
        if self.preload {
            writer.key("preload")?.bool(true)?;
        }
        if self.kind == SoundEntryType::Event {
            writer.key("type")?.string("event")?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

impl<'de> Deserialize<'de> for SoundEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Full {
            name: Key,
            #[serde(default = "default_1_f32")]
            volume: f32,
            #[serde(default = "default_1_f32")]
            pitch: f32,
            #[serde(default = "default_1")]
            weight: u32,
            #[serde(default)]
            stream: bool,
            #[serde(default = "default_16")]
            attenuation_distance: u32,
            #[serde(default)]
            preload: bool,
            #[serde(default, rename = "type")]
            kind: SoundEntryType,
            #[serde(flatten)]
            extra: Map<String, Value>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(Key),
            Full(Full),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Name(name) => Self::new(name),
            Raw::Full(full) => Self {
                name: full.name,
                volume: full.volume,
                pitch: full.pitch,
                weight: full.weight,
                stream: full.stream,
                attenuation_distance: full.attenuation_distance,
                preload: full.preload,
                kind: full.kind,
                extra: full.extra,
            },
        })
    }
}

impl JsonResource for SoundRegistry {
    const CATEGORY: Category = Category::SoundRegistry;

    fn write(&self, _version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        for (name, event) in self.events.iter() {
            writer.key(name)?.begin_object()?;
            if event.replace {
                writer.key("replace")?.bool(true)?;
            }
            if let Some(subtitle) = &event.subtitle {
                writer.key("subtitle")?.string(subtitle)?;
            }
            writer.key("sounds")?.begin_array()?;
            for entry in event.sounds.iter() {
                entry.write(writer)?;
            }
            writer.end_array()?.extra(&event.extra)?.end_object()?;
        }
        writer.end_object()?;
        Ok(())
    }
}

fn default_1() -> u32 {
    1
}

fn default_1_f32() -> f32 {
    1.0
}

fn default_16() -> u32 {
    16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_full_entries() {
        let data = br#"{"entity.pig.ambient":{"subtitle":"subtitles.entity.pig.ambient","sounds":["minecraft:mob/pig/say1",{"name":"minecraft:mob/pig/say2","volume":0.5,"weight":2},{"name":"minecraft:entity.cow.ambient","type":"event"}]},"music.game":{"replace":true,"sounds":[{"name":"minecraft:music/calm1","stream":true,"attenuation_distance":32,"preload":true}]}}"#;
        let registry = SoundRegistry::decode(data).unwrap();
        let sounds = &registry.events["entity.pig.ambient"].sounds;
        assert_eq!(sounds[0], SoundEntry::new(Key::minecraft("mob/pig/say1").unwrap()));
        assert_eq!(sounds[1].volume, 0.5);
        assert_eq!(sounds[2].kind, SoundEntryType::Event);
        assert!(registry.events["music.game"].replace);
        assert_eq!(registry.encode(1).unwrap(), data.to_vec());
    }

    #[test]
    fn defaults_collapse_to_name() {
        let registry =
            SoundRegistry::decode(br#"{"a":{"sounds":[{"name":"ns:x","volume":1}]}}"#).unwrap();
        assert_eq!(
            registry.encode(1).unwrap(),
            br#"{"a":{"sounds":["ns:x"]}}"#.to_vec()
        );
    }
}
