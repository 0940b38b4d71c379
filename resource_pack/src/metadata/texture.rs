use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{metadata::Section, writer::JsonWriter, Result};

/// The `texture` section of a texture's .mcmeta file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TextureMeta {
    /// Causes the texture to blur when viewed from close up.
    #[serde(default)]
    pub blur: bool,

    /// Causes the texture to stretch instead of tiling where it would
    /// otherwise do so.
    #[serde(default)]
    pub clamp: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `villager` section of villager and zombie villager profession
/// textures.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct VillagerMeta {
    /// Hat type, `none`, `partial` or `full`.
    #[serde(default)]
    pub hat: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Section for TextureMeta {
    const NAME: &'static str = "texture";

    fn write(&self, _version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        if self.blur {
            writer.key("blur")?.bool(true)?;
        }
        if self.clamp {
            writer.key("clamp")?.bool(true)?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

impl Section for VillagerMeta {
    const NAME: &'static str = "villager";

    fn write(&self, _version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        if let Some(hat) = &self.hat {
            writer.key("hat")?.string(hat)?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::metadata::Metadata;

    #[test]
    fn texture_and_villager_round_trip() {
        let data = br#"{"texture":{"blur":true},"villager":{"hat":"partial"}}"#;
        let metadata = Metadata::decode(data).unwrap();
        assert!(metadata.texture().unwrap().blur);
        assert!(!metadata.texture().unwrap().clamp);
        assert_eq!(metadata.villager().unwrap().hat.as_deref(), Some("partial"));
        assert_eq!(metadata.encode(1).unwrap(), data.to_vec());
    }
}
