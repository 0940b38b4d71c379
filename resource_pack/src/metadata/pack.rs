use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    format::{self, FormatRange},
    metadata::Section,
    writer::JsonWriter,
    Result,
};

/// The `pack` section, required for a pack to be listed by the game.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PackMeta {
    /// Pack format this pack was made for. If it does not match the format of
    /// the running game, the pack is marked as incompatible and requires
    /// additional confirmation to be loaded.
    #[serde(rename = "pack_format")]
    pub format: u32,

    /// Text shown below the pack name in the pack list, either a plain string
    /// or a text component.
    pub description: Value,

    /// Range of pack formats this pack is also compatible with.
    #[serde(default)]
    pub supported_formats: Option<FormatRange>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackMeta {
    pub fn new(format: u32, description: impl Into<String>) -> Self {
        Self {
            format,
            description: Value::String(description.into()),
            supported_formats: None,
            extra: Map::new(),
        }
    }
}

impl Section for PackMeta {
    const NAME: &'static str = "pack";

    fn write(&self, version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer
            .begin_object()?
            .key("pack_format")?
            .uint(self.format as u64)?
            .key("description")?
            .json(&self.description)?;
        if let Some(supported_formats) = &self.supported_formats {
            if version >= format::SUPPORTED_FORMATS {
                writer.key("supported_formats")?;
                supported_formats.write(writer)?;
            }
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}
