use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{format::FormatRange, metadata::Section, writer::JsonWriter, Result};

/// The `overlays` section, lists directories layered on top of the pack for
/// a range of pack formats.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct OverlaysMeta {
    /// Order matters, later entries are applied over earlier ones.
    #[serde(default)]
    pub entries: Vec<OverlayEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OverlayEntry {
    /// Pack formats for which the overlay is active.
    pub formats: FormatRange,

    /// Directory of the overlay, relative to the pack root.
    pub directory: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OverlaysMeta {
    pub fn new(entries: Vec<OverlayEntry>) -> Self {
        Self {
            entries,
            extra: Map::new(),
        }
    }
}

impl OverlayEntry {
    pub fn new(formats: FormatRange, directory: impl Into<String>) -> Self {
        Self {
            formats,
            directory: directory.into(),
            extra: Map::new(),
        }
    }
}

impl Section for OverlaysMeta {
    const NAME: &'static str = "overlays";

    fn write(&self, _version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?.key("entries")?.begin_array()?;
        for entry in self.entries.iter() {
            writer.begin_object()?.key("formats")?;
            entry.formats.write(writer)?;
            writer
                .key("directory")?
                .string(&entry.directory)?
                .extra(&entry.extra)?
                .end_object()?;
        }
        writer.end_array()?.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    #[test]
    fn entries_round_trip() {
        let mut metadata = Metadata::new();
        metadata.insert(OverlaysMeta::new(vec![
            OverlayEntry::new(FormatRange::inclusive(10, 13), "a"),
            OverlayEntry::new(FormatRange::exact(18), "b"),
        ]));
        let data = metadata.encode(18).unwrap();
        assert_eq!(
            std::str::from_utf8(&data).unwrap(),
            r#"{"overlays":{"entries":[{"formats":[10,13],"directory":"a"},{"formats":18,"directory":"b"}]}}"#
        );
        assert_eq!(Metadata::decode(&data).unwrap(), metadata);
    }

    #[test]
    fn object_formats() {
        let metadata = Metadata::decode(
            br#"{"overlays":{"entries":[{"formats":{"min_inclusive":16,"max_inclusive":20},"directory":"x"}]}}"#,
        )
        .unwrap();
        let entry = &metadata.overlays().unwrap().entries[0];
        assert_eq!(entry.formats, FormatRange::inclusive(16, 20));
        assert_eq!(entry.directory, "x");
    }
}
