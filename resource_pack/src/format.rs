//! Pack format numbers.
//!
//! Every constant is the first pack format that understands the named field
//! or feature; encoders leave it out entirely for older targets.

use serde::{Deserialize, Deserializer};

use crate::{writer::JsonWriter, Result};

/// `gui_light` of block and item models.
pub const MODEL_GUI_LIGHT: u32 = 5;

/// `space` font provider.
pub const FONT_SPACE: u32 = 9;

/// Atlas definitions and their `single`, `directory`, `filter` and `unstitch`
/// sources.
pub const ATLAS: u32 = 12;

/// `paletted_permutations` atlas source.
pub const ATLAS_PALETTED_PERMUTATIONS: u32 = 13;

/// `unihex` and `reference` font providers.
pub const FONT_UNIHEX: u32 = 15;

/// `supported_formats` of the pack section, overlays.
pub const SUPPORTED_FORMATS: u32 = 18;

/// `light_emission` of model elements.
pub const ELEMENT_LIGHT_EMISSION: u32 = 18;

/// Item definitions (`assets/<namespace>/items`).
pub const ITEM_DEFINITION: u32 = 46;

/// `hand_animation_on_swap` of item definitions.
pub const ITEM_HAND_ANIMATION_ON_SWAP: u32 = 55;

/// Range of pack formats, `[min, max)` where `max` is exclusive.
///
/// The pack format itself stores both bounds inclusively, either as single
/// number, as `[min, max]` or as `{"min_inclusive": min, "max_inclusive":
/// max}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormatRange {
    min: u32,
    max_inclusive: u32,
}

impl FormatRange {
    pub fn exact(format: u32) -> Self {
        Self {
            min: format,
            max_inclusive: format,
        }
    }

    pub fn inclusive(min: u32, max_inclusive: u32) -> Self {
        Self {
            min: min.min(max_inclusive),
            max_inclusive: min.max(max_inclusive),
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    /// Exclusive upper bound.
    pub fn max(&self) -> u64 {
        self.max_inclusive as u64 + 1
    }

    pub fn contains(&self, format: u32) -> bool {
        self.min <= format && (format as u64) < self.max()
    }

    pub(crate) fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        if self.min == self.max_inclusive {
            writer.uint(self.min as u64)?;
        } else {
            writer
                .begin_array()?
                .uint(self.min as u64)?
                .uint(self.max_inclusive as u64)?
                .end_array()?;
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for FormatRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Exact(u32),
            Array([u32; 2]),
            Object { min_inclusive: u32, max_inclusive: u32 },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Exact(format) => Self::exact(format),
            Raw::Array([min, max]) => Self::inclusive(min, max),
            Raw::Object {
                min_inclusive,
                max_inclusive,
            } => Self::inclusive(min_inclusive, max_inclusive),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let range = FormatRange::inclusive(10, 13);
        assert_eq!(range.min(), 10);
        assert_eq!(range.max(), 14);
        assert!(!range.contains(9));
        assert!(range.contains(10));
        assert!(range.contains(13));
        assert!(!range.contains(14));
    }

    #[test]
    fn parses_every_shape() {
        assert_eq!(
            serde_json::from_str::<FormatRange>("12").unwrap(),
            FormatRange::exact(12)
        );
        assert_eq!(
            serde_json::from_str::<FormatRange>("[12,15]").unwrap(),
            FormatRange::inclusive(12, 15)
        );
        assert_eq!(
            serde_json::from_str::<FormatRange>(r#"{"min_inclusive":12,"max_inclusive":15}"#)
                .unwrap(),
            FormatRange::inclusive(12, 15)
        );
    }

    #[test]
    fn writes_compact_form() {
        let mut writer = JsonWriter::new();
        FormatRange::exact(7).write(&mut writer).unwrap();
        assert_eq!(writer.finish().unwrap(), "7");

        let mut writer = JsonWriter::new();
        FormatRange::inclusive(7, 9).write(&mut writer).unwrap();
        assert_eq!(writer.finish().unwrap(), "[7,9]");
    }

    #[test]
    fn max_does_not_overflow() {
        let range = FormatRange::inclusive(0, u32::MAX);
        assert!(range.contains(u32::MAX));
        assert_eq!(range.max(), u32::MAX as u64 + 1);
    }
}
