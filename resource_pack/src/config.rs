use serde::{Deserialize, Serialize};

/// Settings shared by the codec registry and the archive writer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// How archive entries are stored when writing a zip.
    #[serde(default)]
    pub compression: Compression,

    /// Deflate level from 0 (fastest) to 9 (smallest), defaults to 6. Ignored
    /// for stored entries.
    #[serde(default = "default_6", skip_serializing_if = "if_6")]
    pub compression_level: u32,

    /// Fail on malformed JSON in a known category instead of keeping the file
    /// as an unknown resource.
    #[serde(default, skip_serializing_if = "if_false")]
    pub strict: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            compression_level: default_6(),
            strict: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Stored,
    #[default]
    Deflate,
}

fn default_6() -> u32 {
    6
}

fn if_6(value: &u32) -> bool {
    *value == 6
}

fn if_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_object() {
        let options: Options = serde_json::from_str("{}").unwrap();
        assert_eq!(options, Options::default());
        assert_eq!(options.compression, Compression::Deflate);
        assert_eq!(options.compression_level, 6);
        assert!(!options.strict);
    }

    #[test]
    fn parses_overrides() {
        let options: Options =
            serde_json::from_str(r#"{"compression":"stored","strict":true}"#).unwrap();
        assert_eq!(options.compression, Compression::Stored);
        assert!(options.strict);
        assert_eq!(
            serde_json::to_string(&options).unwrap(),
            r#"{"compression":"stored","strict":true}"#
        );
    }
}
