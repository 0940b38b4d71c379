use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Namespaced identifier, also known as resource location.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    namespace: String,
    value: String,
}

impl Key {
    pub const MINECRAFT: &'static str = "minecraft";

    pub fn new(namespace: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        let value = value.into();
        if !is_segment(&namespace) || !namespace.chars().all(is_namespace_char) {
            return Err(Error::InvalidKey(format!("{namespace}:{value}")));
        }
        // every segment maps to a file or directory name
        if !value.split('/').all(is_segment) || !value.chars().all(is_value_char) {
            return Err(Error::InvalidKey(format!("{namespace}:{value}")));
        }
        Ok(Self { namespace, value })
    }

    pub fn minecraft(value: impl Into<String>) -> Result<Self> {
        Self::new(Self::MINECRAFT, value)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

fn is_segment(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
}

fn is_namespace_char(char: char) -> bool {
    matches!(char, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

fn is_value_char(char: char) -> bool {
    is_namespace_char(char) || char == '/'
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.split_once(':') {
            Some((namespace, value)) => Self::new(namespace, value),
            None => Self::minecraft(value),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.value)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults_to_minecraft() {
        let key: Key = "block/stone".parse().unwrap();
        assert_eq!(key.namespace(), "minecraft");
        assert_eq!(key.value(), "block/stone");
        assert_eq!(key.to_string(), "minecraft:block/stone");
    }

    #[test]
    fn parse_namespaced() {
        let key: Key = "creative:font/test.png".parse().unwrap();
        assert_eq!(key.namespace(), "creative");
        assert_eq!(key.value(), "font/test.png");
    }

    #[test]
    fn rejects_invalid() {
        assert!(matches!(Key::new("", "a"), Err(Error::InvalidKey(_))));
        assert!(matches!(Key::new("a", ""), Err(Error::InvalidKey(_))));
        assert!(matches!(Key::new("Upper", "a"), Err(Error::InvalidKey(_))));
        assert!(matches!(Key::new("ns/x", "a"), Err(Error::InvalidKey(_))));
        assert!(matches!("a:b:c".parse::<Key>(), Err(Error::InvalidKey(_))));
        assert!(matches!(Key::new("ns", "With Space"), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn rejects_relative_segments() {
        for value in ["../x", "a/./b", "a/..", ".", "a//b", "/a", "a/"] {
            assert!(
                matches!(Key::new("ns", value), Err(Error::InvalidKey(_))),
                "{value}"
            );
        }
        assert!(matches!(Key::new("..", "a"), Err(Error::InvalidKey(_))));
        assert!(Key::new("ns", "a.b/..c/.d").is_ok());
        assert!(Key::new(".ns", "a").is_ok());
    }

    #[test]
    fn serde_uses_string_form() {
        let key = Key::new("ns", "p").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""ns:p""#);
        assert_eq!(serde_json::from_str::<Key>(r#""ns:p""#).unwrap(), key);
        assert!(serde_json::from_str::<Key>(r#""NS:p""#).is_err());
    }
}
