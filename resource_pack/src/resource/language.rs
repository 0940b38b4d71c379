use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    resource::{Category, JsonResource},
    writer::JsonWriter,
    Result,
};

/// Translations of one language, `lang/<code>.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Language {
    pub translations: IndexMap<String, String>,
}

impl Language {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.translations.get(key).map(String::as_str)
    }
}

impl JsonResource for Language {
    const CATEGORY: Category = Category::Language;

    fn write(&self, _version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        for (key, translation) in self.translations.iter() {
            writer.key(key)?.string(translation)?;
        }
        writer.end_object()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_escapes() {
        let data = "{\"z\":\"last \\\"quoted\\\"\",\"a\":\"µ\\n\"}".as_bytes();
        let language = Language::decode(data).unwrap();
        assert_eq!(language.get("a"), Some("µ\n"));
        assert_eq!(language.encode(1).unwrap(), data.to_vec());
    }
}
