use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{metadata::Section, writer::JsonWriter, Result};

/// The `language` section, adds languages to the language menu.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct LanguageMeta {
    /// Languages by their code, e.g. `en_us`.
    pub languages: IndexMap<String, LanguageEntry>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LanguageEntry {
    /// Full name of the language, shown in the language menu.
    pub name: String,

    /// Country or region name.
    pub region: String,

    /// If true, the language reads right to left.
    #[serde(default)]
    pub bidirectional: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Section for LanguageMeta {
    const NAME: &'static str = "language";

    fn write(&self, _version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        for (code, language) in self.languages.iter() {
            writer
                .key(code)?
                .begin_object()?
                .key("name")?
                .string(&language.name)?
                .key("region")?
                .string(&language.region)?;
            if language.bidirectional {
                writer.key("bidirectional")?.bool(true)?;
            }
            writer.extra(&language.extra)?.end_object()?;
        }
        writer.end_object()?;
        Ok(())
    }
}
