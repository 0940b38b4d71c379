use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{metadata::Section, writer::JsonWriter, Result};

/// The `filter` section, hides files of packs below this one.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FilterMeta {
    /// Files matching any of the patterns are hidden.
    #[serde(default)]
    pub block: Vec<KeyPattern>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pair of regular expressions matched against the namespace and the path of
/// a resource location. A missing expression matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct KeyPattern {
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KeyPattern {
    pub(crate) fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        if let Some(namespace) = &self.namespace {
            writer.key("namespace")?.string(namespace)?;
        }
        if let Some(path) = &self.path {
            writer.key("path")?.string(path)?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

impl Section for FilterMeta {
    const NAME: &'static str = "filter";

    fn write(&self, _version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?.key("block")?.begin_array()?;
        for pattern in self.block.iter() {
            pattern.write(writer)?;
        }
        writer.end_array()?.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}
