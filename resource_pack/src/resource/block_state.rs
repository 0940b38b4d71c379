use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use serde_with::{serde_as, OneOrMany};

use crate::{
    key::Key,
    resource::{Category, JsonResource},
    writer::JsonWriter,
    Result,
};

/// Maps block states to models, `blockstates/<block>.json`. Either
/// `variants` or `multipart` is set.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BlockState {
    /// Holds the names of all the variants of the block.
    #[serde(default)]
    pub variants: Option<IndexMap<String, Variant>>,

    /// Used instead of variants to combine models based on block state
    /// attributes.
    #[serde(default)]
    pub multipart: Option<Vec<Case>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One model, or several of which one is chosen randomly by weight.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Variant(#[serde_as(as = "OneOrMany<_>")] pub Vec<VariantModel>);

fn write_models(writer: &mut JsonWriter, models: &[VariantModel]) -> Result<()> {
    match models {
        [model] => model.write(writer),
        models => {
            writer.begin_array()?;
            for model in models {
                model.write(writer)?;
            }
            writer.end_array()?;
            Ok(())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VariantModel {
    /// Specifies the path to the model file of the block, in form of a resource
    /// location.
    pub model: Key,

    /// Rotation of the model on the x-axis in increments of 90 degrees.
    #[serde(default)]
    pub x: u32,

    /// Rotation of the model on the y-axis in increments of 90 degrees.
    #[serde(default)]
    pub y: u32,

    /// Can be true or false (default). Locks the rotation of the texture of a
    /// block, if set to true. This way the texture does not rotate with the
    /// block when using the x and y-tags above.
    #[serde(default)]
    pub uvlock: bool,

    /// Sets the probability of the model for being used in the game, defaults
    /// to 1 (=100%). If more than one model is used for the same variant, the
    /// probability is calculated by dividing the individual model's weight by
    /// the sum of the weights of all models.
    #[serde(default = "default_1")]
    pub weight: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VariantModel {
    pub fn new(model: Key) -> Self {
        Self {
            model,
            x: 0,
            y: 0,
            uvlock: false,
            weight: 1,
            extra: Map::new(),
        }
    }

    fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?.key("model")?.resource_key(&self.model)?;
        if self.x != 0 {
            writer.key("x")?.uint(self.x as u64)?;
        }
        if self.y != 0 {
            writer.key("y")?.uint(self.y as u64)?;
        }
        if self.uvlock {
            writer.key("uvlock")?.bool(true)?;
        }
        if self.weight != 1 {
            writer.key("weight")?.uint(self.weight as u64)?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Case {
    /// A list of cases that have to be met for the model to be applied. If
    /// unset, the model always applies.
    #[serde(default)]
    pub when: Option<When>,

    /// Determines the model(s) to apply and its properties. There can be one
    /// model or an array of models. If set to an array, the model is chosen
    /// randomly from the options given.
    #[serde_as(as = "OneOrMany<_>")]
    pub apply: Vec<VariantModel>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Condition of a multipart case, either state values that all have to match
/// or an `OR`/`AND` combination of such.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum When {
    One(IndexMap<String, String>),
    Many(IndexMap<String, Vec<IndexMap<String, String>>>),
}

impl When {
    fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        match self {
            When::One(states) => write_states(writer, states),
            When::Many(combinations) => {
                writer.begin_object()?;
                for (operator, cases) in combinations.iter() {
                    writer.key(operator)?.begin_array()?;
                    for states in cases {
                        write_states(writer, states)?;
                    }
                    writer.end_array()?;
                }
                writer.end_object()?;
                Ok(())
            }
        }
    }
}

fn write_states(writer: &mut JsonWriter, states: &IndexMap<String, String>) -> Result<()> {
    writer.begin_object()?;
    for (name, value) in states.iter() {
        writer.key(name)?.string(value)?;
    }
    writer.end_object()?;
    Ok(())
}

impl JsonResource for BlockState {
    const CATEGORY: Category = Category::BlockState;

    fn write(&self, _version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        if let Some(variants) = &self.variants {
            writer.key("variants")?.begin_object()?;
            for (state, variant) in variants.iter() {
                writer.key(state)?;
                write_models(writer, &variant.0)?;
            }
            writer.end_object()?;
        }
        if let Some(multipart) = &self.multipart {
            writer.key("multipart")?.begin_array()?;
            for case in multipart.iter() {
                writer.begin_object()?;
                if let Some(when) = &case.when {
                    writer.key("when")?;
                    when.write(writer)?;
                }
                writer.key("apply")?;
                write_models(writer, &case.apply)?;
                writer.extra(&case.extra)?.end_object()?;
            }
            writer.end_array()?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

fn default_1() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_round_trip() {
        let data = br#"{"variants":{"facing=east":{"model":"minecraft:block/furnace","y":90},"facing=north":[{"model":"minecraft:block/a","uvlock":true},{"model":"minecraft:block/b","weight":3}]}}"#;
        let block_state = BlockState::decode(data).unwrap();
        let variants = block_state.variants.as_ref().unwrap();
        assert_eq!(variants["facing=east"].0.len(), 1);
        assert_eq!(variants["facing=north"].0[1].weight, 3);
        assert_eq!(block_state.encode(1).unwrap(), data.to_vec());
    }

    #[test]
    fn multipart_round_trip() {
        let data = br#"{"multipart":[{"apply":{"model":"minecraft:block/fence_post"}},{"when":{"north":"true"},"apply":{"model":"minecraft:block/fence_side","uvlock":true}},{"when":{"OR":[{"east":"side"},{"west":"up"}]},"apply":[{"model":"minecraft:block/a"},{"model":"minecraft:block/b"}]}]}"#;
        let block_state = BlockState::decode(data).unwrap();
        let multipart = block_state.multipart.as_ref().unwrap();
        assert_eq!(multipart.len(), 3);
        assert!(matches!(multipart[2].when, Some(When::Many(_))));
        assert_eq!(block_state.encode(1).unwrap(), data.to_vec());
    }

    #[test]
    fn unknown_case_fields_are_kept() {
        let data = br#"{"multipart":[{"apply":{"model":"minecraft:block/a"},"__comment":"keep"}]}"#;
        let block_state = BlockState::decode(data).unwrap();
        let case = &block_state.multipart.as_ref().unwrap()[0];
        assert_eq!(case.extra.get("__comment"), Some(&Value::from("keep")));
        assert_eq!(block_state.encode(1).unwrap(), data.to_vec());
    }

    #[test]
    fn unqualified_models_gain_namespace() {
        let block_state =
            BlockState::decode(br#"{"variants":{"":{"model":"block/stone"}}}"#).unwrap();
        assert_eq!(
            block_state.encode(1).unwrap(),
            br#"{"variants":{"":{"model":"minecraft:block/stone"}}}"#.to_vec()
        );
    }
}
