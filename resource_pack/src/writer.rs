//! Canonical JSON writer.
//!
//! Streams minified JSON straight into a string without building a value tree
//! first. Keys are emitted in call order, numbers in their shortest
//! round-trippable form and misuse is reported instead of producing malformed
//! output.

use serde_json::{Map, Value};

use crate::{key::Key, Error, Result};

#[derive(Debug, Default)]
pub struct JsonWriter {
    output: String,
    scopes: Vec<Scope>,
    started: bool,
}

#[derive(Debug)]
enum Scope {
    Object {
        keys: Vec<String>,
        awaiting_value: bool,
    },
    Array {
        empty: bool,
    },
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_object(&mut self) -> Result<&mut Self> {
        self.before_value()?;
        self.output.push('{');
        self.scopes.push(Scope::Object {
            keys: Vec::new(),
            awaiting_value: false,
        });
        Ok(self)
    }

    pub fn end_object(&mut self) -> Result<&mut Self> {
        match self.scopes.last() {
            Some(Scope::Object {
                awaiting_value: false,
                ..
            }) => {}
            Some(Scope::Object { .. }) => {
                return Err(Error::InvalidWriterState("object closed after key"))
            }
            _ => return Err(Error::InvalidWriterState("no object to close")),
        }
        self.scopes.pop();
        self.output.push('}');
        Ok(self)
    }

    pub fn begin_array(&mut self) -> Result<&mut Self> {
        self.before_value()?;
        self.output.push('[');
        self.scopes.push(Scope::Array { empty: true });
        Ok(self)
    }

    pub fn end_array(&mut self) -> Result<&mut Self> {
        if !matches!(self.scopes.last(), Some(Scope::Array { .. })) {
            return Err(Error::InvalidWriterState("no array to close"));
        }
        self.scopes.pop();
        self.output.push(']');
        Ok(self)
    }

    pub fn key(&mut self, name: &str) -> Result<&mut Self> {
        let Some(Scope::Object {
            keys,
            awaiting_value,
        }) = self.scopes.last_mut()
        else {
            return Err(Error::InvalidWriterState("key outside of object"));
        };
        if *awaiting_value {
            return Err(Error::InvalidWriterState("key after key"));
        }
        if keys.iter().any(|key| key == name) {
            return Err(Error::InvalidWriterState("duplicate key"));
        }
        if !keys.is_empty() {
            self.output.push(',');
        }
        keys.push(name.to_owned());
        *awaiting_value = true;
        escape(&mut self.output, name);
        self.output.push(':');
        Ok(self)
    }

    /// Returns true if the innermost open object already has the given key.
    pub fn contains_key(&self, name: &str) -> bool {
        matches!(self.scopes.last(), Some(Scope::Object { keys, .. }) if keys.iter().any(|key| key == name))
    }

    pub fn string(&mut self, value: &str) -> Result<&mut Self> {
        self.before_value()?;
        escape(&mut self.output, value);
        Ok(self)
    }

    pub fn resource_key(&mut self, value: &Key) -> Result<&mut Self> {
        self.string(&value.to_string())
    }

    pub fn bool(&mut self, value: bool) -> Result<&mut Self> {
        self.before_value()?;
        self.output.push_str(if value { "true" } else { "false" });
        Ok(self)
    }

    pub fn int(&mut self, value: i64) -> Result<&mut Self> {
        self.before_value()?;
        self.output.push_str(&value.to_string());
        Ok(self)
    }

    pub fn uint(&mut self, value: u64) -> Result<&mut Self> {
        self.before_value()?;
        self.output.push_str(&value.to_string());
        Ok(self)
    }

    pub fn float(&mut self, value: f32) -> Result<&mut Self> {
        if !value.is_finite() {
            return Err(Error::NonFiniteNumber);
        }
        self.before_value()?;
        if value == 0.0 {
            self.output.push('0');
        } else {
            push_finite(&mut self.output, value);
        }
        Ok(self)
    }

    pub fn double(&mut self, value: f64) -> Result<&mut Self> {
        if !value.is_finite() {
            return Err(Error::NonFiniteNumber);
        }
        self.before_value()?;
        if value == 0.0 {
            self.output.push('0');
        } else {
            push_finite(&mut self.output, value);
        }
        Ok(self)
    }

    pub fn null(&mut self) -> Result<&mut Self> {
        self.before_value()?;
        self.output.push_str("null");
        Ok(self)
    }

    /// Replays an already parsed value, objects keep their key order.
    pub fn json(&mut self, value: &Value) -> Result<&mut Self> {
        match value {
            Value::Null => self.null(),
            Value::Bool(value) => self.bool(*value),
            Value::Number(number) => {
                if let Some(value) = number.as_u64() {
                    self.uint(value)
                } else if let Some(value) = number.as_i64() {
                    self.int(value)
                } else {
                    self.double(number.as_f64().ok_or(Error::NonFiniteNumber)?)
                }
            }
            Value::String(value) => self.string(value),
            Value::Array(values) => {
                self.begin_array()?;
                for value in values {
                    self.json(value)?;
                }
                self.end_array()
            }
            Value::Object(fields) => {
                self.begin_object()?;
                for (name, value) in fields {
                    self.key(name)?.json(value)?;
                }
                self.end_object()
            }
        }
    }

    /// Emits preserved fields of the innermost object, fields that were
    /// already written take precedence.
    pub fn extra(&mut self, fields: &Map<String, Value>) -> Result<&mut Self> {
        for (name, value) in fields {
            if self.contains_key(name) {
                continue;
            }
            self.key(name)?.json(value)?;
        }
        Ok(self)
    }

    /// Completes the document, failing if a scope is still open or nothing
    /// was written.
    pub fn finish(self) -> Result<String> {
        if !self.started || !self.scopes.is_empty() {
            return Err(Error::InvalidWriterState("incomplete document"));
        }
        Ok(self.output)
    }

    fn before_value(&mut self) -> Result<()> {
        match self.scopes.last_mut() {
            None => {
                if self.started {
                    return Err(Error::InvalidWriterState("multiple root values"));
                }
                self.started = true;
            }
            Some(Scope::Object { awaiting_value, .. }) => {
                if !*awaiting_value {
                    return Err(Error::InvalidWriterState("value without key"));
                }
                *awaiting_value = false;
            }
            Some(Scope::Array { empty }) => {
                if !*empty {
                    self.output.push(',');
                }
                *empty = false;
            }
        }
        Ok(())
    }
}

// shortest round-trip digits, integral values lose the ".0"
fn push_finite<F: ryu::Float>(output: &mut String, value: F) {
    let mut buffer = ryu::Buffer::new();
    let formatted = buffer.format_finite(value);
    output.push_str(formatted.strip_suffix(".0").unwrap_or(formatted));
}

fn escape(output: &mut String, value: &str) {
    output.push('"');
    for char in value.chars() {
        match char {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '\u{8}' => output.push_str("\\b"),
            '\u{c}' => output.push_str("\\f"),
            '\u{0}'..='\u{1f}' | '\u{7f}' | '\u{2028}' | '\u{2029}' => {
                output.push_str(&format!("\\u{:04x}", char as u32))
            }
            _ => output.push(char),
        }
    }
    output.push('"');
}
