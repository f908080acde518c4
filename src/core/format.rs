// Document encoding: pretty (or compact) JSON text for a mapping, built fully in memory.
use serde::Serialize;
use serde_json::ser::{CompactFormatter, PrettyFormatter};
use serde_json::{Map, Serializer, Value};

use crate::core::error::{Error, ErrorKind};

pub const DEFAULT_INDENT: usize = 2;

/// Whether the temporary file is fsynced before it replaces the target.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Durability {
    #[default]
    Fast,
    Flush,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaveOptions {
    /// Spaces per nesting level; `0` writes a single compact line.
    pub indent: usize,
    /// Emit object keys in sorted order at every depth.
    pub sort_keys: bool,
    pub trailing_newline: bool,
    pub durability: Durability,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            sort_keys: false,
            trailing_newline: false,
            durability: Durability::Fast,
        }
    }
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    pub fn with_trailing_newline(mut self, trailing_newline: bool) -> Self {
        self.trailing_newline = trailing_newline;
        self
    }

    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }
}

pub(crate) fn encode_document(
    mapping: &Map<String, Value>,
    options: &SaveOptions,
) -> Result<Vec<u8>, Error> {
    let sorted;
    let document = if options.sort_keys {
        sorted = sort_map(mapping);
        &sorted
    } else {
        mapping
    };

    let mut out = Vec::with_capacity(256);
    let result = if options.indent == 0 {
        let mut ser = Serializer::with_formatter(&mut out, CompactFormatter);
        document.serialize(&mut ser)
    } else {
        let indent = vec![b' '; options.indent];
        let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
        document.serialize(&mut ser)
    };
    result.map_err(|err| {
        Error::new(ErrorKind::Serialization)
            .with_message("failed to encode mapping")
            .with_source(err)
    })?;

    if options.trailing_newline {
        out.push(b'\n');
    }
    Ok(out)
}

fn sort_map(map: &Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    entries
        .into_iter()
        .map(|(key, value)| (key.clone(), sort_value(value)))
        .collect()
}

fn sort_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(sort_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(sort_value).collect()),
        other => other.clone(),
    }
}
