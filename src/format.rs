//! Export formats.
//!
//! JSON is always available. Other formats are looked up at call time in a
//! registry that serializers join through [`submit_format!`](crate::submit_format).
//! The crate registers `yaml` and `toml` when the cargo features of the same
//! name are enabled.
//!
//! # Example
//!
//! ```rust
//! use dotpath_config::{Result, submit_format};
//! use serde_json::{Map, Value};
//!
//! fn key_list(data: &Map<String, Value>) -> Result<String> {
//!     Ok(data.keys().cloned().collect::<Vec<_>>().join("\n"))
//! }
//!
//! submit_format!("keys", key_list);
//! # fn main() {}
//! ```

use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    persist::to_json_pretty,
};

pub const JSON: &str = "json";

/// Formats the crate knows about but may have been built without.
const OPTIONAL: [&str; 2] = ["yaml", "toml"];

pub type SerializeFn = fn(&Map<String, Value>) -> Result<String>;

pub struct RegisteredFormat {
    pub name: &'static str,
    pub serialize: SerializeFn,
}

impl RegisteredFormat {
    pub const fn new(name: &'static str, serialize: SerializeFn) -> Self {
        Self { name, serialize }
    }
}

inventory::collect!(RegisteredFormat);

#[macro_export]
macro_rules! submit_format {
    ($name:expr, $serialize:path) => {
        $crate::inventory::submit! {
            $crate::format::RegisteredFormat::new($name, $serialize)
        }
    };
}

#[cfg(feature = "yaml")]
fn to_yaml(data: &Map<String, Value>) -> Result<String> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(feature = "yaml")]
inventory::submit! {
    RegisteredFormat::new("yaml", to_yaml)
}

/// TOML has no null, so null object entries and array items are left out.
#[cfg(feature = "toml")]
fn to_toml(data: &Map<String, Value>) -> Result<String> {
    Ok(toml::to_string_pretty(&without_nulls(data))?)
}

#[cfg(feature = "toml")]
fn without_nulls(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter_map(|(key, value)| non_null(value).map(|value| (key.clone(), value)))
        .collect()
}

#[cfg(feature = "toml")]
fn non_null(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(Value::Array(items.iter().filter_map(non_null).collect())),
        Value::Object(map) => Some(Value::Object(without_nulls(map))),
        other => Some(other.clone()),
    }
}

#[cfg(feature = "toml")]
inventory::submit! {
    RegisteredFormat::new("toml", to_toml)
}

/// Finds the registered serializer for `name`.
pub fn lookup(name: &str) -> Option<SerializeFn> {
    inventory::iter::<RegisteredFormat>
        .into_iter()
        .find(|format| format.name == name)
        .map(|format| format.serialize)
}

/// Names of every format `serialize` currently accepts.
pub fn available() -> Vec<&'static str> {
    let mut names = vec![JSON];
    for format in inventory::iter::<RegisteredFormat> {
        if !names.contains(&format.name) {
            names.push(format.name);
        }
    }
    names
}

pub fn serialize(data: &Map<String, Value>, format: &str) -> Result<String> {
    if format == JSON {
        return Ok(to_json_pretty(data)?);
    }

    match lookup(format) {
        Some(serialize) => serialize(data),
        None if OPTIONAL.contains(&format) => Err(Error::MissingFormat(format.to_string())),
        None => Err(Error::UnsupportedFormat(format.to_string())),
    }
}
