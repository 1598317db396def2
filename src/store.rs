//! Dot-path configuration store.
//!
//! This module provides the [`ConfigStore`] type, the main entry point for
//! reading and changing a JSON configuration file. Values are addressed with
//! dot-paths (`"server.port"`), and each lookup first checks the environment
//! for an override (`SERVER_PORT`).
//!
//! # Overview
//!
//! The [`ConfigStore`]:
//!
//! - Loads the whole file into memory when it is opened
//! - Resolves dot-paths, preferring environment overrides
//! - Coerces raw values with typed getters
//! - Writes the full mapping back after every mutation (except [`clear`](ConfigStore::clear))
//!
//! # Example
//!
//! ```rust,no_run
//! use dotpath_config::ConfigStore;
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = ConfigStore::open("settings.json")?;
//!
//!     store.set("server.host", "localhost")?;
//!     store.set("server.port", 8080)?;
//!
//!     // SERVER_PORT=9090 in the environment would win here
//!     let port = store.get_int("server.port").unwrap_or(80);
//!     println!("Listening on port {port}");
//!
//!     store.merge(json!({"server": {"tls": true}}).as_object().cloned().unwrap_or_default())?;
//!     assert_eq!(store.get("server.host"), Some(json!("localhost")));
//!
//!     Ok(())
//! }
//! ```
use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    coerce::{self, kind},
    env::{EnvSource, ProcessEnv},
    error::{Error, Result},
    format,
    options::StoreOptions,
    path,
    persist::{JsonFile, Persistence},
};

/// An in-memory copy of a JSON configuration file with dot-path access.
///
/// `ConfigStore` is responsible for:
///
/// - Holding the configuration as a nested mapping whose root is always an object
/// - Resolving dot-paths, with environment variables taking precedence
/// - Applying `set`/`delete`/`merge` and persisting the result
/// - Exporting and importing the whole mapping
///
/// The store is the only owner of its mapping. Lookups return copies, and
/// [`data`](ConfigStore::data) only hands out a shared borrow.
///
/// # Lifecycle
///
/// 1. **Open**: [`open`](ConfigStore::open) reads the file, creating it if missing
/// 2. **Access**: [`get`](ConfigStore::get), [`has`](ConfigStore::has) and the typed getters
/// 3. **Mutate**: [`set`](ConfigStore::set), [`delete`](ConfigStore::delete), [`merge`](ConfigStore::merge), each persisting once
/// 4. **Refresh**: [`reload`](ConfigStore::reload) picks up changes made by other processes
///
/// Two stores opened on the same file do not coordinate; the last write wins.
pub struct ConfigStore {
    backend: Box<dyn Persistence>,
    env: Box<dyn EnvSource>,
    env_override: bool,
    data: Map<String, Value>,
}

impl ConfigStore {
    /// Opens the JSON file at `path` with environment overrides enabled.
    ///
    /// If the file does not exist it is created holding `{}`. A file that
    /// cannot be parsed loads as an empty configuration; use
    /// [`with_options`](ConfigStore::with_options) with `strict` set to get
    /// an error instead.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use dotpath_config::ConfigStore;
    ///
    /// let store = ConfigStore::open("./config.json")?;
    /// println!("{store}");
    /// # Ok::<(), dotpath_config::Error>(())
    /// ```
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_options(StoreOptions::builder().path(path).build()?)
    }

    pub fn with_options(options: StoreOptions) -> Result<Self> {
        let backend = JsonFile::new(options.path).strict(options.strict);
        Self::with_parts(backend, ProcessEnv, options.env_override)
    }

    /// Builds a store from explicit collaborators.
    ///
    /// This is how tests and embedders supply a fixed environment
    /// ([`MapEnv`](crate::MapEnv)) or a different backing store.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use dotpath_config::{ConfigStore, JsonFile, MapEnv};
    ///
    /// let env = MapEnv::new().with("SERVER_PORT", "9090");
    /// let store = ConfigStore::with_parts(JsonFile::new("app.json"), env, true)?;
    /// assert_eq!(store.get_int("server.port"), Some(9090));
    /// # Ok::<(), dotpath_config::Error>(())
    /// ```
    pub fn with_parts(
        backend: impl Persistence + 'static,
        env: impl EnvSource + 'static,
        env_override: bool,
    ) -> Result<Self> {
        let data = backend.read()?;

        Ok(Self {
            backend: Box::new(backend),
            env: Box::new(env),
            env_override,
            data,
        })
    }

    /// The backing resource.
    pub fn path(&self) -> &Path {
        self.backend.location()
    }

    /// The file name part of [`path`](ConfigStore::path).
    pub fn file(&self) -> &str {
        self.path()
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    pub fn env_override(&self) -> bool {
        self.env_override
    }

    pub fn set_env_override(&mut self, enabled: bool) {
        self.env_override = enabled;
    }

    /// A read-only view of the stored mapping. Environment overrides are
    /// not applied.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Resolves `path`.
    ///
    /// When environment overrides are enabled and the derived variable
    /// (`server.port` → `SERVER_PORT`) is set, its raw string is returned
    /// without looking at the stored data. Otherwise the stored mapping is
    /// walked one segment at a time; the walk stops with `None` as soon as a
    /// segment is missing or the current value is not an object.
    ///
    /// Array elements cannot be addressed: `"hosts.0"` never resolves.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use dotpath_config::ConfigStore;
    /// use serde_json::json;
    ///
    /// let mut store = ConfigStore::open("config.json")?;
    /// store.set("server.host", "localhost")?;
    ///
    /// assert_eq!(store.get("server.host"), Some(json!("localhost")));
    /// assert_eq!(store.get("server.host.name"), None);
    /// # Ok::<(), dotpath_config::Error>(())
    /// ```
    pub fn get(&self, path: &str) -> Option<Value> {
        match self.env_value(path) {
            Some(value) => Some(Value::String(value)),
            None => self.lookup(path).cloned(),
        }
    }

    pub fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }

    /// Resolves every path independently, filling in `default` for the
    /// ones that do not resolve.
    pub fn get_many<I, S>(&self, paths: I, default: Value) -> Map<String, Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .map(|path| {
                let path = path.as_ref();
                let value = self.get(path).unwrap_or_else(|| default.clone());
                (path.to_string(), value)
            })
            .collect()
    }

    /// Resolves `path` and deserializes it into `T`.
    ///
    /// Returns `None` if the path does not resolve or the value does not fit
    /// `T`. An environment override is always a string, so only string-like
    /// targets accept one.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        serde_json::from_value(self.get(path)?).ok()
    }

    /// True if `path` has an environment override or exists in the stored
    /// data, even when the stored value is `null`.
    pub fn has(&self, path: &str) -> bool {
        self.env_value(path).is_some() || self.lookup(path).is_some()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.has(path)
    }

    pub fn get_int(&self, path: &str) -> Option<i64> {
        self.get(path).as_ref().and_then(coerce::to_int)
    }

    pub fn get_float(&self, path: &str) -> Option<f64> {
        self.get(path).as_ref().and_then(coerce::to_float)
    }

    /// Resolves `path` as a boolean.
    ///
    /// `"true"`, `"yes"`, `"1"` and `"on"` are true; `"false"`, `"no"`, `"0"`
    /// and `"off"` are false, ignoring case and surrounding whitespace.
    /// Numbers are true when non-zero.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).as_ref().and_then(coerce::to_bool)
    }

    pub fn get_str(&self, path: &str) -> Option<String> {
        self.get(path).and_then(coerce::to_string)
    }

    /// Resolves `path` as a list. A string such as `"a, b,c"` is split on
    /// commas into trimmed string items.
    pub fn get_list(&self, path: &str) -> Option<Vec<Value>> {
        self.get(path).and_then(coerce::to_list)
    }

    pub fn get_map(&self, path: &str) -> Option<Map<String, Value>> {
        self.get(path).and_then(coerce::to_map)
    }

    /// Stores `value` at `path` and writes the file.
    ///
    /// Missing intermediate objects are created. An intermediate value that
    /// is not an object is replaced by one, discarding what was there.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use dotpath_config::ConfigStore;
    /// use serde_json::json;
    ///
    /// let mut store = ConfigStore::open("config.json")?;
    /// store.set("server", "plain")?;
    /// store.set("server.port", 8080)?;
    ///
    /// assert_eq!(store.get("server"), Some(json!({"port": 8080})));
    /// # Ok::<(), dotpath_config::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the file cannot be written. The in-memory
    /// value is set either way.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        self.insert(path, value.into());
        self.persist()
    }

    /// Stores every `(path, value)` pair in iteration order, then writes the
    /// file once.
    pub fn set_many<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (path, value) in pairs {
            self.insert(path.as_ref(), value.into());
        }
        self.persist()
    }

    /// Removes every path that exists and writes the file once.
    ///
    /// Returns the removed values keyed by path. Paths that were not present
    /// are left out.
    pub fn delete<I, S>(&mut self, paths: I) -> Result<Map<String, Value>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut deleted = Map::new();
        for path in paths {
            let path = path.as_ref();
            if let Some(value) = self.remove(path) {
                deleted.insert(path.to_string(), value);
            }
        }

        self.persist()?;
        Ok(deleted)
    }

    /// Deep-merges `incoming` into the stored data and writes the file.
    ///
    /// Objects present on both sides are merged key by key. Any other value
    /// replaces the existing one outright; arrays are not concatenated.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use dotpath_config::ConfigStore;
    /// use serde_json::{Map, Value, json};
    ///
    /// fn object(value: Value) -> Map<String, Value> {
    ///     value.as_object().cloned().unwrap_or_default()
    /// }
    ///
    /// let mut store = ConfigStore::open("config.json")?;
    /// store.merge(object(json!({"a": {"x": 1}})))?;
    /// store.merge(object(json!({"a": {"y": 2}})))?;
    ///
    /// assert_eq!(store.get("a"), Some(json!({"x": 1, "y": 2})));
    /// # Ok::<(), dotpath_config::Error>(())
    /// ```
    pub fn merge(&mut self, incoming: Map<String, Value>) -> Result<()> {
        deep_merge(&mut self.data, incoming);
        self.persist()
    }

    /// Replaces top-level keys with the ones in `data` (no deep merge), then
    /// writes the file.
    pub fn update(&mut self, data: Map<String, Value>) -> Result<()> {
        for (key, value) in data {
            self.data.insert(key, value);
        }
        self.persist()
    }

    /// Empties the store. The file is only rewritten when `persist` is true,
    /// so by default a [`reload`](ConfigStore::reload) brings the old data back.
    pub fn clear(&mut self, persist: bool) -> Result<()> {
        self.data.clear();
        if persist {
            self.persist()?;
        }
        Ok(())
    }

    /// Re-reads the backing file, discarding unsaved in-memory state.
    pub fn reload(&mut self) -> Result<()> {
        self.data = self.backend.read()?;
        Ok(())
    }

    /// Every leaf dot-path in depth-first, insertion order. Objects are
    /// descended into and never listed themselves.
    pub fn list_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_leaves(&self.data, None, &mut keys);
        keys
    }

    /// Number of leaf paths, not of top-level keys.
    pub fn len(&self) -> usize {
        self.list_keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::vec::IntoIter<String> {
        self.list_keys().into_iter()
    }

    /// An independent deep copy of the stored mapping.
    pub fn to_map(&self) -> Map<String, Value> {
        self.data.clone()
    }

    /// Serializes the stored mapping.
    ///
    /// `"json"` is always available. `"yaml"` and `"toml"` need their cargo
    /// features, and further formats can be registered with
    /// [`submit_format!`](crate::submit_format).
    ///
    /// # Errors
    ///
    /// - [`Error::MissingFormat`] - `yaml` or `toml` without the feature enabled
    /// - [`Error::UnsupportedFormat`] - any other unknown name
    /// - a serializer error if the data cannot be expressed in the format
    pub fn export(&self, format: &str) -> Result<String> {
        format::serialize(&self.data, format)
    }

    /// Merges `data` into the store, or replaces the store with it when
    /// `merge` is false. Writes the file either way.
    pub fn import_map(&mut self, data: Map<String, Value>, merge: bool) -> Result<()> {
        if merge {
            return self.merge(data);
        }

        self.data = data;
        self.persist()
    }

    /// Like [`import_map`](ConfigStore::import_map), taking a JSON document.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] - `json` is not valid JSON
    /// - [`Error::NotAnObject`] - the document's root is not an object
    pub fn import_json(&mut self, json: &str, merge: bool) -> Result<()> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(data) => self.import_map(data, merge),
            other => Err(Error::NotAnObject(kind(&other))),
        }
    }

    fn env_value(&self, path: &str) -> Option<String> {
        if !self.env_override {
            return None;
        }

        let key = path::env_key(path);
        let value = self.env.lookup(&key)?;
        debug!("Using environment override {} for {:?}", key, path);
        Some(value)
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path::segments(path);
        let mut current = self.data.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    fn insert(&mut self, path: &str, value: Value) {
        let (parents, last) = path::split_last(path);
        insert_at(&mut self.data, &parents, last, value);
    }

    fn remove(&mut self, path: &str) -> Option<Value> {
        let (parents, last) = path::split_last(path);
        let mut current = &mut self.data;
        for segment in parents {
            current = current.get_mut(segment)?.as_object_mut()?;
        }
        current.shift_remove(last)
    }

    fn persist(&self) -> Result<()> {
        self.backend.write(&self.data)
    }
}

/// Stores `value` under `last` below the `parents` chain. A parent that is
/// missing or not an object is replaced by a fresh object.
fn insert_at(map: &mut Map<String, Value>, parents: &[&str], last: &str, value: Value) {
    let Some((head, rest)) = parents.split_first() else {
        map.insert(last.to_string(), value);
        return;
    };

    match map.entry(*head).or_insert_with(|| Value::Object(Map::new())) {
        Value::Object(child) => insert_at(child, rest, last, value),
        slot => {
            let mut child = Map::new();
            insert_at(&mut child, rest, last, value);
            *slot = Value::Object(child);
        }
    }
}

fn deep_merge(target: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match value {
            Value::Object(nested) => match target.get_mut(&key) {
                Some(Value::Object(existing)) => deep_merge(existing, nested),
                _ => {
                    target.insert(key, Value::Object(nested));
                }
            },
            value => {
                target.insert(key, value);
            }
        }
    }
}

fn collect_leaves(map: &Map<String, Value>, prefix: Option<&str>, out: &mut Vec<String>) {
    for (key, value) in map {
        let path = path::join(prefix, key);
        match value {
            Value::Object(child) => collect_leaves(child, Some(&path), out),
            _ => out.push(path),
        }
    }
}

impl<'a> IntoIterator for &'a ConfigStore {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Config file='{}' keys={}>", self.file(), self.len())
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("path", &self.path())
            .field("env_override", &self.env_override)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_deep_merge_replaces_arrays() {
        let mut target = object(json!({"a": {"list": [1, 2], "keep": true}, "b": 1}));
        deep_merge(&mut target, object(json!({"a": {"list": [3]}, "b": {"now": "object"}})));

        assert_eq!(
            Value::Object(target),
            json!({"a": {"list": [3], "keep": true}, "b": {"now": "object"}})
        );
    }

    #[test]
    fn test_insert_at_overwrites_scalars() {
        let mut map = object(json!({"a": 5, "keep": true}));
        insert_at(&mut map, &["a", "b"], "c", json!(1));
        assert_eq!(Value::Object(map), json!({"a": {"b": {"c": 1}}, "keep": true}));
    }

    #[test]
    fn test_insert_at_keeps_existing_objects() {
        let mut map = object(json!({"a": {"x": 1}}));
        insert_at(&mut map, &["a"], "y", json!(2));
        assert_eq!(Value::Object(map), json!({"a": {"x": 1, "y": 2}}));
    }

    #[test]
    fn test_collect_leaves_skips_empty_objects() {
        let map = object(json!({"a": {}, "b": {"c": null, "d": [1]}, "e": 0}));
        let mut out = Vec::new();
        collect_leaves(&map, None, &mut out);
        assert_eq!(out, vec!["b.c", "b.d", "e"]);
    }

    #[test]
    fn test_collect_leaves_keeps_empty_top_level_key() {
        let map = object(json!({"": {"a": 1}, "b": {"": 2}}));
        let mut out = Vec::new();
        collect_leaves(&map, None, &mut out);
        assert_eq!(out, vec![".a", "b."]);
    }
}
