use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};
use tracing::{debug, info, warn};

use crate::{
    coerce::kind,
    error::{Error, Result},
};

/// Backing storage for a [`ConfigStore`](crate::ConfigStore).
///
/// `read` is called on construction and on every reload; `write` after every
/// persisting mutation with the complete mapping.
pub trait Persistence {
    /// Identifies the backing resource.
    fn location(&self) -> &Path;

    fn read(&self) -> Result<Map<String, Value>>;

    fn write(&self, data: &Map<String, Value>) -> Result<()>;
}

/// A JSON file on disk.
///
/// A missing file is created holding `{}`. A file that cannot be read or
/// parsed, or whose root is not an object, loads as an empty mapping unless
/// the file was opened in strict mode.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    strict: bool,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            strict: false,
        }
    }

    /// Surface read and parse failures instead of loading an empty mapping.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn recover(&self, reason: &dyn std::fmt::Display) -> Map<String, Value> {
        warn!(
            "Config file {:?} could not be loaded, using empty config: {}",
            self.path, reason
        );
        Map::new()
    }
}

impl Persistence for JsonFile {
    fn location(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Map<String, Value>> {
        if !self.path.is_file() {
            fs::write(&self.path, "{}")?;
            info!("Created empty config file {:?}", self.path);
            return Ok(Map::new());
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if self.strict => return Err(Error::Io(e)),
            Err(e) => return Ok(self.recover(&e)),
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => {
                debug!("Loaded {} top-level keys from {:?}", map.len(), self.path);
                Ok(map)
            }
            Ok(other) if self.strict => Err(Error::NotAnObject(kind(&other))),
            Ok(other) => Ok(self.recover(&format!("root is {}", kind(&other)))),
            Err(source) if self.strict => Err(Error::Parse {
                path: self.path.clone(),
                source,
            }),
            Err(source) => Ok(self.recover(&source)),
        }
    }

    fn write(&self, data: &Map<String, Value>) -> Result<()> {
        let contents = to_json_pretty(data)?;
        fs::write(&self.path, contents).map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!("Wrote config file {:?}", self.path);
        Ok(())
    }
}

/// Pretty-prints `value` as JSON with a four space indent. Non-ASCII
/// characters are written as-is.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}
