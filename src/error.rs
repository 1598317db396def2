use std::path::PathBuf;

use thiserror::Error;

use crate::options::StoreOptionsBuilderError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the backing file failed. The mutation that triggered the
    /// write stays applied in memory; only the file is out of date.
    #[error("Failed to write config file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backing file could not be parsed. Only returned by stores opened
    /// with `strict` set; otherwise a malformed file loads as empty.
    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Input had the wrong shape, e.g. a JSON document whose root is an
    /// array where a mapping is required.
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[cfg(feature = "yaml")]
    #[error("YAML Serialization: {0}")]
    YamlSerialization(#[from] serde_yaml::Error),

    #[cfg(feature = "toml")]
    #[error("TOML Serialization: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// The format is known but its serializer was not compiled in.
    ///
    /// # How to Fix
    ///
    /// Enable the matching cargo feature:
    ///
    /// ```toml
    /// dotpath-config = { version = "0.1", features = ["yaml", "toml"] }
    /// ```
    #[error("Missing optional dependency for format: {0}")]
    MissingFormat(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid store options: {0}")]
    Options(#[from] StoreOptionsBuilderError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
