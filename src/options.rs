use std::path::PathBuf;

use derive_builder::Builder;

/// How a [`ConfigStore`](crate::ConfigStore) is opened.
///
/// ```rust,no_run
/// use dotpath_config::{ConfigStore, StoreOptions};
///
/// let options = StoreOptions::builder()
///     .path("settings.json")
///     .env_override(false)
///     .build()?;
/// let store = ConfigStore::with_options(options)?;
/// # Ok::<(), dotpath_config::Error>(())
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct StoreOptions {
    /// The JSON file backing the store. Created if it does not exist.
    pub path: PathBuf,

    /// Let environment variables override stored values.
    #[builder(default = "true")]
    pub env_override: bool,

    /// Fail on an unreadable or malformed file instead of starting empty.
    #[builder(default)]
    pub strict: bool,
}

impl StoreOptions {
    pub fn builder() -> StoreOptionsBuilder {
        StoreOptionsBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = StoreOptions::builder().path("app.json").build().unwrap();
        assert_eq!(options.path, PathBuf::from("app.json"));
        assert!(options.env_override);
        assert!(!options.strict);
    }

    #[test]
    fn test_path_is_required() {
        let err = StoreOptions::builder().strict(true).build().unwrap_err();
        assert!(err.to_string().contains("path"));
    }
}
