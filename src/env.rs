//! Environment lookup used for overrides.
//!
//! The store asks an [`EnvSource`] for the derived environment key of a
//! dot-path (see [`env_key`](crate::path::env_key)) before looking at its
//! own data. Any returned string, including an empty one, wins.

use std::collections::HashMap;

pub trait EnvSource {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
///
/// Variables whose value is not valid unicode are treated as unset.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of variables, useful for tests and for layering values that
/// did not come from the process environment.
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_lookup() {
        let env = MapEnv::new().with("SERVER_PORT", "9090").with("EMPTY", "");
        assert_eq!(env.lookup("SERVER_PORT").as_deref(), Some("9090"));
        assert_eq!(env.lookup("EMPTY").as_deref(), Some(""));
        assert_eq!(env.lookup("MISSING"), None);
    }

    #[test]
    fn test_map_env_from_iter() {
        let env: MapEnv = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(env.lookup("B").as_deref(), Some("2"));
    }
}
