//! Dot-path helpers.
//!
//! A dot-path such as `"server.port"` addresses one position in a nested
//! mapping, one segment per level. Segments are taken literally: `"a..b"`
//! has an empty middle segment and addresses the key `""` under `"a"`.

/// Splits a dot-path into its segments.
pub fn segments(path: &str) -> std::str::Split<'_, char> {
    path.split('.')
}

/// Splits a dot-path into the parent segments and the final segment.
pub fn split_last(path: &str) -> (Vec<&str>, &str) {
    match path.rsplit_once('.') {
        Some((parent, last)) => (segments(parent).collect(), last),
        None => (Vec::new(), path),
    }
}

/// Derives the environment variable probed for `path`: dots become
/// underscores and the result is upper-cased.
///
/// `"server.port"` becomes `"SERVER_PORT"`.
pub fn env_key(path: &str) -> String {
    path.replace('.', "_").to_uppercase()
}

/// Joins a key onto a parent dot-path. `None` is the root; `Some("")` is a
/// top-level key that is itself empty.
pub(crate) fn join(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{key}"),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_keep_empty_parts() {
        let parts: Vec<_> = segments("a..b").collect();
        assert_eq!(parts, vec!["a", "", "b"]);
    }

    #[test]
    fn test_split_last() {
        assert_eq!(split_last("server.http.port"), (vec!["server", "http"], "port"));
        assert_eq!(split_last("debug"), (Vec::<&str>::new(), "debug"));
    }

    #[test]
    fn test_env_key() {
        assert_eq!(env_key("server.port"), "SERVER_PORT");
        assert_eq!(env_key("debug"), "DEBUG");
        assert_eq!(env_key("db.Max-Conn"), "DB_MAX-CONN");
    }

    #[test]
    fn test_join() {
        assert_eq!(join(None, "a"), "a");
        assert_eq!(join(Some(""), "a"), ".a");
        assert_eq!(join(Some("a.b"), "c"), "a.b.c");
    }
}
