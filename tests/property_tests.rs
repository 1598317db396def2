//! Property-based tests for path resolution and bulk operations.

use dotpath_config::{ConfigStore, JsonFile, MapEnv};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

/// Dot-paths of one to four lowercase segments.
fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9_]{0,6}", 1..=4).prop_map(|segments| segments.join("."))
}

/// Leaf values only; objects would make the path a branch.
fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,12}".prop_map(Value::from),
        prop::collection::vec(any::<i32>().prop_map(Value::from), 0..4).prop_map(Value::from),
    ]
}

fn fresh_store(dir: &tempfile::TempDir) -> ConfigStore {
    ConfigStore::with_parts(JsonFile::new(dir.path().join("config.json")), MapEnv::new(), true)
        .unwrap()
}

proptest! {
    #[test]
    fn set_then_get_returns_value(path in path_strategy(), value in leaf_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh_store(&dir);

        store.set(&path, value.clone()).unwrap();
        prop_assert_eq!(store.get(&path), Some(value));
    }

    #[test]
    fn env_override_beats_stored_value(path in path_strategy(), value in leaf_strategy(), env in "[ -~]{0,12}") {
        let dir = tempfile::tempdir().unwrap();
        let env_source = MapEnv::new().with(path.replace('.', "_").to_uppercase(), env.clone());
        let mut store = ConfigStore::with_parts(
            JsonFile::new(dir.path().join("config.json")),
            env_source,
            true,
        )
        .unwrap();

        store.set(&path, value).unwrap();
        prop_assert_eq!(store.get(&path), Some(json!(env)));
    }

    #[test]
    fn listed_keys_are_leaves(pairs in prop::collection::vec((path_strategy(), leaf_strategy()), 0..12)) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh_store(&dir);
        store.set_many(pairs).unwrap();

        let keys = store.list_keys();
        prop_assert_eq!(keys.len(), store.len());
        for key in keys {
            let value = store.get(&key);
            prop_assert!(value.is_some_and(|v| !v.is_object()), "{} is not a leaf", key);
        }
    }

    #[test]
    fn delete_removes_path(path in path_strategy(), value in leaf_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh_store(&dir);
        store.set(&path, value.clone()).unwrap();

        let deleted = store.delete([&path]).unwrap();
        prop_assert_eq!(deleted.get(&path), Some(&value));
        prop_assert!(!store.has(&path));
        prop_assert!(store.delete([&path]).unwrap().is_empty());
    }

    #[test]
    fn json_export_import_round_trip(pairs in prop::collection::vec((path_strategy(), leaf_strategy()), 0..12)) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = fresh_store(&dir);
        store.set_many(pairs).unwrap();
        let original: Map<String, Value> = store.to_map();

        let exported = store.export("json").unwrap();
        store.clear(false).unwrap();
        store.import_json(&exported, false).unwrap();

        prop_assert_eq!(store.to_map(), original);
    }
}
