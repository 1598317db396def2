use dotpath_config::{ConfigStore, JsonFile, MapEnv, Result, format, submit_format};
use serde_json::{Map, Value, json};
use std::fs;

fn leaf_lines(data: &Map<String, Value>) -> Result<String> {
    Ok(data
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

submit_format!("lines", leaf_lines);

#[test]
fn test_registered_format_is_available() {
    assert!(format::available().contains(&"lines"));
    assert!(format::lookup("lines").is_some());
    assert!(format::lookup("xml").is_none());
}

#[test]
fn test_export_with_registered_format() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, json!({"a": 1, "b": "two"}).to_string()).unwrap();

    let store = ConfigStore::with_parts(JsonFile::new(&path), MapEnv::new(), false).unwrap();

    assert_eq!(store.export("lines").unwrap(), "a=1\nb=\"two\"");
}

#[cfg(all(feature = "yaml", feature = "toml"))]
#[test]
fn test_default_features_register_yaml_and_toml() {
    let names = format::available();
    assert!(names.contains(&"yaml"));
    assert!(names.contains(&"toml"));
}
