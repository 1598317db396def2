use dotpath_config::{ConfigStore, Error};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("app.json");

    // Open the store
    // The file doesn't exist yet, so it is created holding `{}`
    let mut store = ConfigStore::open(&path)?;

    // Every set writes the whole file back
    store.set("app.name", "MyApp")?;
    store.set_many([
        ("server.host", json!("localhost")),
        ("server.port", json!(8080)),
        ("debug", json!("yes")),
    ])?;

    println!("{store}");
    for key in &store {
        println!("  {key} = {}", store.get(&key).unwrap_or_default());
    }

    // Typed getters coerce, falling back to a default on failure
    let port = store.get_int("server.port").unwrap_or(80);
    let debug = store.get_bool("debug").unwrap_or(false);
    println!("port={port} debug={debug}");

    // APP_NAME=Other in the environment would take precedence here
    println!("name={}", store.get_str("app.name").unwrap_or_default());

    let removed = store.delete(["debug", "not.there"])?;
    println!("Removed: {}", serde_json::Value::Object(removed));

    // YAML needs the `yaml` feature, which is on by default
    match store.export("yaml") {
        Ok(yaml) => println!("As YAML:\n{yaml}"),
        Err(Error::MissingFormat(name)) => println!("No {name} support compiled in"),
        Err(e) => return Err(e.into()),
    }

    match store.export("ini") {
        Ok(_) => println!("Export succeeded"),
        Err(Error::UnsupportedFormat(name)) => println!("Export failed (expected): {name}"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
