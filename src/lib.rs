pub mod coerce;
pub mod env;
pub mod error;
pub mod format;
pub mod options;
pub mod path;
pub mod persist;
pub mod store;

pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::{Error, Result};
pub use options::{StoreOptions, StoreOptionsBuilder};
pub use persist::{JsonFile, Persistence};
pub use store::ConfigStore;

// used by submit_format!
#[doc(hidden)]
pub use inventory;
