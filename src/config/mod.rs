// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - `model.rs`: TOML-backed data model.
//! - `loader.rs`: reading a config file from disk.
//! - `validate.rs`: checks run when converting the raw model into a
//!   [`ConfigFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str};
pub use model::{ConfigFile, ExecutorSection, RawConfigFile, SchedulerSection, TaskConfig};
