//! Configuration loading and management for the Service Record Engine.
//!
//! This module loads derivation settings from YAML: the planned durations used
//! when no support plan applies, the absence label, and the addon master names
//! that feed facility-wide defaults.
//!
//! # Example
//!
//! ```no_run
//! use service_record_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Addon names: {:?}", config.config().addon_names);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AddonNames, EngineConfig, FallbackDurations};
