//! # Option Storage
//!
//! The host keeps settings in a generic key-value option store. This module hides it
//! behind the [`SettingsStore`] trait so the rest of the crate works with a typed
//! [`DirectoryConfig`] instead of ad hoc lookups.
//!
//! ## Implementations
//!
//! - [`fs::FileSettingsStore`]: production storage. All options live in one JSON object
//!   at `<site>/.docgen/options.json`, keyed by option name.
//! - [`memory::InMemorySettingsStore`]: no persistence, used by tests.
//!
//! ```text
//! .docgen/
//! ├── options.json    # {"docgen_settings": {...}, "docgen_active_modules": [...], ...}
//! └── config.json     # site layout and logging (see config.rs)
//! ```

use crate::error::Result;
use crate::model::DirectoryConfig;

pub mod fs;
pub mod memory;

/// Option name of the settings record.
pub const SETTINGS_KEY: &str = "docgen_settings";

/// Option name of the list of active module slugs.
pub const ACTIVE_MODULES_KEY: &str = "docgen_active_modules";

pub trait SettingsStore {
    /// Load the settings record, `None` when it was never written.
    fn load(&self) -> Result<Option<DirectoryConfig>>;

    /// Replace the settings record.
    fn save(&mut self, config: &DirectoryConfig) -> Result<()>;

    /// Slugs of the active modules, in activation order. Empty when never written.
    fn load_active_modules(&self) -> Result<Vec<String>>;

    fn save_active_modules(&mut self, slugs: &[String]) -> Result<()>;
}
