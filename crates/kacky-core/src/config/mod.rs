//! # Configuration System
//!
//! Hierarchical TOML configuration for kacky.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.kacky/config.toml`
//! 3. **Project config** - `./.kacky/config.toml`
//! 4. **Environment** - `KACKY_API_URL`, `KACKY_TOKEN`
//! 5. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use kacky_core::config::KackyConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = KackyConfig::load_hierarchy()?;
//!     println!("polling {} every {}s", config.api.url(), config.poller.interval_secs());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use types::{ApiConfig, CountdownSettings, KackyConfig, PollerSettings};
pub use validation::validate_config;

impl KackyConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
