//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.kacky/config.toml` (global user preferences)
//! 3. **Project config** - `./.kacky/config.toml` (directory-specific overrides)
//! 4. **Environment** - `KACKY_API_URL`, `KACKY_TOKEN`
//! 5. **CLI arguments** - Command-line flags (highest priority, applied by the CLI)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::types::{ApiConfig, CountdownSettings, KackyConfig, PollerSettings};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "KACKY_API_URL";

/// Environment variable holding the bearer token.
pub const ENV_TOKEN: &str = "KACKY_TOKEN";

/// Load configuration from the hierarchy of config files and the environment.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed,
/// or if the merged configuration fails validation. Missing config files
/// are not errors.
pub fn load_hierarchy() -> Result<KackyConfig, ConfigError> {
    let mut paths = Vec::new();
    match user_config_path() {
        Ok(path) => paths.push(path),
        Err(e) => debug!(event = "core.config.user_config_skipped", reason = %e),
    }
    paths.push(project_config_path()?);

    let config = load_from_paths(&paths)?;
    let config = apply_env_overrides(config, |key| std::env::var(key).ok());

    validate_config(&config)?;

    Ok(config)
}

/// Path of the user config file (`~/.kacky/config.toml`).
pub fn user_config_path() -> Result<PathBuf, ConfigError> {
    let home_dir = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
    Ok(home_dir.join(".kacky").join("config.toml"))
}

/// Path of the project config file (`./.kacky/config.toml`).
pub fn project_config_path() -> Result<PathBuf, ConfigError> {
    Ok(std::env::current_dir()?.join(".kacky").join("config.toml"))
}

/// Load and merge config files in order, later files overriding earlier ones.
///
/// Missing files are skipped.
pub fn load_from_paths(paths: &[PathBuf]) -> Result<KackyConfig, ConfigError> {
    let mut config = KackyConfig::default();

    for path in paths {
        if let Some(file_config) = load_config_file(path)? {
            debug!(
                event = "core.config.file_loaded",
                path = %path.display(),
            );
            config = merge_configs(config, file_config);
        }
    }

    Ok(config)
}

/// Load a configuration file, returning `None` if it does not exist.
fn load_config_file(path: &Path) -> Result<Option<KackyConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Merge two configurations, with override_config taking precedence.
///
/// Override values replace base values only where present.
pub fn merge_configs(base: KackyConfig, override_config: KackyConfig) -> KackyConfig {
    KackyConfig {
        api: ApiConfig {
            url: override_config.api.url.or(base.api.url),
            timeout_secs: override_config.api.timeout_secs.or(base.api.timeout_secs),
            token: override_config.api.token.or(base.api.token),
        },
        poller: PollerSettings {
            interval_secs: override_config
                .poller
                .interval_secs
                .or(base.poller.interval_secs),
            refetch_on_focus: override_config
                .poller
                .refetch_on_focus
                .or(base.poller.refetch_on_focus),
        },
        countdown: CountdownSettings {
            fixed_offset_secs: override_config
                .countdown
                .fixed_offset_secs
                .or(base.countdown.fixed_offset_secs),
        },
        event: override_config.event.or(base.event),
    }
}

/// Apply `KACKY_API_URL` and `KACKY_TOKEN` on top of file configuration.
///
/// Blank values are ignored.
pub fn apply_env_overrides<F>(mut config: KackyConfig, lookup: F) -> KackyConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.api.url = Some(url);
    }
    if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
        config.api.token = Some(token);
    }
    config
}
