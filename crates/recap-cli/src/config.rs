//! Config file loading and command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use recap_core::{RecapConfig, RecapConfigBuilder};
use tracing::debug;

use crate::cli::GlobalArgs;

/// `<config dir>/recap/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("recap").join("config.toml"))
}

/// Resolve the engine configuration.
///
/// An explicit `--config` file must exist; the default file is optional.
/// Flags and environment variables override file values.
pub fn load(args: &GlobalArgs) -> Result<RecapConfig> {
    let base = match &args.config {
        Some(path) => read_config_file(path)?,
        None => match default_config_path().filter(|path| path.is_file()) {
            Some(path) => read_config_file(&path)?,
            None => RecapConfig::default(),
        },
    };

    Ok(apply_overrides(base, args))
}

fn read_config_file(path: &Path) -> Result<RecapConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn apply_overrides(config: RecapConfig, args: &GlobalArgs) -> RecapConfig {
    let mut builder = RecapConfigBuilder::from_config(config);
    if let Some(url) = &args.base_url {
        builder = builder.base_url(url.as_str());
    }
    if let Some(concurrency) = args.concurrency {
        builder = builder.concurrency(concurrency);
    }
    if let Some(secs) = args.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}
