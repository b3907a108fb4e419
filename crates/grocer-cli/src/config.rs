//! Layered settings: built-in defaults, an optional TOML file, then
//! `GROCER_*` environment variables. Command-line flags are applied on top
//! by `main`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use grocer_core::month::Navigation;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/grocer/config.toml";
const DEFAULT_STORE_PATH: &str = "~/.local/share/grocer/grocer.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite file holding the purchase list.
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// Carry the year over when stepping past December or before January.
  #[serde(default)]
  pub month_rollover: bool,
  /// Where the TUI writes its log. Without one the TUI logs nothing.
  #[serde(default)]
  pub log_file:       Option<PathBuf>,
}

fn default_store_path() -> PathBuf { PathBuf::from(DEFAULT_STORE_PATH) }

impl Settings {
  /// Read settings from `path` (may be missing) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(expand_tilde(path)).required(false))
      .add_source(config::Environment::with_prefix("GROCER"))
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    settings.log_file = settings.log_file.as_deref().map(expand_tilde);
    Ok(settings)
  }

  pub fn navigation(&self) -> Navigation {
    if self.month_rollover {
      Navigation::Rollover
    } else {
      Navigation::Wrap
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
