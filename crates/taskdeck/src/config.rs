//! Host-environment configuration for the shell.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use taskdeck_app::{Preferences, Theme};

/// Returns the default preferences path (`~/.config/taskdeck/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskdeck").join("config.toml"))
}

/// Resolve the preferences path from an explicit override or the platform default.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(default_config_path)
        .context("Could not determine config directory")
}

/// Load preferences and resolve the effective theme.
pub fn load_preferences(path: &Path) -> Result<(Preferences, Theme)> {
    let prefs = Preferences::load(path)?;
    let theme = Theme::resolve(prefs.theme, ambient_prefers_dark());
    Ok((prefs, theme))
}

/// Record `theme` as the explicit preference and write it to `path`.
pub fn persist_theme(prefs: &mut Preferences, path: &Path, theme: Theme) -> Result<()> {
    prefs.theme = Some(theme);
    prefs.save(path)
}

/// Ambient terminal preference, read from `COLORFGBG` (`"<fg>;<bg>"`).
pub fn ambient_prefers_dark() -> bool {
    env::var("COLORFGBG")
        .ok()
        .is_some_and(|value| colorfgbg_is_dark(&value))
}

// Background indexes 0-6 and 8 are the dark half of the 16-colour palette.
fn colorfgbg_is_dark(value: &str) -> bool {
    value
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg <= 6 || bg == 8)
}
