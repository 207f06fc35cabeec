use std::{
    fmt, fs,
    path::Path,
    str::FromStr,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use taskdeck_core::{SortField, SortOrder, TaskQuery};
use tracing::info;

/// Colour scheme of the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light text on a dark background.
    Dark,
    /// Dark text on a light background.
    Light,
}

impl Theme {
    /// Saved preference if any, otherwise the host's ambient preference.
    #[must_use]
    pub const fn resolve(saved: Option<Self>, ambient_dark: bool) -> Self {
        match saved {
            Some(theme) => theme,
            None if ambient_dark => Self::Dark,
            None => Self::Light,
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Label used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(anyhow!("unknown theme '{other}' (expected dark or light)")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initial ordering of the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Field the list starts sorted by.
    #[serde(default)]
    pub sort_field: SortField,
    /// Direction the list starts sorted in.
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl ViewConfig {
    /// Query with no search text using the configured ordering.
    #[must_use]
    pub const fn initial_query(&self) -> TaskQuery {
        TaskQuery::sorted_by(self.sort_field, self.sort_order)
    }
}

/// Host-side preferences persisted between sessions. Task data is never stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Explicit theme choice; `None` follows the ambient preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    /// Initial list ordering.
    #[serde(default)]
    pub view: ViewConfig,
}

impl Preferences {
    /// Load preferences from `path`, returning defaults when the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let prefs: Self =
            toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
        info!(path = %path.display(), "loaded preferences");
        Ok(prefs)
    }

    /// Write preferences to `path`, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an error if serialization or any filesystem step fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("failed to serialize preferences")?;
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "saved preferences");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let prefs = Preferences::load(temp.path().join("absent.toml"))?;
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.view.initial_query(), TaskQuery::default());
        Ok(())
    }

    #[test]
    fn parses_theme_and_view_block() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
theme = "light"

[view]
sort_field = "due-date"
sort_order = "asc"
"#,
        )?;

        let prefs = Preferences::load(&path)?;
        assert_eq!(prefs.theme, Some(Theme::Light));
        assert_eq!(prefs.view.sort_field, SortField::DueDate);
        assert_eq!(prefs.view.sort_order, SortOrder::Asc);
        Ok(())
    }

    #[test]
    fn save_creates_directories_and_round_trips() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("nested").join("taskdeck").join("config.toml");
        let prefs = Preferences {
            theme: Some(Theme::Dark),
            view: ViewConfig {
                sort_field: SortField::Title,
                sort_order: SortOrder::Asc,
            },
        };
        prefs.save(&path)?;
        assert_eq!(Preferences::load(&path)?, prefs);
        Ok(())
    }

    #[test]
    fn invalid_file_reports_path() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "theme = \"sepia\"")?;
        let Err(err) = Preferences::load(&path) else {
            panic!("expected parse failure");
        };
        assert!(err.to_string().contains("failed to parse"));
        Ok(())
    }

    #[test]
    fn theme_resolution_prefers_saved_value() {
        assert_eq!(Theme::resolve(Some(Theme::Light), true), Theme::Light);
        assert_eq!(Theme::resolve(None, true), Theme::Dark);
        assert_eq!(Theme::resolve(None, false), Theme::Light);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert!("Dark".parse::<Theme>().is_ok_and(|theme| theme == Theme::Dark));
        assert!("sepia".parse::<Theme>().is_err());
    }
}
