use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::models::settings::{is_valid_date_format, PickerConfig};

/// Named picker configurations, one TOML table per picker:
///
/// ```toml
/// [pickers.order_date]
/// date_format = "%d.%m.%Y"
/// disable_future_dates = true
///
/// [pickers.report_period]
/// is_range = true
/// storage_key = "report-period"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerSettings {
    #[serde(default)]
    pub pickers: BTreeMap<String, PickerConfig>,
}

impl PickerSettings {
    /// Config for `name`, or the defaults when the file does not mention it.
    pub fn picker(&self, name: &str) -> PickerConfig {
        self.pickers.get(name).cloned().unwrap_or_default()
    }
}

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/pickers.toml` for this application.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "range-calendar", "range-calendar")
            .map(|dirs| dirs.config_dir().join("pickers.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse(contents: &str) -> Result<PickerSettings> {
        let settings: PickerSettings =
            toml::from_str(contents).context("Failed to parse picker settings")?;
        for (name, config) in &settings.pickers {
            if !is_valid_date_format(&config.date_format) {
                log::warn!(
                    "Picker '{}' has an unusable date_format '{}', the default will be used",
                    name,
                    config.date_format
                );
            }
        }
        Ok(settings)
    }

    pub fn load(&self) -> Result<PickerSettings> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Self::parse(&contents)
    }

    /// Load the settings, falling back to defaults when the file is missing
    /// or broken.
    pub fn load_or_default(&self) -> PickerSettings {
        if !self.path.exists() {
            log::info!("No picker settings at {}, using defaults", self.path.display());
            return PickerSettings::default();
        }
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default picker settings: {:#}", e);
                PickerSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &PickerSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {}", parent.display()))?;
        }
        let data = toml::to_string_pretty(settings).context("Failed to serialize picker settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_named_pickers() {
        let settings = SettingsService::parse(
            r#"
            [pickers.order_date]
            date_format = "%d.%m.%Y"
            disable_future_dates = true

            [pickers.report_period]
            is_range = true
            storage_key = "report-period"
            min_date = "2024-01-01"
            "#,
        )
        .unwrap();

        let order = settings.picker("order_date");
        assert_eq!(order.date_format, "%d.%m.%Y");
        assert!(order.disable_future_dates);
        assert!(!order.is_range);
        assert_eq!(order.placeholder, "Select date");

        let period = settings.picker("report_period");
        assert!(period.is_range);
        assert_eq!(period.storage_key.as_deref(), Some("report-period"));

        assert_eq!(settings.picker("unknown"), PickerConfig::default());
    }

    #[test]
    fn test_broken_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pickers.toml");
        fs::write(&path, "[pickers.x\nis_range = ").unwrap();
        let service = SettingsService::new(&path);
        assert!(service.load().is_err());
        assert_eq!(service.load_or_default(), PickerSettings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let service = SettingsService::new(dir.path().join("conf").join("pickers.toml"));
        assert_eq!(service.load_or_default(), PickerSettings::default());

        let mut settings = PickerSettings::default();
        settings.pickers.insert(
            "period".to_string(),
            PickerConfig::range().with_storage_key("period"),
        );
        service.save(&settings).unwrap();
        assert_eq!(service.load().unwrap(), settings);
    }
}
