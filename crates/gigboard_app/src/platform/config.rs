//! Application configuration.
//!
//! Values come from `gigboard.ron` in the working directory when present and
//! are then overridden by `GIGBOARD_*` environment variables.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use gigboard_core::{fuzzy::DEFAULT_THRESHOLD, BoardSettings, MatchMode, DEFAULT_PAGE_SIZE};
use gigboard_engine::{BackendSettings, EngineConfig, DEFAULT_TABLE};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub(crate) const CONFIG_FILENAME: &str = "gigboard.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MatchSetting {
    Fuzzy,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub project_url: String,
    pub anon_key: String,
    pub table: String,
    pub page_size: usize,
    pub match_mode: MatchSetting,
    pub fuzzy_threshold: f64,
    pub request_timeout_secs: u64,
    pub redirect_url: Option<String>,
    pub log_destination: LogDestination,
    /// Keep the auth session on disk between runs.
    pub remember_session: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_url: String::new(),
            anon_key: String::new(),
            table: DEFAULT_TABLE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            match_mode: MatchSetting::Fuzzy,
            fuzzy_threshold: DEFAULT_THRESHOLD,
            request_timeout_secs: 30,
            redirect_url: None,
            log_destination: LogDestination::File,
            remember_session: true,
        }
    }
}

impl AppConfig {
    /// Loads `gigboard.ron` from `dir` (if any), applies env overrides and validates.
    pub(crate) fn load(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        let mut config = match fs::read_to_string(&path) {
            Ok(text) => ron::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(url) = lookup("GIGBOARD_URL") {
            self.project_url = url;
        }
        if let Some(key) = lookup("GIGBOARD_ANON_KEY") {
            self.anon_key = key;
        }
        if let Some(table) = lookup("GIGBOARD_TABLE") {
            self.table = table;
        }
        if let Some(size) = lookup("GIGBOARD_PAGE_SIZE") {
            self.page_size = size
                .trim()
                .parse()
                .with_context(|| format!("GIGBOARD_PAGE_SIZE is not a number: {size}"))?;
        }
        if let Some(mode) = lookup("GIGBOARD_MATCH") {
            self.match_mode = match mode.trim().to_ascii_lowercase().as_str() {
                "fuzzy" => MatchSetting::Fuzzy,
                "substring" => MatchSetting::Substring,
                other => bail!("GIGBOARD_MATCH must be `fuzzy` or `substring`, got `{other}`"),
            };
        }
        Ok(())
    }

    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        if self.project_url.trim().is_empty() {
            bail!("project_url is not set (use {CONFIG_FILENAME} or GIGBOARD_URL)");
        }
        if self.anon_key.trim().is_empty() {
            bail!("anon_key is not set (use {CONFIG_FILENAME} or GIGBOARD_ANON_KEY)");
        }
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            bail!("fuzzy_threshold must lie between 0 and 1");
        }
        Ok(())
    }

    pub(crate) fn board_settings(&self) -> BoardSettings {
        let match_mode = match self.match_mode {
            MatchSetting::Fuzzy => MatchMode::Fuzzy {
                threshold: self.fuzzy_threshold,
            },
            MatchSetting::Substring => MatchMode::Substring,
        };
        BoardSettings {
            page_size: self.page_size,
            match_mode,
        }
    }

    pub(crate) fn engine_config(&self) -> EngineConfig {
        let mut backend = BackendSettings::new(&self.project_url, &self.anon_key);
        backend.request_timeout = Duration::from_secs(self.request_timeout_secs.max(1));
        backend.redirect_url = self.redirect_url.clone();
        let mut config = EngineConfig::new(backend);
        config.table = self.table.clone();
        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use gigboard_core::MatchMode;
    use tempfile::TempDir;

    use super::{AppConfig, MatchSetting, CONFIG_FILENAME};

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = AppConfig {
            project_url: "https://file.example".to_string(),
            ..AppConfig::default()
        };
        config
            .apply_env(env(&[
                ("GIGBOARD_URL", "https://env.example"),
                ("GIGBOARD_PAGE_SIZE", "25"),
                ("GIGBOARD_MATCH", "Substring"),
            ]))
            .unwrap();

        assert_eq!(config.project_url, "https://env.example");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.match_mode, MatchSetting::Substring);
        assert_eq!(config.board_settings().match_mode, MatchMode::Substring);
    }

    #[test]
    fn bad_env_values_are_errors() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[("GIGBOARD_PAGE_SIZE", "many")])).is_err());
        assert!(config.apply_env(env(&[("GIGBOARD_MATCH", "regex")])).is_err());
    }

    #[test]
    fn missing_credentials_fail_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());

        let config = AppConfig {
            project_url: "https://x.example".to_string(),
            anon_key: "key".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ron_file_is_read_with_defaults_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"(project_url: "https://proj.example", anon_key: "k", page_size: 10)"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.table, gigboard_engine::DEFAULT_TABLE);
        assert_eq!(
            config.board_settings().match_mode,
            MatchMode::Fuzzy { threshold: 0.4 }
        );
    }
}
