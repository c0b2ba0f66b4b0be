//! Configuration management
//!
//! Handles loading of the optional JSON configuration file with environment
//! variable overrides for the form defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::{FormDraft, SuperStrategyDraft};

/// Environment variable overriding the default asset selection
pub const ASSET_ENV_VAR: &str = "BACKTEST_FORM_ASSET";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: FormDefaults,
    #[serde(default)]
    pub viewer: ViewerConfig,
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        let mut config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        config.apply_env();
        Ok(config)
    }

    /// Load from `path` when given, otherwise use built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let mut config = Config::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(asset) = std::env::var(ASSET_ENV_VAR) {
            self.defaults.asset_selection = asset;
        }
    }
}

/// Values a fresh working copy starts from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefaults {
    #[serde(default)]
    pub asset_selection: String,

    /// Preselected bar frequency (default: Daily)
    #[serde(default = "default_data_frequency")]
    pub data_frequency: String,

    /// Preselected order type (default: Limit)
    #[serde(default = "default_order_type")]
    pub order_type: String,

    /// Blank super strategies added to a new form (default: 1)
    #[serde(default = "default_super_strategies")]
    pub super_strategies: usize,
}

fn default_data_frequency() -> String {
    "Daily".to_string()
}
fn default_order_type() -> String {
    "Limit".to_string()
}
fn default_super_strategies() -> usize {
    1
}

impl Default for FormDefaults {
    fn default() -> Self {
        FormDefaults {
            asset_selection: String::new(),
            data_frequency: default_data_frequency(),
            order_type: default_order_type(),
            super_strategies: default_super_strategies(),
        }
    }
}

impl FormDefaults {
    /// Build the starting working copy
    pub fn to_draft(&self) -> FormDraft {
        let mut draft = FormDraft::with_defaults();
        draft.data_settings.asset_selection = self.asset_selection.clone();
        draft.data_settings.data_frequency = self.data_frequency.clone();
        draft.execution_settings.order_type = self.order_type.clone();
        for _ in 0..self.super_strategies {
            draft
                .super_strategies
                .append(SuperStrategyDraft::with_blank_strategy());
        }
        draft
    }
}

/// Snapshot viewer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Spaces per JSON nesting level (default: 2)
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_indent() -> usize {
    2
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            indent: default_indent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"defaults":{"orderType":"Market"}}"#).unwrap();
        assert_eq!(config.defaults.order_type, "Market");
        assert_eq!(config.defaults.data_frequency, "Daily");
        assert_eq!(config.defaults.super_strategies, 1);
        assert_eq!(config.viewer.indent, 2);
    }

    #[test]
    fn test_defaults_to_draft() {
        let defaults = FormDefaults {
            asset_selection: "BTC".to_string(),
            super_strategies: 2,
            ..Default::default()
        };
        let draft = defaults.to_draft();
        assert_eq!(draft.data_settings.asset_selection, "BTC");
        assert_eq!(draft.data_settings.data_frequency, "Daily");
        assert_eq!(draft.execution_settings.order_type, "Limit");
        assert_eq!(draft.super_strategies.len(), 2);
        assert_eq!(draft.super_strategies.get(1).unwrap().strategies.len(), 1);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("backtest_form_cfg_{}.json", std::process::id()));
        fs::write(&path, r#"{"viewer":{"indent":4}}"#).unwrap();
        let config = Config::from_file(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.viewer.indent, 4);
    }
}
