//! User settings for bankrec
//!
//! Manages display preferences and the auto-match search limits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::BankrecPaths;
use crate::error::MatchError;
use crate::models::money::{DEFAULT_SCALE, MAX_SCALE};
use crate::services::MatchConfig;

/// Auto-match search settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingSettings {
    /// Try combinations of items when no single item matches
    #[serde(default)]
    pub multi_item_auto_match: bool,

    /// Largest number of items combined
    #[serde(default = "default_max_combo_size")]
    pub max_combo_size: usize,

    /// Maximum number of partial combinations explored
    #[serde(default = "default_search_budget")]
    pub search_budget: u64,

    /// Optional wall-clock limit in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,
}

fn default_max_combo_size() -> usize {
    4
}

fn default_search_budget() -> u64 {
    250_000
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            multi_item_auto_match: false,
            max_combo_size: default_max_combo_size(),
            search_budget: default_search_budget(),
            time_budget_ms: None,
        }
    }
}

impl MatchingSettings {
    pub fn to_match_config(&self) -> MatchConfig {
        MatchConfig {
            multi_item_auto_match: self.multi_item_auto_match,
            max_combo_size: self.max_combo_size,
            search_budget: self.search_budget,
            time_budget: self.time_budget_ms.map(Duration::from_millis),
        }
    }
}

/// User settings for bankrec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Number of fractional digits in the currency's minor unit
    #[serde(default = "default_minor_unit_scale")]
    pub minor_unit_scale: u32,

    /// Whether session events are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,

    #[serde(default)]
    pub matching: MatchingSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_minor_unit_scale() -> u32 {
    DEFAULT_SCALE
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            minor_unit_scale: default_minor_unit_scale(),
            audit_enabled: default_audit_enabled(),
            matching: MatchingSettings::default(),
        }
    }
}

impl Settings {
    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.matching.max_combo_size == 0 {
            return Err(MatchError::Config(
                "matching.max_combo_size must be at least 1".into(),
            ));
        }
        if self.minor_unit_scale > MAX_SCALE {
            return Err(MatchError::Config(format!(
                "minor_unit_scale must be at most {}",
                MAX_SCALE
            )));
        }
        Ok(())
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BankrecPaths) -> Result<Self, MatchError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| MatchError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                MatchError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BankrecPaths) -> Result<(), MatchError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| MatchError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| MatchError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
