//! User settings stored as settings.json in the app data directory

use crate::constants::*;
use crate::currency::{CurrencyEntry, CurrencyRegistry};
use crate::types::SortOption;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Endpoints
    pub cu_url: String,
    pub ucm_process: String,
    pub profile_registry: String,
    pub asset_base_url: String,

    // Start route
    pub start_asset: Option<String>,
    pub start_address: Option<String>,

    // View
    pub default_sort: SortOption,
    pub smooth_scroll: bool,

    // Known tokens
    pub currencies: HashMap<String, CurrencyEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut currencies = HashMap::new();
        currencies.insert(
            DEFAULT_SWAP_TOKEN.to_string(),
            CurrencyEntry {
                ticker: Some("wAR".to_string()),
                denomination: Some(12),
            },
        );

        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            cu_url: DEFAULT_CU_URL.to_string(),
            ucm_process: DEFAULT_UCM_PROCESS.to_string(),
            profile_registry: DEFAULT_PROFILE_REGISTRY.to_string(),
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            start_asset: None,
            start_address: None,
            default_sort: SortOption::NewToOld,
            smooth_scroll: true,
            currencies,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn currency_registry(&self) -> CurrencyRegistry {
        CurrencyRegistry::new(self.currencies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "default_sort": "old-to-new", "start_address": "abc" }"#)
                .unwrap();
        assert_eq!(settings.default_sort, SortOption::OldToNew);
        assert_eq!(settings.start_address.as_deref(), Some("abc"));
        assert_eq!(settings.cu_url, DEFAULT_CU_URL);
        assert!(settings.currencies.contains_key(DEFAULT_SWAP_TOKEN));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("market-activity-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let settings = Settings {
            start_asset: Some("asset".into()),
            smooth_scroll: false,
            ..Settings::default()
        };
        settings.save(&dir);
        let loaded = Settings::load(&dir);
        assert_eq!(loaded.start_asset.as_deref(), Some("asset"));
        assert!(!loaded.smooth_scroll);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_uses_defaults() {
        let loaded = Settings::load(Path::new("/nonexistent/market-activity"));
        assert!(loaded.smooth_scroll);
        assert_eq!(loaded.asset_base_url, DEFAULT_ASSET_BASE_URL);
    }
}
