use std::sync::Arc;

use tracing::info;

use casana_data::repository::{
    InMemoryVitalsRepository, VendorApiConfig, VendorApiRepository, VitalsRepositoryTrait,
};
use casana_domain::health::{HealthService, HealthServiceTrait};
use casana_domain::rules::ThresholdTable;
use casana_domain::services::{VitalsService, VitalsServiceTrait};

use crate::config::{AppConfig, ConfigError};

/// Service type for dependency injection
pub type SharedVitalsService = Arc<dyn VitalsServiceTrait>;
pub type SharedHealthService = Arc<dyn HealthServiceTrait>;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub vitals: SharedVitalsService,
    pub health: SharedHealthService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire services around an already-built repository and threshold table
    pub fn new(config: AppConfig, repository: Arc<dyn VitalsRepositoryTrait>, thresholds: ThresholdTable) -> Self {
        let vitals = VitalsService::with_thresholds(repository.clone(), thresholds);
        let health = HealthService::new(repository, Arc::new(vitals.thresholds().clone()));

        Self {
            vitals: Arc::new(vitals),
            health: Arc::new(health),
            config: Arc::new(config),
        }
    }

    /// Build the repository and threshold table the configuration asks for
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let thresholds = load_thresholds(&config)?;
        let repository = build_repository(&config)?;
        Ok(Self::new(config, repository, thresholds))
    }
}

fn load_thresholds(config: &AppConfig) -> Result<ThresholdTable, ConfigError> {
    match &config.thresholds_path {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| ConfigError::ThresholdFile {
                path: path.clone(),
                source,
            })?;
            let table = ThresholdTable::from_json(&json)?;
            info!("Loaded threshold table {} from {}", table.version, path.display());
            Ok(table)
        }
        None => Ok(ThresholdTable::standard()),
    }
}

fn build_repository(config: &AppConfig) -> Result<Arc<dyn VitalsRepositoryTrait>, ConfigError> {
    match &config.vendor_api_base_url {
        Some(base_url) => {
            let mut vendor_config = VendorApiConfig::new(base_url.clone()).with_timeout(config.vendor_api_timeout);
            if let Some(api_key) = &config.vendor_api_key {
                vendor_config = vendor_config.with_api_key(api_key.clone());
            }
            info!("Using vendor API at {}", base_url);
            Ok(Arc::new(VendorApiRepository::new(vendor_config)?))
        }
        None => {
            info!("VENDOR_API_BASE_URL not set; serving from the in-memory source");
            Ok(Arc::new(InMemoryVitalsRepository::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_builds() {
        let state = AppState::from_config(AppConfig::default()).unwrap();
        assert_eq!(state.vitals.thresholds(), &ThresholdTable::standard());
    }

    #[test]
    fn test_bad_vendor_url_is_a_config_error() {
        let config = AppConfig {
            vendor_api_base_url: Some("ftp://vendor".to_string()),
            ..Default::default()
        };
        assert!(matches!(AppState::from_config(config), Err(ConfigError::Vendor(_))));
    }

    #[test]
    fn test_missing_threshold_file_is_a_config_error() {
        let config = AppConfig {
            thresholds_path: Some(PathBuf::from("/nonexistent/casana-thresholds.json")),
            ..Default::default()
        };
        assert!(matches!(AppState::from_config(config), Err(ConfigError::ThresholdFile { .. })));
    }

    #[test]
    fn test_threshold_override_file() {
        let mut table = ThresholdTable::standard();
        table.version = "site-override".to_string();
        table.heart_rate.normal_max = 95;

        let path = std::env::temp_dir().join(format!("casana-thresholds-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&table).unwrap()).unwrap();

        let config = AppConfig {
            thresholds_path: Some(path.clone()),
            ..Default::default()
        };
        let state = AppState::from_config(config).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(state.vitals.thresholds().version, "site-override");
        assert_eq!(state.vitals.taxonomy().info("high_heart_rate").threshold, "Heart rate >95 bpm");
    }
}
