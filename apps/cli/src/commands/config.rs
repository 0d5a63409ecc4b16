//! # Config Commands

use std::path::PathBuf;

use masa_core::StoreConfig;
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;

/// Effective configuration of this invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub data_dir: PathBuf,
    #[serde(flatten)]
    pub store: StoreConfig,
}

/// Gets the current configuration (read-only).
pub fn get_config(state: &AppState) -> ConfigResponse {
    debug!("get_config command");
    ConfigResponse {
        data_dir: state.data_dir().to_path_buf(),
        store: state.config().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_config() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::open(tmp.path(), StoreConfig::default());

        let json = serde_json::to_value(get_config(&state)).unwrap();
        assert_eq!(json["storageKey"], "masa_fashion_cart");
        assert_eq!(json["currencyCode"], "JOD");
        assert_eq!(json["pricing"]["deliveryFee"], 200);
        assert_eq!(json["governorates"].as_array().unwrap().len(), 12);
    }
}
