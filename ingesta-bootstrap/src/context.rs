use anyhow::Result;
use tracing::info;

use ingesta_application::AppState;
use ingesta_infrastructure::{build_storage_writer, AppConfig};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let storage_settings = config.to_storage_settings();

        let storage = build_storage_writer(&storage_settings)?;

        info!(
            bind_addr = %runtime_config.bind_addr,
            base_path = %runtime_config.base_path,
            source = %runtime_config.source_tag,
            api_key_set = runtime_config.api_key.is_some(),
            require_api_key = runtime_config.require_api_key,
            storage = %storage
                .as_ref()
                .map(|writer| writer.describe())
                .unwrap_or_else(|| "unconfigured".to_string()),
            "configuration loaded"
        );

        Ok(Self {
            state: AppState::new(runtime_config, storage),
        })
    }
}
