use std::sync::Arc;

use ingesta_domain::ports::RawStorageWriter;
use ingesta_domain::{RecordValidator, RuntimeConfig};

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RuntimeConfig>,
    /// `None` when storage credentials are missing; ingestion then fails
    /// with a misconfiguration error instead of refusing to start.
    pub storage: Option<Arc<dyn RawStorageWriter>>,
    pub validator: Arc<RecordValidator>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: RuntimeConfig, storage: Option<Arc<dyn RawStorageWriter>>) -> Self {
        let validator = RecordValidator::default()
            .with_sample_limit(config.validation_sample_limit)
            .with_max_violations(config.max_violations);
        Self {
            config: Arc::new(config),
            storage,
            validator: Arc::new(validator),
            metrics: Arc::new(Metrics::default()),
        }
    }
}
