use crate::config::ApiConfig;
use phoneverify_agents::{build_pipeline, PipelineError, ValidationPipeline, ValidationStats};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<ApiConfig>>,
    pub config_path: PathBuf,
    pub stats: Arc<ValidationStats>,
}

impl AppState {
    pub fn new(config: ApiConfig, config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
            stats: Arc::new(ValidationStats::new()),
        }
    }

    /// Builds a pipeline from the current config so key changes apply to
    /// the next request.
    pub fn pipeline(&self) -> Result<Arc<ValidationPipeline>, PipelineError> {
        let config = self
            .config
            .read()
            .map_err(|e| PipelineError::Fatal(format!("Failed to acquire config read lock: {}", e)))?;

        let pipeline = build_pipeline(&config.pipeline, &config.llm, config.llm_api_key())?
            .with_observer(self.stats.clone());
        Ok(Arc::new(pipeline))
    }
}
