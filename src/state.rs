use std::sync::Arc;

use crate::core::config::{AppPaths, Settings};
use crate::llm::OpenAiCompatClient;
use crate::rag::RagEngine;

/// Global application state shared across all routes.
///
/// Provider clients are built once here and injected into the engine; no
/// component initializes its own backend lazily.
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub engine: RagEngine,
}

impl AppState {
    pub fn initialize() -> anyhow::Result<Arc<Self>> {
        let paths = Arc::new(AppPaths::new());
        let settings = Settings::load(&paths)?;

        let provider = Arc::new(OpenAiCompatClient::new(&settings.provider)?);
        let engine = RagEngine::new(settings.rag.clone(), provider.clone(), provider);

        Ok(Arc::new(Self {
            paths,
            settings,
            engine,
        }))
    }
}
