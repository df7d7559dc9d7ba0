pub mod paths;

pub use paths::AppPaths;

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;

/// Full backend configuration. Loaded from `config.yml` when present,
/// otherwise built from defaults; a few fields can be overridden from the
/// environment (`PORT`, `API_KEY`, `PROVIDER_BASE_URL`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub rag: RagSettings,
    pub provider: ProviderSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    /// CORS allow-list; empty means any origin.
    pub allowed_origins: Vec<String>,
}

/// Retrieval tunables. The defaults (320/60/8) match the production pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Chunk window size in words.
    pub chunk_size: usize,
    /// Words shared between consecutive chunks. Must stay below `chunk_size`.
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per query.
    pub top_k: usize,
    /// Retrieval drops hits whose cosine similarity falls below this.
    pub min_score: f32,
    /// Character budget for the context block handed to the generator.
    pub max_context_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Base URL of an OpenAI-compatible endpoint.
    pub base_url: String,
    pub api_key: Option<String>,
    pub embedding_model: String,
    pub generation_model: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            rag: RagSettings::default(),
            provider: ProviderSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            chunk_size: 320,
            chunk_overlap: 60,
            top_k: 8,
            min_score: 0.25,
            max_context_chars: 4000,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:1234".to_string(),
            api_key: None,
            embedding_model: "nomic-embed-text".to_string(),
            generation_model: "qwen2.5-7b-instruct".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Settings {
    pub fn load(paths: &AppPaths) -> Result<Self, ApiError> {
        let path = config_path(paths);
        let mut settings = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(ApiError::internal)?;
            serde_yaml::from_str(&raw).map_err(|err| {
                ApiError::BadRequest(format!("{} is not valid YAML: {err}", path.display()))
            })?
        } else {
            Settings::default()
        };

        if let Ok(key) = env::var("API_KEY") {
            if !key.trim().is_empty() {
                settings.provider.api_key = Some(key);
            }
        }
        if let Ok(url) = env::var("PROVIDER_BASE_URL") {
            if !url.trim().is_empty() {
                settings.provider.base_url = url;
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.rag.chunk_size == 0 {
            return Err(ApiError::BadRequest(
                "rag.chunk_size must be at least 1 word".to_string(),
            ));
        }
        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(ApiError::BadRequest(
                "rag.chunk_overlap must be smaller than rag.chunk_size".to_string(),
            ));
        }
        if self.rag.top_k == 0 {
            return Err(ApiError::BadRequest(
                "rag.top_k must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.rag.min_score) {
            return Err(ApiError::BadRequest(
                "rag.min_score must be within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

fn config_path(paths: &AppPaths) -> PathBuf {
    if let Ok(path) = env::var("TECHDOCS_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    paths.data_dir.join("config.yml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Settings::default().validate().expect("defaults must pass");
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let mut settings = Settings::default();
        settings.rag.chunk_overlap = settings.rag.chunk_size;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn min_score_outside_unit_interval_is_rejected() {
        let mut settings = Settings::default();
        settings.rag.min_score = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let settings: Settings =
            serde_yaml::from_str("rag:\n  chunk_size: 100\n").expect("partial config parses");
        assert_eq!(settings.rag.chunk_size, 100);
        assert_eq!(settings.rag.chunk_overlap, 60);
        assert_eq!(settings.rag.top_k, 8);
        assert_eq!(settings.server.port, 8000);
    }
}
