use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<String>,
    /// Where the vector index is persisted
    pub index_dir: PathBuf,
    /// Collection name; the index file on disk is named after it
    pub collection_name: String,
    /// Declared chunk-size cap. The blank-line chunker does not consult it;
    /// kept as a config knob for a future size-aware splitter.
    pub max_chunk_size: usize,
    /// LLM provider configuration (embeddings + optional explanations)
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// Model name for snippet explanations. None disables the explainer;
    /// /api/explain then returns a fixed unavailable message.
    pub chat_model: Option<String>,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Embedding vector dimension
    pub embedding_dim: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            cors_origins: vec!["http://localhost:5173".to_string()],
            index_dir: PathBuf::from("./index_data"),
            collection_name: "code_embeddings".to_string(),
            max_chunk_size: 512,
            llm: LlmConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            chat_model: None,
            api_key: None,
            embedding_dim: 768,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("CODE_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(origins) = std::env::var("CODE_SEARCH_CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(dir) = std::env::var("CODE_SEARCH_INDEX_DIR") {
            config.index_dir = PathBuf::from(dir);
        }
        if let Ok(name) = std::env::var("CODE_SEARCH_COLLECTION") {
            config.collection_name = name;
        }
        if let Ok(val) = std::env::var("CODE_SEARCH_MAX_CHUNK_SIZE") {
            if let Ok(v) = val.parse() {
                config.max_chunk_size = v;
            }
        }
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = Some(model);
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(dim) = std::env::var("LLM_EMBEDDING_DIM") {
            if let Ok(d) = dim.parse() {
                config.llm.embedding_dim = d;
            }
        }

        config
    }
}
