use std::sync::Arc;

use crate::config::Config;
use crate::indexer::Indexer;
use crate::llm::embeddings::HttpEmbeddings;
use crate::llm::explain::Explainer;
use crate::ratelimit::RateLimiter;
use crate::searcher::Searcher;
use crate::vector::VectorStore;

/// The index/search core. Built once at startup; handlers get at it through
/// [`AppState`].
pub struct Engine {
    pub indexer: Indexer<HttpEmbeddings>,
    pub searcher: Searcher<HttpEmbeddings>,
}

/// Shared application state.
///
/// `engine` is None when startup initialization failed (index dir not
/// creatable, store unreadable); dependent endpoints answer 503 until the
/// service is restarted with the problem fixed.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: Option<Arc<Engine>>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let engine = match Engine::init(&config) {
            Ok(engine) => Some(Arc::new(engine)),
            Err(e) => {
                tracing::error!("Failed to initialize search engine: {e:#}");
                None
            }
        };

        Self {
            config,
            engine,
            rate_limiter: Arc::new(RateLimiter::new()),
        }
    }
}

impl Engine {
    fn init(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(VectorStore::open_or_create(
            &config.index_dir,
            &config.collection_name,
        )?);

        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let embedder = HttpEmbeddings::new(http_client.clone(), config.llm.clone());
        let explainer = Explainer::new(http_client, config.llm.clone());

        Ok(Self {
            indexer: Indexer::new(embedder.clone(), store.clone()),
            searcher: Searcher::new(embedder, store, explainer),
        })
    }
}
