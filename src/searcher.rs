//! Query-side pipeline: embed, nearest-neighbor query, score post-filter.

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

use crate::llm::embeddings::EmbeddingProvider;
use crate::llm::explain::Explainer;
use crate::models::{CodeResult, SearchFilters, SearchResponse, StatsResponse};
use crate::vector::{MetadataFilter, VectorStore};

/// Default similarity threshold when the caller does not supply one.
pub const DEFAULT_MIN_SCORE: f32 = 0.5;

pub struct Searcher<E> {
    embedder: E,
    store: Arc<VectorStore>,
    explainer: Explainer,
}

impl<E: EmbeddingProvider> Searcher<E> {
    pub fn new(embedder: E, store: Arc<VectorStore>, explainer: Explainer) -> Self {
        Self {
            embedder,
            store,
            explainer,
        }
    }

    /// Embed the query, fetch the `top_k` nearest chunks (optionally
    /// language-filtered store-side), then drop anything scoring below
    /// `min_score`. The store cannot filter on a derived similarity score,
    /// so that part runs post-query. Hits keep store order; no re-ranking.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        filters: &SearchFilters,
    ) -> Result<SearchResponse> {
        let start = Instant::now();

        let query_embedding = self.embedder.embed_one(query).await?;

        let store_filter = filters.language_filter.as_ref().map(|langs| MetadataFilter {
            languages: Some(langs.clone()),
        });

        let hits = self
            .store
            .query(&query_embedding, top_k, store_filter.as_ref());

        let min_score = filters.min_score.unwrap_or(DEFAULT_MIN_SCORE);

        let results: Vec<CodeResult> = hits
            .into_iter()
            .filter_map(|hit| {
                let score = 1.0 - hit.distance;
                if score < min_score {
                    return None;
                }
                Some(CodeResult {
                    code: hit.document,
                    file_path: hit.metadata.file_path,
                    start_line: hit.metadata.start_line,
                    end_line: hit.metadata.end_line,
                    language: hit.metadata.language,
                    score,
                    // Would need AST parsing to recover this
                    function_name: None,
                })
            })
            .collect();

        Ok(SearchResponse {
            total_results: results.len(),
            results,
            query: query.to_string(),
            search_time: start.elapsed().as_secs_f64(),
        })
    }

    /// Explain a snippet. Never fails; see [`Explainer::explain`].
    pub async fn explain(&self, code: &str, query: &str) -> String {
        self.explainer.explain(code, query).await
    }

    /// Count passthrough from the store. Per-language breakdowns would need
    /// either a store-side aggregation or separate counters; neither exists.
    pub fn get_stats(&self) -> StatsResponse {
        StatsResponse {
            total_documents_indexed: self.store.count(),
        }
    }
}
