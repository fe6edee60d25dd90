//! # code-search
//!
//! A semantic code-search service: walk a source tree, split files into
//! line-addressable chunks, embed each chunk, store the vectors in a
//! persistent index, and answer natural-language queries by cosine
//! nearest-neighbor lookup. An optional LLM explains matched snippets.
//!
//! ## Pipeline
//!
//! ```text
//!   POST /api/index                     POST /api/search
//!        │                                    │
//!        ▼                                    ▼
//!   ┌──────────┐   ┌──────────┐         ┌──────────┐
//!   │ Indexer  │──▶│ Chunker  │         │ Searcher │
//!   └────┬─────┘   └──────────┘         └────┬─────┘
//!        │ embed_batch                       │ embed_one
//!        ▼                                   ▼
//!   ┌───────────────────┐  upsert   ┌─────────────────┐
//!   │ EmbeddingProvider │──────────▶│   VectorStore   │
//!   └───────────────────┘   query   │ (cosine, JSON-  │
//!                          ◀────────│   persisted)    │
//!                                   └─────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, storage, and LLM settings
//! - [`models`] - Request/response types: `IndexRequest`, `SearchRequest`, `CodeResult`, ...
//! - [`chunking`] - Blank-line chunker with exact 1-based line accounting
//! - [`language`] - Extension/language tables used for filtering and tagging
//! - [`vector`] - Persistent vector store with upsert-by-id and cosine distance queries
//! - [`indexer`] - Repository walk + chunk + embed + upsert orchestration
//! - [`searcher`] - Query embedding, score post-filtering, stats, and explanations
//! - [`ratelimit`] - Per-identity sliding-window rate limiter
//! - [`llm`] - Embedding and explanation clients (Ollama or OpenAI-compatible)
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state constructed once at startup

pub mod api;
pub mod chunking;
pub mod config;
pub mod indexer;
pub mod language;
pub mod llm;
pub mod models;
pub mod ratelimit;
pub mod searcher;
pub mod state;
pub mod vector;
