//! LLM provider clients: batch embeddings and snippet explanations, over
//! Ollama or OpenAI-compatible HTTP APIs.

pub mod embeddings;
pub mod explain;
