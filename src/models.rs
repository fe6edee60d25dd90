use serde::{Deserialize, Serialize};

/// Index request
#[derive(Debug, Clone, Deserialize)]
pub struct IndexRequest {
    pub repo_path: String,
    /// Languages to index. Defaults to all eight known languages.
    #[serde(default = "default_languages")]
    pub languages: Option<Vec<String>>,
}

fn default_languages() -> Option<Vec<String>> {
    Some(
        [
            "python",
            "javascript",
            "typescript",
            "go",
            "java",
            "cpp",
            "c",
            "rust",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    )
}

/// Index response
#[derive(Debug, Clone, Serialize)]
pub struct IndexResponse {
    pub status: String,
    pub files_indexed: usize,
    pub chunks_created: usize,
    /// Wall-clock seconds
    pub time_taken: f64,
}

/// Search request
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    pub language_filter: Option<Vec<String>>,
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

fn default_top_k() -> usize {
    10
}

fn default_min_score() -> f32 {
    0.5
}

/// Search filters validated once at the HTTP boundary.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Keep only results whose language is in this set
    pub language_filter: Option<Vec<String>>,
    /// Drop results scoring below this (applied post-query)
    pub min_score: Option<f32>,
}

/// A single matched chunk
#[derive(Debug, Clone, Serialize)]
pub struct CodeResult {
    pub code: String,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub language: String,
    /// Cosine similarity (1 - distance)
    pub score: f32,
    /// Always None: deriving it would need AST parsing
    pub function_name: Option<String>,
}

/// Search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<CodeResult>,
    pub query: String,
    pub total_results: usize,
    /// Wall-clock seconds
    pub search_time: f64,
}

/// Explain request
#[derive(Debug, Clone, Deserialize)]
pub struct ExplainRequest {
    pub code: String,
    pub query: String,
}

/// Explain response
#[derive(Debug, Clone, Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

/// Stats response
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_documents_indexed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_request_defaults_to_eight_languages() {
        let req: IndexRequest = serde_json::from_str(r#"{"repo_path": "/tmp/repo"}"#).unwrap();
        let langs = req.languages.unwrap();
        assert_eq!(langs.len(), 8);
        assert!(langs.contains(&"rust".to_string()));
        assert!(langs.contains(&"python".to_string()));
    }

    #[test]
    fn test_index_request_explicit_languages() {
        let req: IndexRequest =
            serde_json::from_str(r#"{"repo_path": "/tmp/repo", "languages": ["go"]}"#).unwrap();
        assert_eq!(req.languages.unwrap(), vec!["go".to_string()]);
    }

    #[test]
    fn test_search_request_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"query": "auth"}"#).unwrap();
        assert_eq!(req.top_k, 10);
        assert_eq!(req.min_score, 0.5);
        assert!(req.language_filter.is_none());
    }

    #[test]
    fn test_code_result_serializes_null_function_name() {
        let result = CodeResult {
            code: "fn main() {}".to_string(),
            file_path: "src/main.rs".to_string(),
            start_line: 1,
            end_line: 1,
            language: "rust".to_string(),
            score: 0.9,
            function_name: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["function_name"].is_null());
    }
}
