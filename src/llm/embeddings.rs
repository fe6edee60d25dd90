use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Maximum characters to send per text to the embedding API.
/// nomic-embed-text has an 8 192-token context. Most code tokenises at
/// ~1 token per 2-3 chars, but dense content (JSON blobs, minified JS) can
/// hit ~2.3 tokens/char. 3 000 chars × 2.3 ≈ 6 900 tokens — safely under 8 192.
const MAX_EMBED_CHARS: usize = 3_000;

/// Maps text to fixed-length vectors comparable by cosine similarity.
///
/// Errors propagate to the caller: a provider failure is fatal to the
/// enclosing index or search call.
pub trait EmbeddingProvider: Send + Sync {
    fn embed_batch(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>>> + Send;

    fn embed_one(&self, text: &str) -> impl std::future::Future<Output = Result<Vec<f32>>> + Send;
}

/// Embedding client for Ollama or OpenAI-compatible APIs.
#[derive(Clone)]
pub struct HttpEmbeddings {
    client: reqwest::Client,
    config: LlmConfig,
}

impl HttpEmbeddings {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }
}

impl EmbeddingProvider for HttpEmbeddings {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let truncated: Vec<String> = texts
            .iter()
            .map(|t| truncate_for_embedding(t).to_string())
            .collect();

        let embeddings = match self.config.provider.as_str() {
            "ollama" => embed_ollama(&self.client, &self.config, &truncated).await?,
            "openai" => embed_openai(&self.client, &self.config, &truncated).await?,
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        };

        check_dimensions(&embeddings, self.config.embedding_dim)?;
        Ok(embeddings)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results.into_iter().next().context("No embedding returned")
    }
}

/// Reject provider responses whose vectors do not match the configured
/// dimension; mixed-dimension vectors are not comparable by cosine
/// similarity. `expected == 0` disables the check.
fn check_dimensions(embeddings: &[Vec<f32>], expected: usize) -> Result<()> {
    if expected == 0 {
        return Ok(());
    }
    for (i, embedding) in embeddings.iter().enumerate() {
        if embedding.len() != expected {
            anyhow::bail!(
                "Embedding {i} has dimension {} (expected {expected}); \
                 check LLM_EMBEDDING_MODEL and LLM_EMBEDDING_DIM",
                embedding.len()
            );
        }
    }
    Ok(())
}

/// Truncate `text` to at most `MAX_EMBED_CHARS`, splitting on a UTF-8 char boundary.
fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaEmbedRequest {
    model: String,
    input: Vec<String>,
    /// Ask Ollama to silently truncate inputs that exceed the model's context
    /// length instead of returning a 400 error.
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

async fn embed_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/api/embed", config.base_url);

    // Ollama supports batch embedding with the /api/embed endpoint
    let batch_size = 32;
    let mut all_embeddings = Vec::new();

    for chunk in texts.chunks(batch_size) {
        let req = OllamaEmbedRequest {
            model: config.embedding_model.clone(),
            input: chunk.to_vec(),
            truncate: true,
        };

        let resp = client
            .post(&url)
            .json(&req)
            .send()
            .await
            .context("Failed to call Ollama embed API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Ollama embed API returned {status}: {body}");
        }

        let body: OllamaEmbedResponse = resp
            .json()
            .await
            .context("Failed to parse Ollama embed response")?;

        all_embeddings.extend(body.embeddings);
    }

    Ok(all_embeddings)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiEmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct OpenAiEmbedResponse {
    data: Vec<OpenAiEmbedData>,
}

#[derive(Deserialize)]
struct OpenAiEmbedData {
    embedding: Vec<f32>,
}

async fn embed_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/v1/embeddings", config.base_url);
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let batch_size = 64;
    let mut all_embeddings = Vec::new();

    for chunk in texts.chunks(batch_size) {
        let req = OpenAiEmbedRequest {
            model: config.embedding_model.clone(),
            input: chunk.to_vec(),
        };

        let resp = client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&req)
            .send()
            .await
            .context("Failed to call OpenAI embed API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI embed API returned {status}: {body}");
        }

        let body: OpenAiEmbedResponse = resp
            .json()
            .await
            .context("Failed to parse OpenAI embed response")?;

        let mut embeddings: Vec<Vec<f32>> = body.data.into_iter().map(|d| d.embedding).collect();
        all_embeddings.append(&mut embeddings);
    }

    Ok(all_embeddings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_for_embedding("fn main() {}"), "fn main() {}");
    }

    #[test]
    fn test_truncate_long_text() {
        let long = "a".repeat(MAX_EMBED_CHARS + 500);
        assert_eq!(truncate_for_embedding(&long).len(), MAX_EMBED_CHARS);
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // Multi-byte chars straddling the limit must not split mid-char
        let long = "é".repeat(MAX_EMBED_CHARS);
        let truncated = truncate_for_embedding(&long);
        assert!(truncated.len() <= MAX_EMBED_CHARS);
        assert!(truncated.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_check_dimensions_accepts_matching_vectors() {
        let embeddings = vec![vec![0.0; 768], vec![1.0; 768]];
        assert!(check_dimensions(&embeddings, 768).is_ok());
    }

    #[test]
    fn test_check_dimensions_rejects_mismatch() {
        let embeddings = vec![vec![0.0; 768], vec![1.0; 384]];
        let err = check_dimensions(&embeddings, 768).unwrap_err();
        assert!(err.to_string().contains("dimension 384"));
    }

    #[test]
    fn test_check_dimensions_zero_disables_check() {
        let embeddings = vec![vec![0.0; 3], vec![1.0; 7]];
        assert!(check_dimensions(&embeddings, 0).is_ok());
    }

    #[tokio::test]
    async fn test_embed_batch_empty_input_no_call() {
        let provider = HttpEmbeddings::new(reqwest::Client::new(), LlmConfig::default());
        let result = provider.embed_batch(&[]).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_provider_is_an_error() {
        let config = LlmConfig {
            provider: "bogus".to_string(),
            ..LlmConfig::default()
        };
        let provider = HttpEmbeddings::new(reqwest::Client::new(), config);
        let err = provider
            .embed_batch(&["text".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown LLM provider"));
    }
}
