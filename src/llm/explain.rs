//! Snippet explanations via the chat API.
//!
//! Explanations are best-effort: every failure path folds into the returned
//! string so callers never have to handle an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Returned when no chat model is configured.
pub const UNAVAILABLE_MESSAGE: &str = "AI explanation unavailable (no chat model configured)";

/// LLM-backed snippet explainer. Unconfigured (no chat model) is a normal,
/// non-error state.
#[derive(Clone)]
pub struct Explainer {
    client: reqwest::Client,
    config: LlmConfig,
}

impl Explainer {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.chat_model.is_some()
    }

    /// Explain `code` in the context of `query`. Never fails: missing
    /// configuration and provider errors both come back as the explanation
    /// text itself.
    pub async fn explain(&self, code: &str, query: &str) -> String {
        let Some(model) = self.config.chat_model.clone() else {
            return UNAVAILABLE_MESSAGE.to_string();
        };

        let prompt = format!(
            "Explain this code snippet in the context of the user's query: \"{query}\"\n\n\
             Code:\n```\n{code}\n```\n\n\
             Provide a concise, plain English explanation of what this code does \
             and how it relates to the query."
        );

        match self.generate(&model, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Explanation failed: {e:#}");
                format!("Error generating explanation: {e:#}")
            }
        }
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        match self.config.provider.as_str() {
            "ollama" => call_ollama(&self.client, &self.config, model, prompt).await,
            "openai" => call_openai(&self.client, &self.config, model, prompt).await,
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        }
    }
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Message,
}

async fn call_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    model: &str,
    prompt: &str,
) -> Result<String> {
    let url = format!("{}/api/chat", config.base_url);

    let req = OllamaChatRequest {
        model: model.to_string(),
        messages: vec![Message {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        stream: false,
    };

    let resp = client
        .post(&url)
        .json(&req)
        .send()
        .await
        .context("Failed to call Ollama chat API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Ollama chat API returned {status}: {body}");
    }

    let body: OllamaChatResponse = resp.json().await?;
    Ok(body.message.content)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: String,
}

async fn call_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    model: &str,
    prompt: &str,
) -> Result<String> {
    let url = format!("{}/v1/chat/completions", config.base_url);
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = OpenAiChatRequest {
        model: model.to_string(),
        messages: vec![OpenAiMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        temperature: 0.3,
    };

    let resp = client
        .post(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&req)
        .send()
        .await
        .context("Failed to call OpenAI chat API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("OpenAI chat API returned {status}: {body}");
    }

    let body: OpenAiChatResponse = resp.json().await?;
    Ok(body
        .choices
        .first()
        .map(|c| c.message.content.clone())
        .unwrap_or_default())
}
