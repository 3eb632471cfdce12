//! Insight providers
//!
//! Defines the provider trait and the HTTP implementation over a local model
//! endpoint. Providers own their own timeout policy; the store and service
//! impose none.

use async_trait::async_trait;

use super::types::{InsightError, Result};
use crate::config::InsightConfig;

/// Asynchronous text-to-insight collaborator.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Check if the provider is reachable.
    async fn is_available(&self) -> bool;

    /// Generate a short insight for the selected text.
    async fn request_insight(&self, text: &str) -> Result<String>;
}

/// Ollama-backed insight provider.
///
/// Talks to a local Ollama instance via its generate API, non-streaming.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &InsightConfig) -> Self {
        Self::new(&config.base_url, &config.model)
    }

    fn prompt_for(text: &str) -> String {
        // Long selections are truncated; the model only needs the gist.
        let excerpt: String = text.chars().take(2000).collect();
        format!(
            "Analyze the following text from a document and provide one key \
             insight: an important takeaway, an interesting fact, or a \
             connection to broader concepts. Base the insight only on the \
             text provided. Keep it under 2 sentences.\n\nText:\n{}",
            excerpt
        )
    }
}

#[async_trait]
impl InsightProvider for OllamaProvider {
    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn request_insight(&self, text: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = serde_json::json!({
            "model": self.model,
            "prompt": Self::prompt_for(text),
            "stream": false
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::Api(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Api(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| InsightError::Api(format!("Failed to parse response: {}", e)))?;

        let insight = result["response"].as_str().unwrap_or("").trim().to_string();
        if insight.is_empty() {
            return Err(InsightError::BadResponse(
                "empty model response".to_string(),
            ));
        }
        Ok(insight)
    }
}

/// Scripted provider for tests
#[cfg(test)]
pub struct MockProvider {
    pub response: Result<String>,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockProvider {
    pub fn replying(insight: &str) -> Self {
        Self {
            response: Ok(insight.to_string()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: Err(InsightError::Unavailable),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl InsightProvider for MockProvider {
    async fn is_available(&self) -> bool {
        self.response.is_ok()
    }

    async fn request_insight(&self, _text: &str) -> Result<String> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.response {
            Ok(insight) => Ok(insight.clone()),
            Err(InsightError::Api(msg)) => Err(InsightError::Api(msg.clone())),
            Err(InsightError::BadResponse(msg)) => Err(InsightError::BadResponse(msg.clone())),
            Err(InsightError::Unavailable) => Err(InsightError::Unavailable),
        }
    }
}
