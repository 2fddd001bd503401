/// Local sentence embeddings via fastembed
///
/// Runs sentence-transformers/all-MiniLM-L6-v2 on the CPU. Inference is blocking,
/// so each batch is handed to the blocking thread pool.
use std::sync::{Arc, Mutex};

use anyhow::Context;
use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::{
    error::{AppError, AppResult},
    services::embedding::EmbeddingProvider,
};

const MODEL_NAME: &str = "all-minilm-l6-v2";

#[derive(Clone)]
pub struct FastEmbedProvider {
    model: Arc<Mutex<TextEmbedding>>,
    max_chars: usize,
}

impl FastEmbedProvider {
    /// Loads the model, downloading weights into the fastembed cache on first use
    pub fn new(model_name: &str, max_chars: usize) -> anyhow::Result<Self> {
        let model = parse_model(model_name)?;
        let embedder = TextEmbedding::try_new(InitOptions::new(model))
            .context("Failed to initialize fastembed model")?;

        tracing::info!(model = MODEL_NAME, max_chars, "Embedding model loaded");

        Ok(Self {
            model: Arc::new(Mutex::new(embedder)),
            max_chars,
        })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn encode(&self, texts: Vec<String>) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let max_chars = self.max_chars;
        let batch = texts.len();

        let embeddings = tokio::task::spawn_blocking(move || {
            let prepared: Vec<String> = texts
                .iter()
                .map(|text| truncate_to_chars(text, max_chars).to_string())
                .collect();

            let mut model = model.lock().map_err(|_| {
                AppError::EmbeddingUnavailable("embedding model lock poisoned".to_string())
            })?;

            model
                .embed(prepared, None)
                .map_err(|e| AppError::EmbeddingUnavailable(e.to_string()))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Embedding task failed: {}", e)))??;

        tracing::debug!(batch, model = MODEL_NAME, "Texts embedded");

        Ok(embeddings)
    }

    fn name(&self) -> &'static str {
        MODEL_NAME
    }
}

fn parse_model(name: &str) -> anyhow::Result<EmbeddingModel> {
    match name.trim().to_lowercase().as_str() {
        "" | "minilm" | "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => {
            Ok(EmbeddingModel::AllMiniLML6V2)
        }
        other => anyhow::bail!(
            "Unsupported EMBEDDING_MODEL '{}'. Supported value: {}",
            other,
            MODEL_NAME
        ),
    }
}

fn truncate_to_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_aliases() {
        for alias in [
            "all-MiniLM-L6-v2",
            "sentence-transformers/all-MiniLM-L6-v2",
            "minilm",
            "",
        ] {
            assert!(matches!(
                parse_model(alias),
                Ok(EmbeddingModel::AllMiniLML6V2)
            ));
        }
    }

    #[test]
    fn test_parse_model_rejects_unknown() {
        let err = parse_model("text-embedding-3-large").unwrap_err();
        assert!(err.to_string().contains("Unsupported EMBEDDING_MODEL"));
    }

    #[test]
    fn test_truncate_to_chars() {
        assert_eq!(truncate_to_chars("heist", 10), "heist");
        assert_eq!(truncate_to_chars("heist", 3), "hei");
        assert_eq!(truncate_to_chars("amélie", 3), "amé");
        assert_eq!(truncate_to_chars("heist", 0), "");
    }
}
