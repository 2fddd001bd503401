/// Text embedding abstraction
///
/// The catalog builder and the ranker only need `encode`; the concrete model is
/// chosen at startup and shared through the application state.
use crate::error::AppResult;

pub mod fastembed;

pub use self::fastembed::FastEmbedProvider;

/// Trait for text embedding providers
///
/// `encode` is a batch call: one vector per input text, in input order, all of
/// the same dimensionality.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts
    ///
    /// Failures are reported as `AppError::EmbeddingUnavailable`.
    async fn encode(&self, texts: Vec<String>) -> AppResult<Vec<Vec<f32>>>;

    /// Model name for logging and debugging
    fn name(&self) -> &'static str;
}
