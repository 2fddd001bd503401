/// OMDb API provider
///
/// API Flow:
/// 1. Lookup: /?apikey={key}&t={title}&y={year} → single best match
/// 2. `"Response": "False"` in the body means no match (OMDb still answers 200)
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{MovieMetadata, OmdbMovie},
    services::metadata::MetadataProvider,
};

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    fn lookup_url(&self) -> String {
        format!("{}/", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbProvider {
    async fn fetch(&self, title: &str, year: i32) -> AppResult<Option<MovieMetadata>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }

        let year_param = year.to_string();
        let response = self
            .http_client
            .get(self.lookup_url())
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("t", title),
                ("y", year_param.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let movie: OmdbMovie = response.json().await?;

        if !movie.is_found() {
            tracing::debug!(
                title = %title,
                year,
                reason = movie.error.as_deref().unwrap_or("unknown"),
                provider = "omdb",
                "No OMDb match"
            );
            return Ok(None);
        }

        let metadata = movie.into_metadata(title);

        tracing::info!(
            title = %title,
            year,
            has_plot = metadata.plot_text().is_some(),
            provider = "omdb",
            "Metadata fetched"
        );

        Ok(Some(metadata))
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
