use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OMDb API key
    pub omdb_api_key: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Embedding model name (only all-MiniLM-L6-v2 aliases are accepted)
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Plot texts are truncated to this many characters before embedding
    #[serde(default = "default_embedding_max_chars")]
    pub embedding_max_chars: usize,

    /// Number of similar titles returned when the request does not say
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com".to_string()
}

fn default_embedding_model() -> String {
    "all-minilm-l6-v2".to_string()
}

fn default_embedding_max_chars() -> usize {
    2000
}

fn default_recommendation_count() -> usize {
    3
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.recommendation_count == 0 {
            anyhow::bail!("RECOMMENDATION_COUNT must be at least 1");
        }

        Ok(config)
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
