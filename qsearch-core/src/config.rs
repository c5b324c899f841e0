use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the Qdrant endpoint.
pub const QDRANT_URL_VAR: &str = "QDRANT_URL";
/// Environment variable holding the Qdrant API key.
pub const QDRANT_API_KEY_VAR: &str = "QDRANT_API_KEY";
/// Environment variable holding the embedding provider API key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Environment variable '{0}' not available. Create new environment variable or restart the shell if already created.")]
    MissingVar(String),

    #[error("Invalid config value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings for the whole tool.
///
/// Everything here is non-secret and may live in a YAML file. Endpoints and
/// keys for the external services come from [`Credentials`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Where the question/answer records are downloaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    /// Record key whose value is turned into the embedding.
    #[serde(default = "default_embedding_key")]
    pub embedding_key: String,
}

/// Embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    pub base_url: String,
    /// Length of every vector the model returns; also the collection vector size.
    #[serde(default = "default_dimension")]
    pub dimension: u64,
}

/// Vector database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Request timeout for the Qdrant client
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Initial values of the interactive session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub collection_name: String,
    #[serde(default = "default_answer_limit")]
    pub answer_limit: u64,
}

fn default_embedding_key() -> String {
    "info".to_string()
}

fn default_dimension() -> u64 {
    1536
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_answer_limit() -> u64 {
    1
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "https://unknow.news/archiwum_aidevs.json".to_string(),
            embedding_key: default_embedding_key(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-ada-002".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            dimension: default_dimension(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            collection_name: "s004_qdrant_search".to_string(),
            answer_limit: default_answer_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            embedding: EmbeddingConfig::default(),
            storage: StorageConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the interactive setters would also refuse.
    pub fn validate(&self) -> Result<()> {
        if self.session.answer_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.answer_limit",
                reason: "has to be a positive integer".to_string(),
            });
        }
        if self.session.collection_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "session.collection_name",
                reason: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Load configuration from `path` if it exists, otherwise use defaults.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Endpoints and API keys of the external services.
///
/// Keys are opaque to this crate and are never printed.
#[derive(Debug)]
pub struct Credentials {
    pub qdrant_url: String,
    pub qdrant_api_key: SecretString,
    pub openai_api_key: SecretString,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, failing on the first missing variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| lookup(name).ok_or_else(|| ConfigError::MissingVar(name.to_string()));

        Ok(Self {
            qdrant_url: require(QDRANT_URL_VAR)?,
            qdrant_api_key: SecretString::from(require(QDRANT_API_KEY_VAR)?),
            openai_api_key: SecretString::from(require(OPENAI_API_KEY_VAR)?),
        })
    }
}
