use crate::config::SessionConfig;
use thiserror::Error;

/// Rejected user input. Handled where the input is read; never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Answer limit has to be a positive integer.")]
    InvalidLimit(String),

    #[error("Collection name cannot be empty.")]
    EmptyCollectionName,
}

/// Values the user can change between commands.
///
/// Setters consume the session and return the updated one, so a rejected
/// change leaves the caller's value as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    collection_name: String,
    answer_limit: u64,
}

impl Session {
    pub fn new(collection_name: impl Into<String>, answer_limit: u64) -> Self {
        Self {
            collection_name: collection_name.into(),
            answer_limit,
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn answer_limit(&self) -> u64 {
        self.answer_limit
    }

    pub fn with_collection_name(self, collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            ..self
        }
    }

    pub fn with_answer_limit(self, answer_limit: u64) -> Self {
        Self { answer_limit, ..self }
    }

    /// Parses `input` as the new answer limit.
    pub fn with_answer_limit_input(&self, input: &str) -> Result<Self, InputError> {
        match input.trim().parse::<u64>() {
            Ok(limit) if limit > 0 => Ok(self.clone().with_answer_limit(limit)),
            _ => Err(InputError::InvalidLimit(input.to_string())),
        }
    }

    /// Uses `input` as the new collection name after trimming whitespace.
    pub fn with_collection_name_input(&self, input: &str) -> Result<Self, InputError> {
        let name = input.trim();
        if name.is_empty() {
            return Err(InputError::EmptyCollectionName);
        }
        Ok(self.clone().with_collection_name(name))
    }
}

impl From<&SessionConfig> for Session {
    fn from(config: &SessionConfig) -> Self {
        Self::new(config.collection_name.clone(), config.answer_limit)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}
