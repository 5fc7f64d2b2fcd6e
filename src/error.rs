//! Error handling for the skill normalizer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillNormalizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

/// Failure modes when pulling a JSON object out of free model text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("response text is empty")]
    Empty,

    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("malformed JSON in response: {0}")]
    Malformed(String),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(String),
}

pub type Result<T> = std::result::Result<T, SkillNormalizerError>;

impl SkillNormalizerError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SkillNormalizerError::InvalidInput(_))
    }
}
