use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolytalkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Translation from {from} to {to} not supported")]
    PathUnavailable { from: String, to: String },

    #[error("Failed to load model {model}: {reason}")]
    ModelLoad { model: String, reason: String },

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Audio generation failed: {0}")]
    Synthesis(String),

    #[error("Please enter text to translate")]
    EmptyInput,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PolytalkError>;
