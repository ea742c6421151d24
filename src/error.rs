use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinancialRatioError {
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Open DART returned status {status}: {message}")]
    ApiStatus { status: String, message: String },

    #[error("Invalid account rules: {0}")]
    InvalidRules(String),

    #[error("DART_API_KEY is not set in the environment or .env file")]
    MissingApiKey,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "dart")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, FinancialRatioError>;
