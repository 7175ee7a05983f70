use thiserror::Error;

pub type Result<T> = std::result::Result<T, AstrologyError>;

#[derive(Debug, Error)]
pub enum AstrologyError {
    #[error("Calculation Error: {0}")]
    Calculation(String),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formatting Error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Prompt Error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("TOML Error: {0}")]
    Toml(#[from] toml::de::Error),
}
