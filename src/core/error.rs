use thiserror::Error;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Global battle config already set")]
    ConfigAlreadySet,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BattleError>;
