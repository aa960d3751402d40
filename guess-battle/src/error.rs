use thiserror::Error;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config syntax error: {0}")]
    Json5(#[from] json5::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid prediction for {owner}: {reason}")]
    Prediction { owner: String, reason: String },

    #[error("Malformed ranking data: {0}")]
    RankingData(String),
}

pub type Result<T> = std::result::Result<T, BattleError>;
