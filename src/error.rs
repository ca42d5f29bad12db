use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("No repositories found for account: {0}")]
    EmptyResult(String),

    #[error("Schema error in record {row}, field `{field}`: {message}")]
    SchemaError {
        row: usize,
        field: &'static str,
        message: String,
    },

    #[error("Cannot parse timestamp {value:?} in record {row}: {message}")]
    ParseError {
        row: usize,
        value: String,
        message: String,
    },

    #[error("Invalid account identifier: {0}")]
    InvalidAccount(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
