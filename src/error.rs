use thiserror::Error;

pub type Result<T> = std::result::Result<T, BacktestError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Invalid strategy parameter {key} (value: {value})")]
    InvalidParameter { key: String, value: f64 },
}
