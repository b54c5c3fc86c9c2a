use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageDiffError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Comparison cancelled after {records} alignment records")]
    Cancelled { records: usize },
}
