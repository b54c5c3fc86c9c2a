use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("PDF is password protected")]
    PasswordProtected,

    #[error("Input is not valid UTF-8 text: {0}")]
    InvalidUtf8(String),

    #[error("No extraction backend accepts this input")]
    NoBackend,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
