use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("context engine unreachable: {0}")]
    ConnectionRefused(String),
    #[error("context engine returned status {0}")]
    ServerError(u16),
    #[error("malformed context engine response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("line numbers are 1-based")]
    ZeroLine,
    #[error("line range {start}-{end} ends before it starts")]
    InvertedRange { start: u32, end: u32 },
    #[error("invalid line range '{0}', expected START-END")]
    InvalidLineRange(String),
}
