use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("likert value {value} is outside 1..=5")]
    LikertOutOfRange { value: u32 },
}
