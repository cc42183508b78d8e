use thiserror::Error;

/// Errors produced by recording sessions and their collaborators.
#[derive(Error, Debug)]
pub enum AvrecError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported stride for format {0}")]
    UnsupportedStride(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("muxer error: {0}")]
    Muxer(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, AvrecError>;
