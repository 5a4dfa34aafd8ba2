use std::io;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("incorrect checksum format: {spec}")]
    MalformedSpec { spec: String },

    #[error("unsupported hashing algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("checksum mismatch, expected: {expected:?}, got: {actual:?}")]
    Mismatch { expected: String, actual: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, VerificationError>;
