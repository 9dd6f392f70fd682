use crate::ElementType;

use ark_serialize::SerializationError;
use std::io;
use thiserror::Error;

/// Errors that may occur when reading, writing or checking ceremony data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Circuit mismatch: expected cs_hash {expected}, found {found}")]
    CircuitMismatch { expected: String, found: String },
    #[error("Transcript inconsistency: {0}")]
    TranscriptInconsistency(String),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error(transparent)]
    Io(io::Error),
    #[error("Serialization error: {0}")]
    Serialization(SerializationError),
}

/// Malformed input. Always fatal.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Unexpected end of stream")]
    UnexpectedEof,
    #[error("Unrecognized point marker 0x{0:02x}")]
    InvalidMarker(u8),
    #[error("Invalid length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("The first element of {0} is not the group generator")]
    InvalidGenerator(ElementType),
    #[error("Field element is not in canonical form")]
    InvalidFieldElement,
    #[error("Point is not on the curve or not in the prime order subgroup")]
    InvalidPoint,
    #[error("Invalid hash text")]
    InvalidHashText,
    #[error("Index {index} out of range, must be below {bound}")]
    IndexOutOfRange { index: usize, bound: usize },
}

/// A bad or malicious contribution, or a malformed accumulator.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid ratio: {0}")]
    InvalidRatio(String),
    #[error("{0} must not be zero")]
    ZeroElement(ElementType),
    #[error("{0} must not be empty")]
    EmptyVector(ElementType),
    #[error("Length mismatch for {element}: expected {expected}, got {got}")]
    LengthMismatch {
        element: ElementType,
        expected: usize,
        got: usize,
    },
    #[error("The contribution must be a non-zero scalar")]
    ZeroContribution,
    #[error("Assembled keypair is malformed: {0}")]
    MalformedKeypair(String),
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => Error::Format(FormatError::UnexpectedEof),
            _ => Error::Io(error),
        }
    }
}

impl From<SerializationError> for Error {
    fn from(error: SerializationError) -> Self {
        match error {
            SerializationError::IoError(e) => e.into(),
            SerializationError::InvalidData | SerializationError::UnexpectedFlags => {
                Error::Format(FormatError::InvalidPoint)
            }
            e => Error::Serialization(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reads_are_format_errors() {
        let err: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(matches!(err, Error::Format(FormatError::UnexpectedEof)));

        let err: Error = SerializationError::IoError(io::Error::new(io::ErrorKind::UnexpectedEof, "eof")).into();
        assert!(matches!(err, Error::Format(FormatError::UnexpectedEof)));

        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
