//! Error types for the genetic program core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A registry pool that must have at least one entry is empty. This is a
    /// host-setup problem, not a steady-state condition: the typed selection
    /// lookups return `None` instead of this error.
    #[error("signature registry pool '{pool}' is empty")]
    EmptyRegistry { pool: &'static str },

    /// The core's own correctness contract was broken (synthesis, mutation or
    /// codec produced an inconsistent tree). Never caught inside the core.
    #[error("invariant violation: {0}")]
    Invariant(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// A malformed byte stream. Recovered at root-statement granularity during
/// program decode; fatal anywhere else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected tag {actual} at offset {offset}, expected one of {expected:?}")]
    UnexpectedTag {
        expected: Vec<u8>,
        actual: u8,
        offset: usize,
    },

    #[error("unexpected end of stream at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("unknown genetic type code {code} at offset {offset}")]
    UnknownType { code: u8, offset: usize },

    #[error("unknown operator code {code} at offset {offset}")]
    UnknownOperator { code: u8, offset: usize },

    #[error("literal value {value} is out of domain for type code {type_code} at offset {offset}")]
    InvalidLiteral {
        type_code: u8,
        value: u8,
        offset: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::UnexpectedTag {
            expected: vec![2, 4],
            actual: 9,
            offset: 17,
        };
        let msg = err.to_string();
        assert!(msg.contains("unexpected tag 9"));
        assert!(msg.contains("offset 17"));
    }

    #[test]
    fn test_parse_error_converts_to_error() {
        let err: Error = ParseError::UnexpectedEof { offset: 0 }.into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
