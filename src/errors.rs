//! Error types shared across the crate.
//!
//! Two kinds of failure are kept apart: data-dependent conditions
//! (malformed wire values, non-residues, byte-tree framing faults) are
//! typed variants that the verification walk turns into failure
//! predicates, while structural faults (unreadable file, invalid JSON)
//! abort at the record-loading boundary.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("empty or non-decimal digit string")]
    MalformedDecimal,
    #[error("modulus must be odd for binary inversion")]
    EvenModulus,
    #[error("element is not invertible")]
    NotInvertible,
    #[error("not a quadratic residue")]
    NonResidue,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ByteTreeError {
    #[error("unknown byte tree tag {0:#04x}")]
    UnknownTag(u8),
    #[error("byte tree length must be positive")]
    NonPositiveLength,
    #[error("byte tree truncated")]
    Truncated,
    #[error("{0} trailing bytes after byte tree")]
    TrailingBytes(usize),
}

/// Failures turning wire material into field or group elements.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlgebraError {
    #[error("malformed decimal string")]
    MalformedDecimal,
    #[error("value out of range")]
    OutOfRange,
    #[error("Not a quadratic residue!")]
    NotQuadraticResidue,
    #[error("unsupported group encoding {0}")]
    UnsupportedEncoding(u32),
    #[error("modulus is not a usable odd prime")]
    BadModulus,
    #[error("generator is not in the subgroup")]
    BadGenerator,
    #[error("message too long to encode ({0} bytes)")]
    MessageTooLong(usize),
    #[error("byte tree: {0}")]
    ByteTree(#[from] ByteTreeError),
}

impl From<ArithmeticError> for AlgebraError {
    fn from(e: ArithmeticError) -> Self {
        match e {
            ArithmeticError::MalformedDecimal => AlgebraError::MalformedDecimal,
            ArithmeticError::NonResidue => AlgebraError::NotQuadraticResidue,
            ArithmeticError::EvenModulus | ArithmeticError::NotInvertible => {
                AlgebraError::OutOfRange
            }
        }
    }
}

/// Fatal faults at the record-loading boundary; never produced once the
/// verification walk has started.
#[derive(Debug, Error)]
pub enum StructuralError {
    #[error("cannot read record: {0}")]
    Io(#[from] std::io::Error),
    #[error("record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
