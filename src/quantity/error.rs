use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("{0}: not a valid number.")]
    InvalidNumber(String),

    #[error("units mismatch: expected '{expected}', found '{found}'")]
    UnitsMismatch { expected: String, found: String },

    #[error("{0}: unknown constant.")]
    UnknownConstant(String),

    #[error("precision must be between 0 and {max}, got {0}", max = MAX_PRECISION)]
    InvalidPrecision(i64),

    #[error("invalid format specification: '{0}'")]
    BadFormatSpec(String),

    #[error("{0}: not a valid assignment.")]
    InvalidAssignment(String),

    #[error("invalid assignment recognizer: {0}")]
    BadRecognizer(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Largest precision accepted from outside the crate. A double carries no
/// more than 767 significant decimal digits, so this is already all zeros.
pub const MAX_PRECISION: usize = 1000;

pub type Result<T> = std::result::Result<T, QuantityError>;

/// Convert a signed precision coming from outside the crate (config files,
/// command line, JavaScript) into a digit count.
pub fn check_precision(precision: i64) -> Result<usize> {
    usize::try_from(precision)
        .ok()
        .filter(|p| *p <= MAX_PRECISION)
        .ok_or(QuantityError::InvalidPrecision(precision))
}
