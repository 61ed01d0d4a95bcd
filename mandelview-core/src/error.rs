use thiserror::Error;

/// Errors originating from the numeric core.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("complex region bounds cannot be missing: no {corner} corner given")]
    MissingCorner { corner: &'static str },

    #[error("invalid {corner} corner: {value} (components must be finite)")]
    InvalidCorner { corner: &'static str, value: String },

    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    #[error("invalid escape bound: {0} (must be > 0.0 and finite)")]
    InvalidBound(f64),

    #[error("division by a zero-magnitude value")]
    DivisionByZero,

    #[error("cannot represent {0} as a decimal")]
    NonFiniteDecimal(f64),

    #[error("invalid decimal {input:?}: {reason}")]
    InvalidDecimal { input: String, reason: String },
}
