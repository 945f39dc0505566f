use thiserror::Error;

/// A field-level constraint violation. Carries the wire name of the
/// offending field so the boundary can report it as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is invalid")]
    InvalidField(&'static str),
    #[error("{0} is out of bounds")]
    OutOfRange(&'static str),
}

/// Raised when a symbolic enum name does not belong to the closed set.
#[derive(Clone, Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
