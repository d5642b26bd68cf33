use thiserror::Error;

/// Errors raised while validating a view request. All of them point at a
/// caller bug or a bad input value; none are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("bin count must be a positive integer, got {0}")]
    InvalidBinCount(i64),
    #[error("unknown numeric column: {0:?}")]
    UnknownColumn(String),
    #[error("unknown species: {0:?}")]
    UnknownSpecies(String),
    #[error("unknown island: {0:?}")]
    UnknownIsland(String),
    #[error("unknown sex: {0:?}")]
    UnknownSex(String),
    #[error("invalid bin domain [{min}, {max}]")]
    InvalidDomain { min: f64, max: f64 },
}
