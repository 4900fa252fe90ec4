use ndarray_rand::rand_distr::NormalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied data the model is not defined for: mismatched shapes,
    /// labels outside the expected set, empty inputs.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Model used before calling `fit`.
    #[error("illegal state: {0}")]
    IllegalState(&'static str),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("feature value is not a number: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("weight initializer: {0}")]
    Initializer(#[from] NormalError),
}

pub type Result<T> = std::result::Result<T, Error>;
