pub mod dataset;
pub mod error;
pub mod logistic_regression;
pub mod metrics;
pub mod perceptron;
pub mod preprocessing;

pub use error::{Error, Result};
pub use logistic_regression::{Hyperparameters, LogisticRegressionGD};
pub use perceptron::Perceptron;
