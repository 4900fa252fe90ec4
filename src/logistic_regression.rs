use ndarray::{Array1, ArrayView1, ArrayView2, Axis, Slice, Zip};
use ndarray_rand::rand::{rngs::StdRng, SeedableRng};
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Net input is clipped to this magnitude before exponentiation so `exp`
/// never overflows.
pub const CLIP_BOUND: f64 = 250.0;

const WEIGHT_INIT_SCALE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperparameters {
    /// Learning rate, meaningful in (0, 1].
    pub eta: f64,
    pub n_iter: usize,
    pub seed: u64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            eta: 0.05,
            n_iter: 100,
            seed: 1,
        }
    }
}

#[derive(Debug, Clone)]
enum State {
    Untrained,
    Trained {
        /// Index 0 is the bias, the rest are per-feature weights.
        weights: Array1<f64>,
        cost_history: Vec<f64>,
    },
}

/// Binary logistic regression trained by full-batch gradient descent on the
/// cross-entropy loss.
#[derive(Debug, Clone)]
pub struct LogisticRegressionGD {
    hyperparameters: Hyperparameters,
    state: State,
}

impl Default for LogisticRegressionGD {
    fn default() -> Self {
        Self::with_hyperparameters(Hyperparameters::default())
    }
}

impl LogisticRegressionGD {
    pub fn new(eta: f64, n_iter: usize, seed: u64) -> Self {
        Self::with_hyperparameters(Hyperparameters { eta, n_iter, seed })
    }

    pub fn with_hyperparameters(hyperparameters: Hyperparameters) -> Self {
        Self {
            hyperparameters,
            state: State::Untrained,
        }
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        self.hyperparameters
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.state, State::Trained { .. })
    }

    /// Trains from scratch, discarding any previously learned weights.
    ///
    /// `labels` must hold only 0 and 1. Each epoch records the cost of the
    /// activations the update was computed from, i.e. before the update.
    pub fn fit(
        &mut self,
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, usize>,
    ) -> Result<()> {
        let targets = binary_targets(features, labels)?;
        let Hyperparameters { eta, n_iter, seed } = self.hyperparameters;

        info!(
            samples = features.nrows(),
            features = features.ncols(),
            eta,
            epochs = n_iter,
            seed,
            "fitting logistic regression"
        );

        let mut weights = initial_weights(seed, features.ncols())?;
        let mut cost_history = Vec::with_capacity(n_iter);

        for epoch in 0..n_iter {
            let output = Self::activate(compute_net_input(&weights, features).view());
            let errors = &targets - &output;

            weights
                .slice_axis_mut(Axis(0), Slice::from(1..))
                .scaled_add(eta, &features.t().dot(&errors));
            weights[0] += eta * errors.sum();

            let cost = cross_entropy(targets.view(), output.view());
            debug!(epoch, cost, "epoch finished");
            cost_history.push(cost);
        }

        info!(
            first_cost = cost_history.first().copied(),
            final_cost = cost_history.last().copied(),
            "logistic regression fitted"
        );

        self.state = State::Trained {
            weights,
            cost_history,
        };

        Ok(())
    }

    /// `bias + features · weights` for every row.
    pub fn net_input(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let weights = self.fitted_weights()?;

        if features.ncols() + 1 != weights.len() {
            return Err(Error::InvalidInput(format!(
                "expected {} features per row, got {}",
                weights.len() - 1,
                features.ncols()
            )));
        }

        Ok(compute_net_input(weights, features))
    }

    /// Elementwise logistic sigmoid of `z`, clipped to `[-CLIP_BOUND, CLIP_BOUND]`.
    pub fn activate(z: ArrayView1<'_, f64>) -> Array1<f64> {
        z.mapv(sigmoid)
    }

    /// Class 1 where the net input is non-negative, class 0 elsewhere.
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
        let net_input = self.net_input(features)?;

        Ok(net_input.mapv(|z| usize::from(z >= 0.0)))
    }

    /// Bias followed by the per-feature weights.
    pub fn weights(&self) -> Result<ArrayView1<'_, f64>> {
        self.fitted_weights().map(Array1::view)
    }

    pub fn bias(&self) -> Result<f64> {
        self.fitted_weights().map(|weights| weights[0])
    }

    pub fn coefficients(&self) -> Result<ArrayView1<'_, f64>> {
        self.fitted_weights()
            .map(|weights| weights.slice_axis(Axis(0), Slice::from(1..)))
    }

    pub fn cost_history(&self) -> Result<&[f64]> {
        match &self.state {
            State::Trained { cost_history, .. } => Ok(cost_history),
            State::Untrained => Err(Error::IllegalState("logistic regression is not fitted")),
        }
    }

    fn fitted_weights(&self) -> Result<&Array1<f64>> {
        match &self.state {
            State::Trained { weights, .. } => Ok(weights),
            State::Untrained => Err(Error::IllegalState("logistic regression is not fitted")),
        }
    }
}

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z.clamp(-CLIP_BOUND, CLIP_BOUND)).exp())
}

fn initial_weights(seed: u64, dimensions: usize) -> Result<Array1<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let distribution = Normal::new(0.0, WEIGHT_INIT_SCALE)?;

    Ok(Array1::random_using(dimensions + 1, distribution, &mut rng))
}

fn compute_net_input(weights: &Array1<f64>, features: ArrayView2<'_, f64>) -> Array1<f64> {
    features.dot(&weights.slice_axis(Axis(0), Slice::from(1..))) + weights[0]
}

// -Σ y·ln(a) - Σ (1-y)·ln(1-a), skipping the terms whose factor is zero.
fn cross_entropy(targets: ArrayView1<'_, f64>, output: ArrayView1<'_, f64>) -> f64 {
    let mut positive = 0.0;
    let mut negative = 0.0;

    Zip::from(&targets).and(&output).for_each(|&target, &activation| {
        if target > 0.5 {
            positive += activation.ln();
        } else {
            negative += (1.0 - activation).ln();
        }
    });

    -positive - negative
}

fn binary_targets(
    features: ArrayView2<'_, f64>,
    labels: ArrayView1<'_, usize>,
) -> Result<Array1<f64>> {
    if features.nrows() != labels.len() {
        return Err(Error::InvalidInput(format!(
            "{} feature rows but {} labels",
            features.nrows(),
            labels.len()
        )));
    }

    if features.nrows() == 0 || features.ncols() == 0 {
        return Err(Error::InvalidInput(format!(
            "training set must be non-empty, got {}x{}",
            features.nrows(),
            features.ncols()
        )));
    }

    if let Some(label) = labels.iter().find(|&&label| label > 1) {
        return Err(Error::InvalidInput(format!(
            "label {label} is not binary, expected 0 or 1"
        )));
    }

    Ok(labels.mapv(|label| label as f64))
}
