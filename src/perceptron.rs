use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, info};

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct Fitted {
    classes: Vec<usize>,
    /// One row of weights per class.
    weights: Array2<f64>,
    bias: Array1<f64>,
    errors: Vec<usize>,
}

/// Multiclass perceptron built from one binary perceptron per class
/// (one-vs-rest), trained with per-sample updates.
#[derive(Debug, Clone)]
pub struct Perceptron {
    pub eta: f64,
    pub n_iter: usize,
    pub seed: u64,
    fitted: Option<Fitted>,
}

impl Perceptron {
    pub fn new(eta: f64, n_iter: usize, seed: u64) -> Self {
        Self {
            eta,
            n_iter,
            seed,
            fitted: None,
        }
    }

    pub fn fit(
        &mut self,
        features: ArrayView2<'_, f64>,
        targets: ArrayView1<'_, usize>,
    ) -> Result<()> {
        if features.nrows() != targets.len() {
            return Err(Error::InvalidInput(format!(
                "{} feature rows but {} targets",
                features.nrows(),
                targets.len()
            )));
        }

        let mut classes = targets.to_vec();
        classes.sort_unstable();
        classes.dedup();

        if classes.len() < 2 || features.ncols() == 0 {
            return Err(Error::InvalidInput(format!(
                "need at least two classes and one feature, got {} classes and {} features",
                classes.len(),
                features.ncols()
            )));
        }

        info!(
            samples = features.nrows(),
            classes = classes.len(),
            eta = self.eta,
            epochs = self.n_iter,
            "fitting perceptron"
        );

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut weights = Array2::zeros((classes.len(), features.ncols()));
        let mut bias = Array1::zeros(classes.len());
        let mut errors = Vec::with_capacity(self.n_iter);
        let mut order: Vec<usize> = (0..features.nrows()).collect();

        for epoch in 0..self.n_iter {
            order.shuffle(&mut rng);
            let mut epoch_errors = 0;

            for &row in &order {
                let sample = features.row(row);

                for (class_index, &class) in classes.iter().enumerate() {
                    let target = if targets[row] == class { 1.0 } else { -1.0 };
                    let score = sample.dot(&weights.row(class_index)) + bias[class_index];
                    let prediction = if score >= 0.0 { 1.0 } else { -1.0 };

                    let update = self.eta * (target - prediction);
                    if update != 0.0 {
                        weights.row_mut(class_index).scaled_add(update, &sample);
                        bias[class_index] += update;
                        epoch_errors += 1;
                    }
                }
            }

            debug!(epoch, errors = epoch_errors, "perceptron epoch finished");
            errors.push(epoch_errors);
        }

        self.fitted = Some(Fitted {
            classes,
            weights,
            bias,
            errors,
        });

        Ok(())
    }

    /// One score per row and class.
    pub fn decision_function(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let fitted = self.fitted()?;

        if features.ncols() != fitted.weights.ncols() {
            return Err(Error::InvalidInput(format!(
                "expected {} features per row, got {}",
                fitted.weights.ncols(),
                features.ncols()
            )));
        }

        Ok(features.dot(&fitted.weights.t()) + &fitted.bias)
    }

    /// Class with the highest score; ties go to the smaller class.
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
        let fitted = self.fitted()?;
        let scores = self.decision_function(features)?;

        Ok(scores.map_axis(Axis(1), |row| {
            let mut best = 0;
            for (index, &score) in row.iter().enumerate() {
                if score > row[best] {
                    best = index;
                }
            }

            fitted.classes[best]
        }))
    }

    pub fn classes(&self) -> Result<&[usize]> {
        self.fitted().map(|fitted| fitted.classes.as_slice())
    }

    /// Binary update count of every epoch.
    pub fn errors(&self) -> Result<&[usize]> {
        self.fitted().map(|fitted| fitted.errors.as_slice())
    }

    fn fitted(&self) -> Result<&Fitted> {
        self.fitted
            .as_ref()
            .ok_or(Error::IllegalState("perceptron is not fitted"))
    }
}
