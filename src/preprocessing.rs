use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<usize>,
    pub y_test: Array1<usize>,
}

/// Shuffles rows with a seeded generator and holds out `test_size` of them.
///
/// With `stratify` every class gives up the same share of its rows, so the
/// class proportions of both parts follow the full set.
pub fn train_test_split(
    features: ArrayView2<'_, f64>,
    targets: ArrayView1<'_, usize>,
    test_size: f64,
    seed: u64,
    stratify: bool,
) -> Result<Split> {
    if features.nrows() != targets.len() {
        return Err(Error::InvalidInput(format!(
            "{} feature rows but {} targets",
            features.nrows(),
            targets.len()
        )));
    }

    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::InvalidInput(format!(
            "test size must be in (0, 1), got {test_size}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let groups: Vec<Vec<usize>> = if stratify {
        let mut classes = targets.to_vec();
        classes.sort_unstable();
        classes.dedup();

        classes
            .iter()
            .map(|&class| {
                (0..targets.len())
                    .filter(|&row| targets[row] == class)
                    .collect()
            })
            .collect()
    } else {
        vec![(0..targets.len()).collect()]
    };

    let mut train_rows = Vec::new();
    let mut test_rows = Vec::new();

    for mut rows in groups {
        rows.shuffle(&mut rng);

        #[allow(clippy::cast_possible_truncation)]
        #[allow(clippy::cast_sign_loss)]
        let test_count = (rows.len() as f64 * test_size).round() as usize;

        test_rows.extend_from_slice(&rows[..test_count]);
        train_rows.extend_from_slice(&rows[test_count..]);
    }

    if train_rows.is_empty() || test_rows.is_empty() {
        return Err(Error::InvalidInput(format!(
            "test size {test_size} leaves an empty part for {} rows",
            targets.len()
        )));
    }

    train_rows.shuffle(&mut rng);
    test_rows.shuffle(&mut rng);

    debug!(
        train = train_rows.len(),
        test = test_rows.len(),
        stratify,
        "split dataset"
    );

    Ok(Split {
        x_train: features.select(Axis(0), &train_rows),
        x_test: features.select(Axis(0), &test_rows),
        y_train: targets.select(Axis(0), &train_rows),
        y_test: targets.select(Axis(0), &test_rows),
    })
}

/// Per-column z-score normalization learned from a training set.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    statistics: Option<(Array1<f64>, Array1<f64>)>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns column means and population standard deviations. Constant
    /// columns get a deviation of 1 so they map to zero.
    pub fn fit(&mut self, features: ArrayView2<'_, f64>) -> Result<()> {
        let Some(mean) = features.mean_axis(Axis(0)) else {
            return Err(Error::InvalidInput("cannot fit scaler on zero rows".to_owned()));
        };

        let std = features
            .std_axis(Axis(0), 0.0)
            .mapv(|deviation| if deviation == 0.0 { 1.0 } else { deviation });

        self.statistics = Some((mean, std));

        Ok(())
    }

    pub fn transform(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let Some((mean, std)) = &self.statistics else {
            return Err(Error::IllegalState("standard scaler is not fitted"));
        };

        if features.ncols() != mean.len() {
            return Err(Error::InvalidInput(format!(
                "scaler fitted on {} columns, got {}",
                mean.len(),
                features.ncols()
            )));
        }

        Ok((&features - mean) / std)
    }

    pub fn fit_transform(&mut self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self.fit(features)?;

        self.transform(features)
    }

    pub fn mean(&self) -> Option<ArrayView1<'_, f64>> {
        self.statistics.as_ref().map(|(mean, _)| mean.view())
    }

    pub fn scale(&self) -> Option<ArrayView1<'_, f64>> {
        self.statistics.as_ref().map(|(_, std)| std.view())
    }
}
