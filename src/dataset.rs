use csv::ReaderBuilder;
use ndarray::{Array1, Array2, Axis};
use std::io::Read;

use crate::error::{Error, Result};

const IRIS_CSV: &str = include_str!("../data/iris.csv");

/// Petal length and petal width columns of the iris measurements.
pub const PETAL_FEATURES: [usize; 2] = [2, 3];

/// Numeric feature matrix with one integer class label per row.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Array2<f64>,
    pub targets: Array1<usize>,
    pub feature_names: Vec<String>,
    pub class_names: Vec<String>,
}

/// 150 flowers, 4 measurements each, 3 species of 50.
pub fn load_iris() -> Result<Dataset> {
    parse_csv(IRIS_CSV.as_bytes(), true)
}

/// Every column but the last is a number, the last is a class name.
/// Classes are numbered in order of first appearance.
pub fn parse_csv<R: Read>(reader: R, has_headers: bool) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .from_reader(reader);

    let mut feature_names: Vec<String> = if has_headers {
        reader.headers()?.iter().map(str::to_owned).collect()
    } else {
        Vec::new()
    };
    feature_names.pop();

    let mut rows = Vec::new();
    let mut targets = Vec::new();
    let mut class_names: Vec<String> = Vec::new();

    for result in reader.records() {
        let record = result?;

        let Some(class_name) = record.iter().next_back() else {
            continue;
        };

        let values = record
            .iter()
            .take(record.len() - 1)
            .map(|value| value.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()?;

        let known = class_names.iter().position(|name| name.as_str() == class_name);
        let class = if let Some(index) = known {
            index
        } else {
            class_names.push(class_name.to_owned());
            class_names.len() - 1
        };

        rows.push(values);
        targets.push(class);
    }

    let features = features_from_rows(&rows)?;

    if feature_names.is_empty() {
        feature_names = (0..features.ncols()).map(|index| format!("x{index}")).collect();
    }

    Ok(Dataset {
        features,
        targets: Array1::from(targets),
        feature_names,
        class_names,
    })
}

/// Stacks rows into a matrix, rejecting ragged input.
pub fn features_from_rows(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let dimensions = rows.first().map_or(0, Vec::len);

    if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != dimensions) {
        return Err(Error::InvalidInput(format!(
            "row {index} has {} features, expected {dimensions}",
            row.len()
        )));
    }

    let data: Vec<f64> = rows.iter().flatten().copied().collect();

    Array2::from_shape_vec((rows.len(), dimensions), data)
        .map_err(|error| Error::InvalidInput(error.to_string()))
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Sorted distinct class labels present in the data.
    pub fn unique_classes(&self) -> Vec<usize> {
        let mut classes = self.targets.to_vec();
        classes.sort_unstable();
        classes.dedup();

        classes
    }

    pub fn select_features(&self, columns: &[usize]) -> Result<Dataset> {
        if let Some(column) = columns.iter().find(|&&column| column >= self.features.ncols()) {
            return Err(Error::InvalidInput(format!(
                "feature column {column} out of range for {} columns",
                self.features.ncols()
            )));
        }

        Ok(Dataset {
            features: self.features.select(Axis(1), columns),
            targets: self.targets.clone(),
            feature_names: columns
                .iter()
                .map(|&column| self.feature_names[column].clone())
                .collect(),
            class_names: self.class_names.clone(),
        })
    }

    /// Keeps the rows whose class is listed, in their original order.
    #[must_use]
    pub fn filter_classes(&self, classes: &[usize]) -> Dataset {
        let rows: Vec<usize> = self
            .targets
            .iter()
            .enumerate()
            .filter(|&(_, class)| classes.contains(class))
            .map(|(row, _)| row)
            .collect();

        Dataset {
            features: self.features.select(Axis(0), &rows),
            targets: self.targets.select(Axis(0), &rows),
            feature_names: self.feature_names.clone(),
            class_names: self.class_names.clone(),
        }
    }
}
