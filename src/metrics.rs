use ndarray::ArrayView1;

use crate::error::{Error, Result};

/// Number of positions where prediction and truth disagree.
pub fn misclassified(
    y_true: ArrayView1<'_, usize>,
    y_pred: ArrayView1<'_, usize>,
) -> Result<usize> {
    check_lengths(y_true, y_pred)?;

    Ok(y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(truth, prediction)| truth != prediction)
        .count())
}

/// Fraction of correct predictions, in [0, 1].
pub fn accuracy_score(
    y_true: ArrayView1<'_, usize>,
    y_pred: ArrayView1<'_, usize>,
) -> Result<f64> {
    let errors = misclassified(y_true, y_pred)?;

    Ok((y_true.len() - errors) as f64 / y_true.len() as f64)
}

/// Occurrences of each class index, from 0 up to the largest label.
pub fn bincount(labels: ArrayView1<'_, usize>) -> Vec<usize> {
    let mut counts = vec![0; labels.iter().max().map_or(0, |&max| max + 1)];

    for &label in labels {
        counts[label] += 1;
    }

    counts
}

fn check_lengths(y_true: ArrayView1<'_, usize>, y_pred: ArrayView1<'_, usize>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(Error::InvalidInput(format!(
            "{} true labels but {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }

    if y_true.is_empty() {
        return Err(Error::InvalidInput("no labels to score".to_owned()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    #[test]
    fn counts_disagreements() {
        let y_true = array![0, 1, 2, 2, 1];
        let y_pred = array![0, 2, 2, 1, 1];

        assert_eq!(misclassified(y_true.view(), y_pred.view()).unwrap(), 2);
        assert_abs_diff_eq!(accuracy_score(y_true.view(), y_pred.view()).unwrap(), 0.6);
    }

    #[test]
    fn perfect_predictions_score_one() {
        let labels = array![1, 0, 1];

        assert_abs_diff_eq!(accuracy_score(labels.view(), labels.view()).unwrap(), 1.0);
    }

    #[test]
    fn rejects_length_mismatch_and_empty() {
        let empty = Array1::<usize>::zeros(0);

        assert!(matches!(
            accuracy_score(array![0, 1].view(), array![0].view()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            misclassified(empty.view(), empty.view()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn bincount_fills_missing_classes() {
        assert_eq!(bincount(array![0, 2, 2, 0, 2].view()), vec![2, 0, 3]);
        assert!(bincount(Array1::<usize>::zeros(0).view()).is_empty());
    }
}
