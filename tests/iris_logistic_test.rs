use logistic::dataset::{load_iris, PETAL_FEATURES};
use logistic::metrics::{accuracy_score, misclassified};
use logistic::preprocessing::{train_test_split, StandardScaler};
use logistic::{Error, LogisticRegressionGD};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

struct Subsets {
    x_train: Array2<f64>,
    y_train: Array1<usize>,
    x_test: Array2<f64>,
    y_test: Array1<usize>,
}

fn binary_rows(
    features: ArrayView2<'_, f64>,
    targets: ArrayView1<'_, usize>,
) -> (Array2<f64>, Array1<usize>) {
    let rows: Vec<usize> = targets
        .iter()
        .enumerate()
        .filter(|&(_, &class)| class <= 1)
        .map(|(row, _)| row)
        .collect();

    (
        features.select(Axis(0), &rows),
        targets.select(Axis(0), &rows),
    )
}

// Split and scale all three species, then keep setosa and versicolor.
fn standardized_petal_subsets() -> Subsets {
    let iris = load_iris().unwrap().select_features(&PETAL_FEATURES).unwrap();
    let split =
        train_test_split(iris.features.view(), iris.targets.view(), 0.3, 1, true).unwrap();

    let mut scaler = StandardScaler::new();
    let x_train_std = scaler.fit_transform(split.x_train.view()).unwrap();
    let x_test_std = scaler.transform(split.x_test.view()).unwrap();

    let (x_train, y_train) = binary_rows(x_train_std.view(), split.y_train.view());
    let (x_test, y_test) = binary_rows(x_test_std.view(), split.y_test.view());

    Subsets {
        x_train,
        y_train,
        x_test,
        y_test,
    }
}

#[test]
fn separates_setosa_from_versicolor_petals() {
    let data = standardized_petal_subsets();
    assert_eq!(data.y_train.len(), 70);
    assert_eq!(data.y_test.len(), 30);

    let mut model = LogisticRegressionGD::new(0.05, 1000, 1);
    model.fit(data.x_train.view(), data.y_train.view()).unwrap();

    let train_predictions = model.predict(data.x_train.view()).unwrap();
    assert_eq!(misclassified(data.y_train.view(), train_predictions.view()).unwrap(), 0);

    let test_predictions = model.predict(data.x_test.view()).unwrap();
    assert!(accuracy_score(data.y_test.view(), test_predictions.view()).unwrap() >= 0.9);

    let costs = model.cost_history().unwrap();
    assert_eq!(costs.len(), 1000);
    assert!(costs[999] < 0.01 * costs[0], "first {} last {}", costs[0], costs[999]);
}

#[test]
fn retraining_reproduces_weights() {
    let data = standardized_petal_subsets();

    let mut first = LogisticRegressionGD::new(0.05, 200, 1);
    let mut second = LogisticRegressionGD::new(0.05, 200, 1);
    first.fit(data.x_train.view(), data.y_train.view()).unwrap();
    second.fit(data.x_train.view(), data.y_train.view()).unwrap();

    assert_eq!(first.weights().unwrap(), second.weights().unwrap());
    assert_eq!(first.cost_history().unwrap(), second.cost_history().unwrap());
}

#[test]
fn predictions_follow_net_input_sign() {
    let data = standardized_petal_subsets();

    let mut model = LogisticRegressionGD::new(0.05, 50, 1);
    model.fit(data.x_train.view(), data.y_train.view()).unwrap();

    let net_input = model.net_input(data.x_test.view()).unwrap();
    let predictions = model.predict(data.x_test.view()).unwrap();
    let activations = LogisticRegressionGD::activate(net_input.view());

    let rows = net_input
        .iter()
        .zip(activations.iter())
        .zip(predictions.iter());

    for ((z, activation), prediction) in rows {
        assert_eq!(*prediction, usize::from(*z >= 0.0));
        assert_eq!(*prediction, usize::from(*activation >= 0.5));
    }
}

#[test]
fn three_class_labels_are_rejected() {
    let iris = load_iris().unwrap().select_features(&PETAL_FEATURES).unwrap();

    let mut model = LogisticRegressionGD::new(0.05, 10, 1);
    let result = model.fit(iris.features.view(), iris.targets.view());

    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert!(matches!(model.predict(iris.features.view()), Err(Error::IllegalState(_))));
}
