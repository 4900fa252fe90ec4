use logistic::{
    dataset::{load_iris, PETAL_FEATURES},
    metrics::{accuracy_score, bincount, misclassified},
    preprocessing::{train_test_split, StandardScaler},
    LogisticRegressionGD, Perceptron,
};
use ndarray::Axis;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let iris = load_iris()?.select_features(&PETAL_FEATURES)?;
    println!("class labels: {:?}", iris.unique_classes());

    const TEST_SIZE: f64 = 0.3;
    const SPLIT_SEED: u64 = 1;

    let split = train_test_split(
        iris.features.view(),
        iris.targets.view(),
        TEST_SIZE,
        SPLIT_SEED,
        true,
    )?;
    println!("label counts in y: {:?}", bincount(iris.targets.view()));
    println!("label counts in y_train: {:?}", bincount(split.y_train.view()));
    println!("label counts in y_test: {:?}", bincount(split.y_test.view()));

    let mut scaler = StandardScaler::new();
    let x_train_std = scaler.fit_transform(split.x_train.view())?;
    let x_test_std = scaler.transform(split.x_test.view())?;

    const PERCEPTRON_ETA: f64 = 0.1;
    const PERCEPTRON_EPOCHS: usize = 40;
    const PERCEPTRON_SEED: u64 = 1;

    let mut perceptron = Perceptron::new(PERCEPTRON_ETA, PERCEPTRON_EPOCHS, PERCEPTRON_SEED);
    perceptron.fit(x_train_std.view(), split.y_train.view())?;

    let y_pred = perceptron.predict(x_test_std.view())?;
    println!(
        "misclassified examples: {}",
        misclassified(split.y_test.view(), y_pred.view())?
    );
    println!(
        "perceptron accuracy: {:.3}",
        accuracy_score(split.y_test.view(), y_pred.view())?
    );

    // setosa and versicolor only
    let subset_rows: Vec<usize> = split
        .y_train
        .iter()
        .enumerate()
        .filter(|&(_, &class)| class <= 1)
        .map(|(row, _)| row)
        .collect();
    let x_subset = x_train_std.select(Axis(0), &subset_rows);
    let y_subset = split.y_train.select(Axis(0), &subset_rows);

    const LOGISTIC_ETA: f64 = 0.05;
    const LOGISTIC_EPOCHS: usize = 1000;
    const LOGISTIC_SEED: u64 = 1;

    let mut model = LogisticRegressionGD::new(LOGISTIC_ETA, LOGISTIC_EPOCHS, LOGISTIC_SEED);
    model.fit(x_subset.view(), y_subset.view())?;

    let costs = model.cost_history()?;
    println!(
        "logistic regression cost: first {:.4}, last {:.6}",
        costs[0],
        costs[costs.len() - 1]
    );
    println!("logistic regression weights: {}", model.weights()?);

    let subset_pred = model.predict(x_subset.view())?;
    println!(
        "logistic regression training accuracy: {:.3}",
        accuracy_score(y_subset.view(), subset_pred.view())?
    );

    Ok(())
}
