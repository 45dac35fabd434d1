//! Integration tests for the KNN evaluator.

use featsel::data_handling::DataSplit;
use featsel::{FeatureSet, Instance, KnnClassifier, KnnConfig, SelectionError};

fn set(indices: &[usize]) -> FeatureSet {
    indices.iter().copied().collect()
}

fn training() -> Vec<Instance> {
    vec![
        Instance::new(vec![0.0, 0.0], "a"),
        Instance::new(vec![0.0, 1.0], "a"),
        Instance::new(vec![5.0, 5.0], "b"),
        Instance::new(vec![5.0, 6.0], "b"),
        Instance::new(vec![6.0, 5.0], "b"),
    ]
}

fn testing() -> Vec<Instance> {
    vec![
        Instance::new(vec![0.5, 0.5], "a"),
        Instance::new(vec![5.5, 5.5], "b"),
        // Sits next to the b cluster, so it is always misclassified.
        Instance::new(vec![4.0, 4.0], "a"),
    ]
}

// ---------------------------------------------------------------------------
// Accuracy
// ---------------------------------------------------------------------------

#[test]
fn explicit_split_accuracy() {
    let train = training();
    let test = testing();
    let split = DataSplit::new(train.iter().collect(), test.iter().collect());
    let knn = KnnClassifier::with_split(split, &KnnConfig::default()).unwrap();

    let accuracy = knn.classify(&set(&[0, 1])).unwrap();
    assert!((accuracy - 2.0 / 3.0).abs() < 1e-12);

    let accuracy = knn.classify(&set(&[0])).unwrap();
    assert!((accuracy - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn classify_all_matches_every_index() {
    let train = training();
    let test = testing();
    let split = DataSplit::new(train.iter().collect(), test.iter().collect());
    let knn = KnnClassifier::with_split(split, &KnnConfig::default()).unwrap();
    assert_eq!(knn.classify_all().unwrap(), knn.classify(&set(&[0, 1])).unwrap());
}

#[test]
fn predict_single_instance() {
    let train = training();
    let test = testing();
    let split = DataSplit::new(train.iter().collect(), test.iter().collect());
    let knn = KnnClassifier::with_split(split, &KnnConfig::default()).unwrap();
    assert_eq!(knn.predict(&test[0], &set(&[0, 1])).unwrap(), "a");
    assert_eq!(knn.predict(&test[2], &set(&[0, 1])).unwrap(), "b");
}

#[test]
fn ratio_construction_uses_first_seventy_percent() {
    let mut all = training();
    all.extend(testing());
    // 8 instances -> floor(5.6) = 5 training
    let knn = KnnClassifier::new(&all, &KnnConfig::default()).unwrap();
    assert_eq!(knn.split().training.len(), 5);
    assert_eq!(knn.split().testing.len(), 3);
    assert!((knn.classify(&set(&[0, 1])).unwrap() - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn empty_and_full_subsets_never_error_with_enough_data() {
    let mut all = training();
    all.extend(testing());
    let knn = KnnClassifier::new(&all, &KnnConfig::default()).unwrap();
    let empty = knn.classify(&FeatureSet::new()).unwrap();
    let full = knn.classify_all().unwrap();
    assert!((0.0..=1.0).contains(&empty));
    assert!((0.0..=1.0).contains(&full));
}

// ---------------------------------------------------------------------------
// Error conditions
// ---------------------------------------------------------------------------

#[test]
fn empty_test_set_is_an_error() {
    let train = training();
    let split = DataSplit::new(train.iter().collect(), Vec::new());
    let knn = KnnClassifier::with_split(split, &KnnConfig::default()).unwrap();
    assert_eq!(knn.classify(&set(&[0])), Err(SelectionError::EmptyTestSet));
}

#[test]
fn fewer_training_instances_than_k_is_rejected() {
    let train = training();
    let test = testing();
    let split = DataSplit::new(train.iter().take(2).collect(), test.iter().collect());
    let knn = KnnClassifier::with_split(split, &KnnConfig::default()).unwrap();
    assert_eq!(
        knn.classify(&set(&[0])),
        Err(SelectionError::InsufficientNeighbors { k: 3, available: 2 })
    );
}

#[test]
fn out_of_range_index_is_rejected() {
    let train = training();
    let test = testing();
    let split = DataSplit::new(train.iter().collect(), test.iter().collect());
    let knn = KnnClassifier::with_split(split, &KnnConfig::default()).unwrap();
    assert_eq!(
        knn.classify(&set(&[0, 2])),
        Err(SelectionError::InvalidIndex {
            index: 2,
            num_features: 2
        })
    );
}

#[test]
fn invalid_ratio_is_rejected() {
    let all = training();
    let err = KnnClassifier::new(&all, &KnnConfig::new(3, 1.5)).unwrap_err();
    assert!(matches!(err, SelectionError::InvalidConfig(_)));
    assert!(err.to_string().contains("train_ratio"));
}
