//! Instances and the train/test split used by the KNN evaluator.
//!
//! An `Instance` is an immutable labeled feature vector. A `DataSplit`
//! partitions borrowed instances into training and testing halves without
//! copying any feature data, so it can be rebuilt for every evaluation.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectionError};

/// Class identifier. Only equality is ever used.
pub type Label = String;

/// Set of feature indices, iterated in ascending order.
pub type FeatureSet = BTreeSet<usize>;

/// One labeled feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    features: Vec<f64>,
    label: Label,
}

impl Instance {
    pub fn new(features: Vec<f64>, label: impl Into<Label>) -> Self {
        Instance {
            features,
            label: label.into(),
        }
    }

    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    /// Euclidean distance to `other`, restricted to the features in `indices`.
    ///
    /// An empty index set gives a distance of `0.0`.
    ///
    /// # Errors
    ///
    /// `InvalidIndex` if any index is outside either instance's feature vector.
    pub fn distance_to(&self, other: &Instance, indices: &FeatureSet) -> Result<f64> {
        let num_features = self.num_features().min(other.num_features());
        let mut sum_of_squares = 0.0;
        for &i in indices {
            if i >= num_features {
                return Err(SelectionError::InvalidIndex {
                    index: i,
                    num_features,
                });
            }
            let diff = self.features[i] - other.features[i];
            sum_of_squares += diff * diff;
        }
        Ok(sum_of_squares.sqrt())
    }
}

/// Disjoint training and testing views over one instance set.
#[derive(Debug, Clone)]
pub struct DataSplit<'a> {
    pub training: Vec<&'a Instance>,
    pub testing: Vec<&'a Instance>,
}

impl<'a> DataSplit<'a> {
    pub fn new(training: Vec<&'a Instance>, testing: Vec<&'a Instance>) -> Self {
        DataSplit { training, testing }
    }

    /// Split by iteration order: the first `floor(n * train_ratio)` instances
    /// train, the rest test.
    pub fn from_ratio(instances: &'a [Instance], train_ratio: f64) -> Self {
        let training_size = ((instances.len() as f64 * train_ratio) as usize).min(instances.len());
        let (training, testing) = instances.split_at(training_size);
        DataSplit {
            training: training.iter().collect(),
            testing: testing.iter().collect(),
        }
    }
}

/// Every feature index of the dataset, taken from its first instance.
pub fn all_feature_indices(instances: &[Instance]) -> FeatureSet {
    instances
        .first()
        .map(|instance| (0..instance.num_features()).collect())
        .unwrap_or_default()
}

/// Check that all instances share the feature-vector length of the first one.
pub fn validate_instances(instances: &[Instance]) -> Result<()> {
    let Some(first) = instances.first() else {
        return Ok(());
    };
    let expected = first.num_features();
    for (index, instance) in instances.iter().enumerate() {
        if instance.num_features() != expected {
            return Err(SelectionError::InconsistentFeatureLength {
                index,
                expected,
                found: instance.num_features(),
            });
        }
    }
    Ok(())
}
