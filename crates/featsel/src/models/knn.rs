//! K-nearest-neighbors evaluator used as the wrapper objective.
//!
//! The classifier is built over a fixed train/test split and scores a
//! feature subset by the fraction of testing instances whose majority vote
//! among the `k` closest training instances matches their label.
use crate::config::{validate_k, KnnConfig};
use crate::data_handling::{DataSplit, FeatureSet, Instance, Label};
use crate::error::{Result, SelectionError};

/// A training label paired with its distance to the instance being classified.
#[derive(Debug, Clone, Copy)]
struct Neighbor<'a> {
    label: &'a str,
    distance: f64,
}

#[derive(Debug, Clone)]
pub struct KnnClassifier<'a> {
    split: DataSplit<'a>,
    k: usize,
}

impl<'a> KnnClassifier<'a> {
    /// Split `instances` by `config.train_ratio` in iteration order.
    pub fn new(instances: &'a [Instance], config: &KnnConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            split: DataSplit::from_ratio(instances, config.train_ratio),
            k: config.k,
        })
    }

    /// Use an explicit split. Only `config.k` is read.
    pub fn with_split(split: DataSplit<'a>, config: &KnnConfig) -> Result<Self> {
        validate_k(config.k)?;
        Ok(Self { split, k: config.k })
    }

    pub fn split(&self) -> &DataSplit<'a> {
        &self.split
    }

    /// Accuracy over the testing set using every feature index.
    pub fn classify_all(&self) -> Result<f64> {
        if self.split.testing.is_empty() {
            return Err(SelectionError::EmptyTestSet);
        }
        let Some(sample) = self.split.training.first() else {
            return Err(SelectionError::InsufficientNeighbors {
                k: self.k,
                available: 0,
            });
        };
        let indices: FeatureSet = (0..sample.num_features()).collect();
        self.classify(&indices)
    }

    /// Fraction of testing instances classified correctly when distances are
    /// restricted to `indices`.
    ///
    /// # Errors
    ///
    /// * `EmptyTestSet` if there is nothing to classify.
    /// * `InsufficientNeighbors` if there are fewer than `k` training instances.
    /// * `InvalidIndex` if `indices` reaches past the feature vectors.
    pub fn classify(&self, indices: &FeatureSet) -> Result<f64> {
        if self.split.testing.is_empty() {
            return Err(SelectionError::EmptyTestSet);
        }

        let mut correct = 0usize;
        for instance in &self.split.testing {
            let predicted = self.vote(instance, indices)?;
            if predicted == instance.label() {
                correct += 1;
            }
        }

        Ok(correct as f64 / self.split.testing.len() as f64)
    }

    /// Majority label among the `k` nearest training instances.
    pub fn predict(&self, instance: &Instance, indices: &FeatureSet) -> Result<Label> {
        self.vote(instance, indices).map(str::to_string)
    }

    fn vote(&self, instance: &Instance, indices: &FeatureSet) -> Result<&'a str> {
        let neighbors = self.nearest(instance, indices)?;
        Ok(most_common_label(&neighbors))
    }

    /// The `k` closest training instances, nearest first. Equal distances keep
    /// training order.
    fn nearest(&self, instance: &Instance, indices: &FeatureSet) -> Result<Vec<Neighbor<'a>>> {
        if self.split.training.len() < self.k {
            return Err(SelectionError::InsufficientNeighbors {
                k: self.k,
                available: self.split.training.len(),
            });
        }

        let mut neighbors = self
            .split
            .training
            .iter()
            .map(|&other| -> Result<Neighbor<'a>> {
                Ok(Neighbor {
                    label: other.label(),
                    distance: instance.distance_to(other, indices)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // sort_by is stable, which is what keeps tie-breaks reproducible
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(self.k);
        Ok(neighbors)
    }
}

/// Mode of the neighbor labels. On a tie the label that reached the maximum
/// count first, walking nearest-first, wins.
fn most_common_label<'a>(neighbors: &[Neighbor<'a>]) -> &'a str {
    let mut occurrences: Vec<(&'a str, usize)> = Vec::with_capacity(neighbors.len());
    let mut most_frequent = "";
    let mut max_frequency = 0;

    for neighbor in neighbors {
        let frequency = match occurrences.iter_mut().find(|(label, _)| *label == neighbor.label) {
            Some((_, count)) => {
                *count += 1;
                *count
            }
            None => {
                occurrences.push((neighbor.label, 1));
                1
            }
        };

        if frequency > max_frequency {
            most_frequent = neighbor.label;
            max_frequency = frequency;
        }
    }

    most_frequent
}
