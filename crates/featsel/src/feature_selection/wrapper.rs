//! Search scaffold shared by wrapper feature-selection strategies.
use std::cell::Cell;

use crate::config::KnnConfig;
use crate::data_handling::{all_feature_indices, validate_instances, FeatureSet, Instance};
use crate::error::Result;
use crate::models::knn::KnnClassifier;

/// Scores feature subsets against one instance set.
///
/// No classifier is kept between calls. Every objective evaluation builds a
/// fresh `KnnClassifier`, which re-derives the same deterministic split, so
/// accuracies of different subsets stay comparable.
#[derive(Debug)]
pub struct FeatureSelection<'a> {
    instances: &'a [Instance],
    config: KnnConfig,
    evaluations: Cell<usize>,
}

impl<'a> FeatureSelection<'a> {
    /// # Errors
    ///
    /// * `InvalidConfig` if `config` does not validate.
    /// * `InconsistentFeatureLength` if the instances disagree on feature count.
    pub fn new(instances: &'a [Instance], config: KnnConfig) -> Result<Self> {
        config.validate()?;
        validate_instances(instances)?;
        Ok(Self {
            instances,
            config,
            evaluations: Cell::new(0),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of objective evaluations performed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    /// `{0 .. total_features - 1}`, empty for an empty dataset.
    pub fn all_feature_indices(&self) -> FeatureSet {
        all_feature_indices(self.instances)
    }

    /// KNN accuracy on the held-out split using only `subset`.
    pub fn objective_function(&self, subset: &FeatureSet) -> Result<f64> {
        self.evaluations.set(self.evaluations.get() + 1);
        let classifier = KnnClassifier::new(self.instances, &self.config)?;
        let accuracy = classifier.classify(subset)?;
        log::trace!("objective({:?}) = {:.4}", subset, accuracy);
        Ok(accuracy)
    }

    /// The feature from `remaining` whose addition to `selected` gives the
    /// highest accuracy. Ties go to the lowest index. `None` when
    /// `remaining` is empty.
    pub fn best(&self, selected: &FeatureSet, remaining: &FeatureSet) -> Result<Option<usize>> {
        let mut best: Option<(usize, f64)> = None;
        let mut candidate = selected.clone();

        for &feature in remaining {
            candidate.insert(feature);
            let accuracy = self.objective_function(&candidate)?;
            candidate.remove(&feature);

            if best.map_or(true, |(_, highest)| accuracy > highest) {
                best = Some((feature, accuracy));
            }
        }

        Ok(best.map(|(feature, _)| feature))
    }

    /// The feature of `selected` whose removal leaves the highest accuracy,
    /// i.e. the least valuable one. Ties go to the lowest index. `None` when
    /// `selected` has one element or fewer, so the last feature is never
    /// removed.
    pub fn worst(&self, selected: &FeatureSet) -> Result<Option<usize>> {
        if selected.len() <= 1 {
            return Ok(None);
        }

        let mut worst: Option<(usize, f64)> = None;
        let mut candidate = selected.clone();

        for &feature in selected {
            candidate.remove(&feature);
            let accuracy = self.objective_function(&candidate)?;
            candidate.insert(feature);

            if worst.map_or(true, |(_, highest)| accuracy > highest) {
                worst = Some((feature, accuracy));
            }
        }

        Ok(worst.map(|(feature, _)| feature))
    }
}
