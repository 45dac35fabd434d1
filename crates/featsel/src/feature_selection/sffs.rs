//! Sequential floating forward selection.
//!
//! Each outer iteration adds the feature that helps accuracy most, then keeps
//! dropping the least valuable selected feature for as long as doing so does
//! not lower accuracy. The best subset seen at any iteration boundary is what
//! gets returned, since the floating phase can leave the search in a worse
//! state than one it passed through.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::KnnConfig;
use crate::data_handling::{FeatureSet, Instance};
use crate::error::Result;
use crate::feature_selection::wrapper::FeatureSelection;
use crate::feature_selection::FeatureSelector;

/// Consecutive non-improving iterations tolerated by [`SequentialFloatingForwardSelection::select`].
pub const MAX_ITERATIONS_WITHOUT_PROGRESS: usize = 3;

/// State handed to the stopping criteria before every outer iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchProgress {
    /// Accuracy of the current subset (of the empty subset before the first iteration).
    pub accuracy: f64,
    /// Consecutive iterations whose accuracy did not beat the previous one.
    pub no_improvement: usize,
    pub selected_len: usize,
    /// Outer iterations completed so far.
    pub iterations: usize,
}

/// When to stop the outer loop. The search continues while `evaluate` is true.
pub enum Criteria {
    /// Continue while fewer than `n` features are selected, for at most `n`
    /// outer iterations.
    MaxFeatures(usize),
    /// Continue while fewer than `n` consecutive iterations failed to improve.
    NoProgressLimit(usize),
    /// Caller predicate over `(accuracy, selected_len)`.
    Custom(Box<dyn Fn(f64, usize) -> bool>),
}

impl Criteria {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(f64, usize) -> bool + 'static,
    {
        Criteria::Custom(Box::new(predicate))
    }

    pub fn evaluate(&self, progress: &SearchProgress) -> bool {
        match self {
            // The floating phase can hold the subset size still, so the
            // iteration count is bounded as well.
            Criteria::MaxFeatures(max) => {
                progress.selected_len < *max && progress.iterations < *max
            }
            Criteria::NoProgressLimit(max) => progress.no_improvement < *max,
            Criteria::Custom(predicate) => predicate(progress.accuracy, progress.selected_len),
        }
    }
}

impl fmt::Debug for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Criteria::MaxFeatures(n) => f.debug_tuple("MaxFeatures").field(n).finish(),
            Criteria::NoProgressLimit(n) => f.debug_tuple("NoProgressLimit").field(n).finish(),
            Criteria::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One accepted state at the end of an outer iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub added: usize,
    /// Features dropped again by the floating phase, in removal order.
    pub removed: Vec<usize>,
    pub selected: FeatureSet,
    pub accuracy: f64,
}

/// Result of a full search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    /// Best subset seen at any iteration boundary.
    pub features: FeatureSet,
    /// Accuracy of `features`.
    pub accuracy: f64,
    pub iterations: usize,
    /// Objective evaluations spent by this run.
    pub evaluations: usize,
    pub history: Vec<IterationRecord>,
}

impl SelectionOutcome {
    fn empty() -> Self {
        Self {
            features: FeatureSet::new(),
            accuracy: 0.0,
            iterations: 0,
            evaluations: 0,
            history: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct SequentialFloatingForwardSelection<'a> {
    scaffold: FeatureSelection<'a>,
}

impl<'a> SequentialFloatingForwardSelection<'a> {
    pub fn new(instances: &'a [Instance], config: KnnConfig) -> Result<Self> {
        Ok(Self {
            scaffold: FeatureSelection::new(instances, config)?,
        })
    }

    pub fn from_scaffold(scaffold: FeatureSelection<'a>) -> Self {
        Self { scaffold }
    }

    pub fn scaffold(&self) -> &FeatureSelection<'a> {
        &self.scaffold
    }

    /// Stop once `max_num_features` features are selected.
    pub fn select_max_features(&self, max_num_features: usize) -> Result<FeatureSet> {
        self.select_with(Criteria::MaxFeatures(max_num_features))
    }

    /// Stop after [`MAX_ITERATIONS_WITHOUT_PROGRESS`] iterations in a row
    /// without improvement.
    pub fn select(&self) -> Result<FeatureSet> {
        self.select_with(Criteria::NoProgressLimit(MAX_ITERATIONS_WITHOUT_PROGRESS))
    }

    pub fn select_with(&self, criteria: Criteria) -> Result<FeatureSet> {
        self.run(criteria).map(|outcome| outcome.features)
    }

    /// Run the floating search and report the best subset together with the
    /// trail of accepted states.
    ///
    /// An empty instance set yields an empty subset without evaluating anything.
    /// Classifier errors are returned as they are.
    pub fn run(&self, criteria: Criteria) -> Result<SelectionOutcome> {
        if self.scaffold.is_empty() {
            log::debug!("No instances to select from, returning the empty subset");
            return Ok(SelectionOutcome::empty());
        }

        let evaluations_at_start = self.scaffold.evaluations();
        let all_features = self.scaffold.all_feature_indices();
        let mut remaining = all_features.clone();
        let mut selected = FeatureSet::new();

        let mut highest_accuracy = self.scaffold.objective_function(&selected)?;
        let mut best_so_far = FeatureSet::new();
        let mut last_accuracy = highest_accuracy;
        let mut progress = SearchProgress {
            accuracy: highest_accuracy,
            no_improvement: 0,
            selected_len: 0,
            iterations: 0,
        };
        let mut history = Vec::new();

        log::debug!(
            "Starting floating search over {} features with {:?}, baseline accuracy {:.4}",
            all_features.len(),
            criteria,
            highest_accuracy
        );

        while criteria.evaluate(&progress) {
            let Some(feature) = self.scaffold.best(&selected, &remaining)? else {
                log::debug!("No remaining features to add");
                break;
            };

            log::debug!("Adding feature {} to {:?}", feature, selected);
            transfer(&mut remaining, &mut selected, feature);

            let mut accuracy_before_removal = self.scaffold.objective_function(&selected)?;
            let mut removed = Vec::new();

            while let Some(worst) = self.scaffold.worst(&selected)? {
                transfer(&mut selected, &mut remaining, worst);
                let new_accuracy = self.scaffold.objective_function(&selected)?;

                if new_accuracy < accuracy_before_removal {
                    transfer(&mut remaining, &mut selected, worst);
                    log::debug!(
                        "Removing feature {} drops accuracy to {:.4}, keeping it",
                        worst,
                        new_accuracy
                    );
                    break;
                }

                log::debug!("Removed feature {} (accuracy {:.4})", worst, new_accuracy);
                removed.push(worst);
                accuracy_before_removal = new_accuracy;
            }

            debug_assert!(selected.is_disjoint(&remaining));
            debug_assert_eq!(selected.len() + remaining.len(), all_features.len());

            let accuracy = self.scaffold.objective_function(&selected)?;

            if accuracy > highest_accuracy {
                highest_accuracy = accuracy;
                best_so_far = selected.clone();
            }

            if accuracy <= last_accuracy {
                progress.no_improvement += 1;
            } else {
                progress.no_improvement = 0;
            }
            last_accuracy = accuracy;

            progress.iterations += 1;
            progress.accuracy = accuracy;
            progress.selected_len = selected.len();

            history.push(IterationRecord {
                iteration: progress.iterations,
                added: feature,
                removed,
                selected: selected.clone(),
                accuracy,
            });
        }

        let outcome = SelectionOutcome {
            features: best_so_far,
            accuracy: highest_accuracy,
            iterations: progress.iterations,
            evaluations: self.scaffold.evaluations() - evaluations_at_start,
            history,
        };

        log::info!(
            "Selected {} of {} features {:?} with accuracy {:.4} after {} iterations ({} evaluations)",
            outcome.features.len(),
            all_features.len(),
            outcome.features,
            outcome.accuracy,
            outcome.iterations,
            outcome.evaluations
        );

        Ok(outcome)
    }
}

impl FeatureSelector for SequentialFloatingForwardSelection<'_> {
    fn select_with(&self, criteria: Criteria) -> Result<FeatureSet> {
        SequentialFloatingForwardSelection::select_with(self, criteria)
    }

    fn name(&self) -> &str {
        "sffs"
    }
}

fn transfer(from: &mut FeatureSet, to: &mut FeatureSet, feature: usize) {
    let moved = from.remove(&feature);
    debug_assert!(moved, "feature {} was not in the source set", feature);
    to.insert(feature);
}
