//! Wrapper feature selection.
//!
//! `wrapper` holds the scaffold every search strategy shares: it scores a
//! candidate subset by KNN accuracy and finds the best feature to add or the
//! least valuable one to drop. `sffs` drives that scaffold with a sequential
//! floating forward search.
pub mod sffs;
pub mod wrapper;

use crate::data_handling::FeatureSet;
use crate::error::Result;
use sffs::Criteria;

/// A search strategy that picks a subset of feature indices.
pub trait FeatureSelector {
    /// Run the search until `criteria` says stop and return the best subset seen.
    fn select_with(&self, criteria: Criteria) -> Result<FeatureSet>;

    fn name(&self) -> &str {
        "feature-selector"
    }
}
