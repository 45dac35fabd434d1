//! featsel: wrapper feature selection driven by a KNN classifier.
//!
//! A candidate feature subset is scored by the held-out accuracy of a
//! k-nearest-neighbors classifier that only looks at those features. A
//! sequential floating forward search grows the subset one feature at a time
//! and backtracks whenever dropping an earlier pick does not hurt accuracy.
//!
//! Besides the search itself the crate carries a delimited-text loader and
//! serde configuration types used by the command line front end.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod feature_selection;
pub mod io;
pub mod models;

pub use config::{KnnConfig, SelectionConfig, StoppingCriteria};
pub use data_handling::{FeatureSet, Instance, Label};
pub use error::{Result, SelectionError};
pub use feature_selection::sffs::{
    Criteria, SelectionOutcome, SequentialFloatingForwardSelection, MAX_ITERATIONS_WITHOUT_PROGRESS,
};
pub use feature_selection::wrapper::FeatureSelection;
pub use feature_selection::FeatureSelector;
pub use models::knn::KnnClassifier;
