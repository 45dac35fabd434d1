use std::error::Error;
use std::fmt;

/// Errors raised while scoring or searching feature subsets.
///
/// These are all precondition violations on the dataset or the classifier
/// settings. The search layer never recovers from them, it hands them back
/// to the caller unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// A feature index is out of range for an instance's feature vector.
    InvalidIndex { index: usize, num_features: usize },
    /// The split left no instances to classify.
    EmptyTestSet,
    /// Fewer training instances than neighbors requested.
    InsufficientNeighbors { k: usize, available: usize },
    /// Instance `index` does not share the dataset's feature-vector length.
    InconsistentFeatureLength {
        index: usize,
        expected: usize,
        found: usize,
    },
    InvalidConfig(String),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SelectionError::InvalidIndex { index, num_features } => write!(
                f,
                "Feature index {} is out of range for an instance with {} features",
                index, num_features
            ),
            SelectionError::EmptyTestSet => {
                write!(f, "Testing set is empty; dataset is too small for the train/test split")
            }
            SelectionError::InsufficientNeighbors { k, available } => write!(
                f,
                "Need at least {} training instances for k={} but only {} are available",
                k, k, available
            ),
            SelectionError::InconsistentFeatureLength {
                index,
                expected,
                found,
            } => write!(
                f,
                "Instance {} has {} features, expected {}",
                index, found, expected
            ),
            SelectionError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl Error for SelectionError {}

pub type Result<T> = std::result::Result<T, SelectionError>;
