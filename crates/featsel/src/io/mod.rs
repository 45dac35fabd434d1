//! Loading instances from delimited text files.
pub mod delimited;

pub use delimited::{
    read_instances, read_instances_with_config, shuffle_instances, DelimitedReaderConfig,
    LoadedData,
};
