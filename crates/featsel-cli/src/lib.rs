//! Command implementations behind the `featsel` binary.
pub mod select;
