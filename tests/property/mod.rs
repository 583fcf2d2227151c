//! Property-based tests

pub mod preview_proptest;
pub mod registry_proptest;
