//! CLI command implementations.

pub mod policy;
