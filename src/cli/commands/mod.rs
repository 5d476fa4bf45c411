//! CLI command implementations

pub mod process;
pub mod serve;
pub mod validate;
