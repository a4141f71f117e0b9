//! CLI command implementations

pub mod args;
pub mod frame;
pub mod grid;
pub mod model;
pub mod pack;
pub mod validate;
