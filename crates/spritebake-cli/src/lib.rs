//! spritebake CLI library.
//!
//! Command implementations for the `spritebake` binary: camera framing
//! previews, grid layout queries, packing of rendered frame sequences and
//! configuration validation.

pub mod commands;
