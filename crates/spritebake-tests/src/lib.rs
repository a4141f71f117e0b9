//! spritebake End-to-End Test Infrastructure
//!
//! Integration tests drive both export entry points against [`FakeScene`], an
//! in-memory host that records every call and paints each captured frame a
//! solid color derived from its frame number.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p spritebake-tests
//! ```
//!
//! [`FakeScene`]: fixtures::FakeScene

pub mod determinism;
pub mod fixtures;
