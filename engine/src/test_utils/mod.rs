//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Mocks are hand-written in-memory stores rather than generated ones, so a
//! test controls exactly what each port returns and can inspect what was
//! written.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
