//! Reviewable Engine
//!
//! A moderation workflow engine: reviewables are pending decisions about a
//! target, and actors move them out of `pending` by performing the actions
//! their permissions allow. Uses hexagonal (ports & adapters) architecture.

pub mod adapters;
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod entity;
pub mod error;
pub mod telemetry;

#[cfg(test)]
mod test_utils;


pub use app::{ReviewableService, ReviewableTypeRegistry, ReviewableUser};
pub use bootstrap::{connect, Engine};
pub use config::{Config, SiteSettings};
pub use error::{AppError, DomainError};
