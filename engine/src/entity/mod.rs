//! SeaORM table models
//!
//! Row shapes for the PostgreSQL adapters. Domain types live in
//! `domain::entities`; conversions are in the adapters.

pub mod group_users;
pub mod reviewables;
pub mod users;
