//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod reviewable_repo;
pub mod user_repo;


pub use reviewable_repo::PostgresReviewableRepository;
pub use user_repo::PostgresUserRepository;
