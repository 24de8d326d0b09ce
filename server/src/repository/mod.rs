//! Reads and writes against the `events`, `student_registrations` and
//! `users` tables.

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Event, EventPatch, NewEvent, Registrant};

#[cfg(any(test, feature = "test-util"))]
pub use memory::InMemoryEventRepository;
pub use postgres::PgEventRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Every method is a single statement against the store. Update and delete
/// report the number of affected rows and treat zero as a normal outcome.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: NewEvent) -> Result<i64, RepositoryError>;

    async fn update(&self, id: i64, patch: &EventPatch) -> Result<u64, RepositoryError>;

    async fn list_by_creator(&self, creator_id: i64) -> Result<Vec<Event>, RepositoryError>;

    async fn list_registrants(&self, event_id: i64) -> Result<Vec<Registrant>, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<u64, RepositoryError>;
}
