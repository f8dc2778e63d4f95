//! Festival domain: DTOs, validation, and the service seam used by handlers.
//!
//! The HTTP layer only knows [`FestivalService`]. Two implementations live
//! here: [`PgFestivalService`] for production and [`MemoryFestivalService`]
//! for tests and database-less runs. Both enforce the same rules:
//!
//! - requests are validated and trimmed before they are stored;
//! - only organizers and admins may create festivals;
//! - only the owner or an admin may update or delete one, and a missing
//!   festival is reported before a permission problem.

use std::sync::Arc;

use axum::async_trait;
use thiserror::Error;

use crate::auth::Principal;

mod memory;
mod storage;
mod types;

pub use memory::MemoryFestivalService;
pub use storage::PgFestivalService;
pub use types::{FestivalRequest, FestivalResponse, TITLE_MAX_CHARS};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("festival {0} not found")]
    NotFound(i64),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait FestivalService: Send + Sync {
    async fn create(
        &self,
        request: FestivalRequest,
        principal: &Principal,
    ) -> Result<FestivalResponse, ServiceError>;

    /// All festivals, ascending by id.
    async fn list_all(&self) -> Result<Vec<FestivalResponse>, ServiceError>;

    async fn get_one(&self, id: i64, principal: &Principal)
        -> Result<FestivalResponse, ServiceError>;

    /// Replaces every mutable field; never creates a festival.
    async fn update(
        &self,
        id: i64,
        request: FestivalRequest,
        principal: &Principal,
    ) -> Result<FestivalResponse, ServiceError>;

    async fn delete(&self, id: i64, principal: &Principal) -> Result<(), ServiceError>;
}

pub type SharedFestivalService = Arc<dyn FestivalService>;

fn ensure_can_publish(principal: &Principal) -> Result<(), ServiceError> {
    if principal.can_publish() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "Only organizers can register festivals.",
        ))
    }
}

fn ensure_can_manage(principal: &Principal, owner_id: uuid::Uuid) -> Result<(), ServiceError> {
    if principal.can_manage(owner_id) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "Only the festival owner can change this festival.",
        ))
    }
}
