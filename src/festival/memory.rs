use std::collections::BTreeMap;

use axum::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{
    ensure_can_manage, ensure_can_publish, FestivalRequest, FestivalResponse, FestivalService,
    ServiceError,
};
use crate::auth::Principal;

#[derive(Debug)]
struct StoredFestival {
    owner_id: Uuid,
    festival: FestivalResponse,
}

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    rows: BTreeMap<i64, StoredFestival>,
}

/// Process-local festival store. Ids are never reused after a delete.
#[derive(Debug, Default)]
pub struct MemoryFestivalService {
    store: RwLock<Store>,
}

impl MemoryFestivalService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FestivalService for MemoryFestivalService {
    async fn create(
        &self,
        request: FestivalRequest,
        principal: &Principal,
    ) -> Result<FestivalResponse, ServiceError> {
        ensure_can_publish(principal)?;
        let request = request.validated()?;

        let mut store = self.store.write().await;
        store.last_id += 1;
        let festival = FestivalResponse::from_request(store.last_id, request);
        store.rows.insert(
            festival.id,
            StoredFestival {
                owner_id: principal.user_id,
                festival: festival.clone(),
            },
        );
        debug!(festival_id = festival.id, "festival stored in memory");

        Ok(festival)
    }

    async fn list_all(&self) -> Result<Vec<FestivalResponse>, ServiceError> {
        let store = self.store.read().await;
        Ok(store
            .rows
            .values()
            .map(|row| row.festival.clone())
            .collect())
    }

    async fn get_one(
        &self,
        id: i64,
        _principal: &Principal,
    ) -> Result<FestivalResponse, ServiceError> {
        let store = self.store.read().await;
        store
            .rows
            .get(&id)
            .map(|row| row.festival.clone())
            .ok_or(ServiceError::NotFound(id))
    }

    async fn update(
        &self,
        id: i64,
        request: FestivalRequest,
        principal: &Principal,
    ) -> Result<FestivalResponse, ServiceError> {
        let mut store = self.store.write().await;
        let row = store.rows.get_mut(&id).ok_or(ServiceError::NotFound(id))?;
        ensure_can_manage(principal, row.owner_id)?;
        let request = request.validated()?;

        row.festival = FestivalResponse::from_request(id, request);
        Ok(row.festival.clone())
    }

    async fn delete(&self, id: i64, principal: &Principal) -> Result<(), ServiceError> {
        let mut store = self.store.write().await;
        let row = store.rows.get(&id).ok_or(ServiceError::NotFound(id))?;
        ensure_can_manage(principal, row.owner_id)?;
        store.rows.remove(&id);
        Ok(())
    }
}
