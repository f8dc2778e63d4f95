//! Postgres-backed festival storage.
//!
//! Ownership checks for update/delete run inside a transaction that locks the
//! row (`FOR UPDATE`), so the owner seen by the check is the owner at write time.

use axum::async_trait;
use sqlx::{postgres::PgRow, PgPool, Postgres, Row, Transaction};
use tracing::{debug, Instrument};
use uuid::Uuid;

use super::{
    ensure_can_manage, ensure_can_publish, FestivalRequest, FestivalResponse, FestivalService,
    ServiceError,
};
use crate::auth::Principal;

const FESTIVAL_COLUMNS: &str =
    "id, title, content, location, month, open_date, end_date, official_link";

#[derive(Clone, Debug)]
pub struct PgFestivalService {
    pool: PgPool,
}

impl PgFestivalService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_span(operation: &'static str, statement: &str) -> tracing::Span {
    tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = operation,
        db.statement = statement
    )
}

fn festival_from_row(row: &PgRow) -> Result<FestivalResponse, sqlx::Error> {
    Ok(FestivalResponse {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        location: row.try_get("location")?,
        month: row.try_get("month")?,
        open_date: row.try_get("open_date")?,
        end_date: row.try_get("end_date")?,
        official_link: row.try_get("official_link")?,
    })
}

/// Locks the festival row and returns its owner, or `NotFound`.
async fn lock_owner(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
) -> Result<Uuid, ServiceError> {
    let query = "SELECT owner_id FROM festivals WHERE id = $1 FOR UPDATE";
    let row = sqlx::query(query)
        .bind(id)
        .fetch_optional(&mut **tx)
        .instrument(db_span("SELECT", query))
        .await?;

    match row {
        Some(row) => Ok(row.try_get("owner_id")?),
        None => Err(ServiceError::NotFound(id)),
    }
}

#[async_trait]
impl FestivalService for PgFestivalService {
    async fn create(
        &self,
        request: FestivalRequest,
        principal: &Principal,
    ) -> Result<FestivalResponse, ServiceError> {
        ensure_can_publish(principal)?;
        let request = request.validated()?;

        let query = format!(
            r"
            INSERT INTO festivals
                (owner_id, title, content, location, month, open_date, end_date, official_link)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {FESTIVAL_COLUMNS}
            "
        );
        let row = sqlx::query(&query)
            .bind(principal.user_id)
            .bind(&request.title)
            .bind(&request.content)
            .bind(&request.location)
            .bind(request.month)
            .bind(request.open_date)
            .bind(request.end_date)
            .bind(&request.official_link)
            .fetch_one(&self.pool)
            .instrument(db_span("INSERT", &query))
            .await?;

        let festival = festival_from_row(&row)?;
        debug!(festival_id = festival.id, "festival inserted");
        Ok(festival)
    }

    async fn list_all(&self) -> Result<Vec<FestivalResponse>, ServiceError> {
        let query = format!("SELECT {FESTIVAL_COLUMNS} FROM festivals ORDER BY id ASC");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .instrument(db_span("SELECT", &query))
            .await?;

        rows.iter()
            .map(|row| festival_from_row(row).map_err(ServiceError::from))
            .collect()
    }

    async fn get_one(
        &self,
        id: i64,
        _principal: &Principal,
    ) -> Result<FestivalResponse, ServiceError> {
        let query = format!("SELECT {FESTIVAL_COLUMNS} FROM festivals WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(db_span("SELECT", &query))
            .await?;

        match row {
            Some(row) => Ok(festival_from_row(&row)?),
            None => Err(ServiceError::NotFound(id)),
        }
    }

    async fn update(
        &self,
        id: i64,
        request: FestivalRequest,
        principal: &Principal,
    ) -> Result<FestivalResponse, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let owner_id = lock_owner(&mut tx, id).await?;
        ensure_can_manage(principal, owner_id)?;
        let request = request.validated()?;

        let query = format!(
            r"
            UPDATE festivals
            SET title = $2,
                content = $3,
                location = $4,
                month = $5,
                open_date = $6,
                end_date = $7,
                official_link = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {FESTIVAL_COLUMNS}
            "
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(&request.title)
            .bind(&request.content)
            .bind(&request.location)
            .bind(request.month)
            .bind(request.open_date)
            .bind(request.end_date)
            .bind(&request.official_link)
            .fetch_one(&mut *tx)
            .instrument(db_span("UPDATE", &query))
            .await?;
        let festival = festival_from_row(&row)?;
        tx.commit().await?;

        Ok(festival)
    }

    async fn delete(&self, id: i64, principal: &Principal) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;
        let owner_id = lock_owner(&mut tx, id).await?;
        ensure_can_manage(principal, owner_id)?;

        let query = "DELETE FROM festivals WHERE id = $1";
        sqlx::query(query)
            .bind(id)
            .execute(&mut *tx)
            .instrument(db_span("DELETE", query))
            .await?;
        tx.commit().await?;

        debug!(festival_id = id, "festival deleted");
        Ok(())
    }
}
