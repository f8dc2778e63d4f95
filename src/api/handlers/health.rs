use axum::{
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use sqlx::{Connection, PgPool};
use tracing::{debug, error, info_span, Instrument};
use utoipa::ToSchema;

use crate::GIT_COMMIT_HASH;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    database: String,
}

#[derive(Debug, PartialEq, Eq)]
enum DatabaseStatus {
    Ok,
    Error,
    Detached,
}

impl DatabaseStatus {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Detached => "n/a",
        }
    }
}

async fn ping(pool: &PgPool) -> DatabaseStatus {
    let acquire_span = info_span!(
        "db.acquire",
        db.system = "postgresql",
        db.operation = "ACQUIRE"
    );
    match pool.acquire().instrument(acquire_span).await {
        Ok(mut conn) => {
            let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
            match conn.ping().instrument(ping_span).await {
                Ok(()) => DatabaseStatus::Ok,
                Err(err) => {
                    error!("Failed to ping database: {}", err);
                    DatabaseStatus::Error
                }
            }
        }
        Err(err) => {
            error!("Failed to acquire database connection: {}", err);
            DatabaseStatus::Error
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = Health),
        (status = 503, description = "Database is unreachable", body = Health)
    ),
    tag = "health"
)]
// axum handler for health
pub async fn health(pool: Option<Extension<PgPool>>) -> impl IntoResponse {
    let database = match pool {
        Some(Extension(pool)) => ping(&pool).await,
        None => DatabaseStatus::Detached,
    };

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.as_str().to_string(),
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let mut headers = HeaderMap::new();
    match format!("{}:{}:{}", health.name, health.version, short_hash).parse::<HeaderValue>() {
        Ok(value) => {
            debug!("X-App header: {:?}", value);
            headers.insert("X-App", value);
        }
        Err(err) => error!("Failed to parse X-App header: {}", err),
    }

    let status = if database == DatabaseStatus::Error {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status, headers, Json(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn health_without_database_is_ok() {
        let response = health(None).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get("X-App")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(env!("CARGO_PKG_NAME"))));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["database"], "n/a");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn health_with_unreachable_database_is_unavailable() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://lafesta@127.0.0.1:1/lafesta")
            .unwrap();
        let response = health(Some(Extension(pool))).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
