//! Session-backed principal resolution.
//!
//! Only the SHA-256 hash of a session token is stored; raw tokens never touch
//! the database. Sessions are issued elsewhere, this module only reads them.

use anyhow::{anyhow, Context, Result};
use axum::{async_trait, http::HeaderMap};
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::principal::{extract_token, Principal, PrincipalResolver, Role};

#[derive(Clone, Debug)]
pub struct SessionResolver {
    pool: PgPool,
}

impl SessionResolver {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn lookup(&self, token_hash: &[u8]) -> Result<Option<Principal>> {
        // Only accept active users and unexpired sessions.
        let query = r"
            SELECT users.id, users.nickname, users.role
            FROM user_sessions
            JOIN users ON users.id = user_sessions.user_id
            WHERE user_sessions.session_hash = $1
              AND user_sessions.expires_at > NOW()
              AND users.status = 'active'
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup session")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user_id: Uuid = row.try_get("id")?;
        let nickname: String = row.try_get("nickname")?;
        let role: String = row.try_get("role")?;
        let role = role.parse::<Role>().map_err(|err| anyhow!(err))?;

        Ok(Some(Principal::new(user_id, nickname, role)))
    }
}

#[async_trait]
impl PrincipalResolver for SessionResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Principal>> {
        // Missing tokens are "no session", not an error.
        let Some(token) = extract_token(headers) else {
            return Ok(None);
        };
        self.lookup(&hash_session_token(&token)).await
    }
}

/// Hash a session token so raw values never touch the database.
#[must_use]
pub fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_token_specific() {
        let first = hash_session_token("token-a");
        assert_eq!(first.len(), 32);
        assert_eq!(first, hash_session_token("token-a"));
        assert_ne!(first, hash_session_token("token-b"));
    }

    #[tokio::test]
    async fn missing_token_resolves_to_none_without_touching_the_pool() {
        // connect_lazy never opens a connection until a query runs.
        let pool = PgPool::connect_lazy("postgres://lafesta@localhost:1/lafesta").unwrap();
        let resolver = SessionResolver::new(pool);
        let principal = resolver.resolve(&HeaderMap::new()).await.unwrap();
        assert!(principal.is_none());
    }
}
