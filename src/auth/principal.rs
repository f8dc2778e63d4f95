use std::{collections::HashMap, str::FromStr, sync::Arc};

use anyhow::Result;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::api::response::ApiError;

pub const SESSION_COOKIE_NAME: &str = "lafesta_session";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Organizer,
    Admin,
}

impl Role {
    /// Canonical string form, matching the `users.role` column values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organizer => "organizer",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "organizer" => Ok(Self::Organizer),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Authenticated caller, resolved once per request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub nickname: String,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub fn new(user_id: Uuid, nickname: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            nickname: nickname.into(),
            role,
        }
    }

    /// Organizers and admins may publish new festivals.
    #[must_use]
    pub fn can_publish(&self) -> bool {
        matches!(self.role, Role::Organizer | Role::Admin)
    }

    /// Owners and admins may change or remove a festival.
    #[must_use]
    pub fn can_manage(&self, owner_id: Uuid) -> bool {
        self.role == Role::Admin || self.user_id == owner_id
    }
}

/// Turns request credentials into a principal.
///
/// `Ok(None)` means "no valid credentials" and is answered with `401`;
/// `Err` is reserved for lookup failures and is answered with `500`.
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Principal>>;
}

pub type SharedResolver = Arc<dyn PrincipalResolver>;

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(resolver) = parts.extensions.get::<SharedResolver>().cloned() else {
            error!("Principal resolver extension is missing from the router");
            return Err(ApiError::Internal);
        };

        match resolver.resolve(&parts.headers).await {
            Ok(Some(principal)) => {
                debug!(user_id = %principal.user_id, role = principal.role.as_str(), "principal resolved");
                Ok(principal)
            }
            Ok(None) => Err(ApiError::AuthenticationRequired),
            Err(err) => {
                error!("Failed to resolve principal: {err:#}");
                Err(ApiError::Internal)
            }
        }
    }
}

/// Read the session token from `Authorization: Bearer` or, failing that, the session cookie.
#[must_use]
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE_NAME && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Resolver backed by a fixed token table, used for in-memory runs.
#[derive(Clone, Debug, Default)]
pub struct StaticTokenResolver {
    tokens: HashMap<String, Principal>,
}

impl StaticTokenResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }
}

#[async_trait]
impl PrincipalResolver for StaticTokenResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Principal>> {
        Ok(extract_token(headers).and_then(|token| self.tokens.get(&token).cloned()))
    }
}
