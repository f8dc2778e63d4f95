//! Request/response payloads shared between handlers, services and `OpenAPI` generation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use super::ServiceError;

pub const TITLE_MAX_CHARS: usize = 100;

/// Mutable festival fields accepted on create and update.
///
/// There is no identifier here: an `id` key in the JSON body is ignored, the
/// path (update) or the service (create) is authoritative.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct FestivalRequest {
    pub title: String,
    pub content: String,
    pub location: String,
    pub month: i32,
    pub open_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub official_link: Option<String>,
}

impl FestivalRequest {
    /// Returns a trimmed copy of the request, or the first rule it breaks.
    ///
    /// # Errors
    /// Returns [`ServiceError::Validation`] with a client-facing message.
    pub fn validated(self) -> Result<Self, ServiceError> {
        let title = required("title", &self.title)?;
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(ServiceError::Validation(format!(
                "title must be at most {TITLE_MAX_CHARS} characters"
            )));
        }
        let content = required("content", &self.content)?;
        let location = required("location", &self.location)?;

        if !(1..=12).contains(&self.month) {
            return Err(ServiceError::Validation(
                "month must be between 1 and 12".to_string(),
            ));
        }

        if self.end_date < self.open_date {
            return Err(ServiceError::Validation(
                "end_date must not be before open_date".to_string(),
            ));
        }

        let official_link = match self.official_link.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(link) => Some(validate_link(link)?),
        };

        Ok(Self {
            title,
            content,
            location,
            month: self.month,
            open_date: self.open_date,
            end_date: self.end_date,
            official_link,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ServiceError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}

fn validate_link(link: &str) -> Result<String, ServiceError> {
    match Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(link.to_string()),
        _ => Err(ServiceError::Validation(
            "official_link must be an http(s) URL".to_string(),
        )),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct FestivalResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub location: String,
    pub month: i32,
    pub open_date: NaiveDate,
    pub end_date: NaiveDate,
    pub official_link: Option<String>,
}

impl FestivalResponse {
    pub(super) fn from_request(id: i64, request: FestivalRequest) -> Self {
        Self {
            id,
            title: request.title,
            content: request.content,
            location: request.location,
            month: request.month,
            open_date: request.open_date,
            end_date: request.end_date,
            official_link: request.official_link,
        }
    }
}
