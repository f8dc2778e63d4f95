use utoipa::{
    openapi::{
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
        Contact, InfoBuilder, License,
    },
    OpenApi,
};

use super::{
    handlers::{festivals, health},
    response::ApiAcknowledgement,
};
use crate::{
    auth::SESSION_COOKIE_NAME,
    festival::{FestivalRequest, FestivalResponse},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        festivals::create_festival,
        festivals::list_festivals,
        festivals::get_festival,
        festivals::update_festival,
        festivals::delete_festival,
    ),
    components(schemas(FestivalRequest, FestivalResponse, ApiAcknowledgement, health::Health)),
    tags(
        (name = "festivals", description = "Festival catalogue"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

/// Build the `OpenAPI` document served at `/api-docs/openapi.json`.
///
/// Paths come from the `#[utoipa::path]` attributes; the info block comes from
/// Cargo metadata. Sessions may be sent as a bearer token or as a cookie.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info = cargo_info();

    if let Some(components) = doc.components.as_mut() {
        components.add_security_scheme(
            "session",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
        );
    }

    doc
}

fn cargo_info() -> utoipa::openapi::Info {
    // Use Cargo.toml metadata instead of the utoipa crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();
    info
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    match author.split_once('<') {
        Some((name, email)) => (
            Some(name.trim()).filter(|name| !name.is_empty()),
            Some(email.trim_end_matches('>').trim()).filter(|email| !email.is_empty()),
        ),
        None => (Some(author.trim()).filter(|name| !name.is_empty()), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let doc = openapi();
        assert_eq!(doc.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));

        let contact = doc.info.contact.expect("contact from Cargo authors");
        assert_eq!(contact.name.as_deref(), Some("Team Lafesta"));
        assert_eq!(contact.email.as_deref(), Some("team@lafesta.dev"));

        let license = doc.info.license.expect("license from Cargo metadata");
        assert_eq!(license.identifier.as_deref(), Some("BSD-3-Clause"));
    }

    #[test]
    fn openapi_documents_festival_routes() {
        let doc = openapi();
        assert!(doc.paths.paths.contains_key("/api/festivals"));
        assert!(doc.paths.paths.contains_key("/api/festivals/{festival_id}"));
        assert!(doc.paths.paths.contains_key("/health"));

        let tags = doc.tags.unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "festivals"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("session"));
        assert!(components.schemas.contains_key("FestivalRequest"));
        assert!(components.schemas.contains_key("ApiAcknowledgement"));
    }

    #[test]
    fn parse_author_variants() {
        assert_eq!(
            parse_author("Jane Doe <jane@example.com>"),
            (Some("Jane Doe"), Some("jane@example.com"))
        );
        assert_eq!(parse_author("Jane Doe"), (Some("Jane Doe"), None));
        assert_eq!(parse_author("<jane@example.com>"), (None, Some("jane@example.com")));
    }
}
