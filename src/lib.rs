//! # Lafesta (Festival Catalogue API)
//!
//! `lafesta` serves a small CRUD API over festivals. The HTTP layer is a thin
//! passthrough: it resolves the caller, parses the path and body, calls one
//! [`festival::FestivalService`] operation and shapes the result.
//!
//! ## Access Model
//!
//! - Listing festivals is public.
//! - Reading, creating, updating and deleting a single festival require an
//!   authenticated principal. Missing or unknown credentials are rejected with
//!   `401` before any handler code runs.
//! - Whether a principal may act on a given festival (organizer role for
//!   creation, ownership or admin for changes) is decided by the service.
//!
//! ## Responses
//!
//! Create and delete answer with an acknowledgement envelope
//! (`{"status": .., "message": ..}`); every error uses the same envelope.

pub mod api;
pub mod auth;
pub mod cli;
pub mod festival;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
