//! Principal resolution.
//!
//! Flow Overview: a request carries a session token (bearer header or cookie),
//! a [`PrincipalResolver`] turns it into a [`Principal`], and handlers receive
//! that principal as an explicit argument. Handlers that take a `Principal`
//! never run for unauthenticated requests.

mod principal;
mod session;

pub use principal::{
    extract_token, Principal, PrincipalResolver, Role, SharedResolver, StaticTokenResolver,
    SESSION_COOKIE_NAME,
};
pub use session::{hash_session_token, SessionResolver};
