//! Map validated CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{
    self, ARG_CORS_ORIGIN, ARG_DEV_TOKEN, ARG_DSN, ARG_IN_MEMORY, ARG_MAX_CONNECTIONS, ARG_PORT,
};
use anyhow::{anyhow, Result};

/// Build the server action from parsed matches.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    commands::validate(matches).map_err(|e| anyhow!(e))?;

    Ok(Action::Server(Args {
        port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
        dsn: matches.get_one::<String>(ARG_DSN).cloned(),
        in_memory: matches.get_flag(ARG_IN_MEMORY),
        dev_token: matches.get_one::<String>(ARG_DEV_TOKEN).cloned(),
        max_connections: matches
            .get_one::<u32>(ARG_MAX_CONNECTIONS)
            .copied()
            .unwrap_or(5),
        cors_origin: matches.get_one::<String>(ARG_CORS_ORIGIN).cloned(),
    }))
}
