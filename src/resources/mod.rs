//! Typed bindings for the Operations Center resources.
//!
//! Each wrapper borrows the [`Client`](crate::Client), validates its
//! arguments before any I/O, asks the client's
//! [`SchemeRules`](crate::SchemeRules) for the path and hands the call to the
//! shared request pipeline.

mod cli;
mod clients;
mod domains;
mod servers;

pub use cli::Cli;
pub use clients::BackupClients;
pub use domains::Domains;
pub use servers::Servers;

use crate::{Error, Result};

fn require(value: &str, argument: &'static str) -> Result<()> {
    if value.is_empty() {
        Err(Error::empty_argument(argument))
    } else {
        Ok(())
    }
}
