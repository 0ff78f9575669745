//! Command dispatch: bridges CLI args -> console stores -> output formatting.

pub mod config_cmd;
pub mod qubes;
pub mod system;
pub mod util;
pub mod zones;

use qubes_air_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Zones(args) => zones::handle(console, args, global).await,
        Command::Qubes(args) => qubes::handle(console, args, global).await,
        Command::Health => system::health(console, global).await,
        Command::Status => system::status(console, global).await,
        // Config and Completions are handled before a console is built
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
