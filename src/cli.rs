//! CLI entry for mend, defining clap subcommands and dispatching each
//! command handler.

use clap::{Parser, Subcommand};

use crate::command::{self, CommandError};

#[derive(Parser, Debug)]
#[command(
    name = "mend",
    about = "Mend: LLM-assisted partial file editing",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Rewrite part of a file to satisfy a natural-language task")]
    PartialEdit(command::partial_edit::PartialEditArgs),
    #[command(about = "Apply a framed patch from a file or stdin")]
    Apply(command::apply::ApplyArgs),
}

/// Parses the command line and executes the corresponding handler.
/// - `args`: parse from the process command line if `None`, otherwise from
///   the given args (used by tests).
#[tokio::main]
pub async fn parse(args: Option<&[&str]>) -> Result<(), CommandError> {
    parse_async(args).await
}

/// `async` version of the [parse] function.
pub async fn parse_async(args: Option<&[&str]>) -> Result<(), CommandError> {
    let cli = match args {
        Some(args) => Cli::try_parse_from(args)
            .map_err(|e| CommandError::InvalidArguments(e.to_string()))?,
        None => Cli::parse(),
    };
    match cli.command {
        Commands::PartialEdit(args) => command::partial_edit::execute(args).await,
        Commands::Apply(args) => command::apply::execute(args).await,
    }
}

/// Verify the CLI builds without panicking, per the clap derive tutorial.
#[test]
fn verify_cli() {
    use clap::CommandFactory;

    Cli::command().debug_assert()
}
