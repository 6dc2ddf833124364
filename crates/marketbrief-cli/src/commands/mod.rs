mod report;
mod watch;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Report(args) => report::run(args).await,
        Command::Watch(args) => watch::run(args).await,
    }
}
