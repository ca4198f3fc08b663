mod args;
mod handlers;

use anyhow::Result;

pub use args::{Cli, Commands, DialectArg};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Summary {
            file,
            dialect,
            json,
        } => handlers::summary::handle(&file, dialect.into(), json),
        Commands::Units {
            file,
            dialect,
            json,
        } => handlers::units::handle(&file, dialect.into(), json),
        Commands::Watch { file, dialect } => handlers::watch::handle(&file, dialect.into()),
    }
}
