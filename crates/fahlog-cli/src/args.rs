use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fahlog_types::Dialect;

#[derive(Parser)]
#[command(name = "fahlog")]
#[command(about = "Inspect Folding@home client logs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Per-run and per-slot overview of a log file
    Summary {
        /// Path to the log file
        file: PathBuf,

        #[arg(long, value_enum, default_value = "fahclient")]
        dialect: DialectArg,

        /// Emit JSON instead of the plain report
        #[arg(long)]
        json: bool,
    },

    /// One row per work unit
    Units {
        /// Path to the log file
        file: PathBuf,

        #[arg(long, value_enum, default_value = "fahclient")]
        dialect: DialectArg,

        #[arg(long)]
        json: bool,
    },

    /// Follow a growing log file and report progress as it happens
    Watch {
        /// Path to the log file
        file: PathBuf,

        #[arg(long, value_enum, default_value = "fahclient")]
        dialect: DialectArg,
    },
}

/// CLI-facing spelling of the two log dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    Legacy,
    Fahclient,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Legacy => Dialect::Legacy,
            DialectArg::Fahclient => Dialect::FahClient,
        }
    }
}
