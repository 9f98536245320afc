mod check;
mod convert;
mod languages;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use convert::ConvertCommand;
use eyre::Result;
use languages::LanguagesCommand;

/// Extension trait for exiting on loader errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for strato_loader::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "strato")]
#[command(version)]
#[command(about = "Convert declarative Strato programs into other languages")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Convert(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Languages(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a source program into a target language
    Convert(ConvertCommand),

    /// Validate a source program without generating code
    Check(CheckCommand),

    /// List supported target languages
    Languages(LanguagesCommand),
}
