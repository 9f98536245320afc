use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use crate::commands::UnwrapOrExit;

#[derive(Args)]
pub struct CheckCommand {
    /// Source project directory (defaults to the current directory)
    #[arg(default_value = ".")]
    pub source_dir: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let (project, program) = strato_loader::eject(&self.source_dir).unwrap_or_exit();

        println!("{}: ok", project.name);
        println!("  variables: {}", program.variables.len());
        println!("  config:    {}", program.config.len());
        println!("  resources: {}", program.resources.len());
        println!("  outputs:   {}", program.outputs.len());
        Ok(())
    }
}
