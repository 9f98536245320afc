use clap::Args;
use eyre::Result;
use strato_convert::{PLUGIN_PATH_ENV, registry};

#[derive(Args)]
pub struct LanguagesCommand;

impl LanguagesCommand {
    /// Run the languages command
    pub fn run(&self) -> Result<()> {
        println!("Built-in languages:");
        for language in registry::supported_languages() {
            println!("  {}", language);
        }
        println!();
        println!("Any other language resolves to a 'strato-language-<name>' plugin");
        println!("found on {} or PATH.", PLUGIN_PATH_ENV);
        Ok(())
    }
}
