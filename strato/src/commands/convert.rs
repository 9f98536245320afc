use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use strato_convert::{ConvertOptions, Converter};

/// Environment toggle that enables the IR pseudo-target.
const DEV_ENV: &str = "STRATO_DEV";

#[derive(Args)]
pub struct ConvertCommand {
    /// Source project directory (defaults to the current directory)
    #[arg(default_value = ".")]
    pub source_dir: PathBuf,

    /// Which language to generate the project for
    #[arg(short, long)]
    pub language: String,

    /// Output directory for the converted project
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Generate the converted program only; do not install dependencies
    #[arg(long)]
    pub generate_only: bool,
}

impl ConvertCommand {
    /// Run the convert command
    pub fn run(&self) -> Result<()> {
        let opts = ConvertOptions {
            source_dir: self.source_dir.clone(),
            language: self.language.clone(),
            out_dir: self.out.clone(),
            generate_only: self.generate_only,
            dev_mode: dev_mode_from_env(),
        };

        match Converter::new().convert(&opts) {
            Ok(()) => {
                println!(
                    "Converted {} to {}",
                    self.source_dir.display(),
                    self.language
                );
                println!("Output: {}", self.out.display());
                Ok(())
            }
            Err(err) => match err.downcast::<Box<strato_loader::Error>>() {
                Ok(loader_err) => {
                    eprintln!("{:?}", miette::Report::new(*loader_err));
                    std::process::exit(1);
                }
                Err(err) => Err(err),
            },
        }
    }
}

fn dev_mode_from_env() -> bool {
    std::env::var(DEV_ENV).is_ok_and(|value| is_truthy(&value))
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("yes"));
    }
}
