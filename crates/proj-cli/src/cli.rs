//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Resolve and check project specifications
#[derive(Parser, Debug)]
#[command(name = "proj")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Load and validate every specification declared in a module
    ///
    /// Examples:
    ///   proj check              # Check the module in the current directory
    ///   proj check ../my-lib    # Check another module
    Check {
        /// Module root containing proj.yaml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Version recorded on the loaded specifications
        #[arg(long, default_value = "0.0.0")]
        module_version: String,
    },

    /// Print the project's resolved resource exclude patterns
    Excludes {
        /// Module root containing proj.yaml
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_defaults() {
        let cli = Cli::parse_from(["proj", "check"]);
        assert!(!cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Check {
                path: PathBuf::from("."),
                module_version: "0.0.0".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_excludes_with_path() {
        let cli = Cli::parse_from(["proj", "-v", "excludes", "libs/core"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Excludes {
                path: PathBuf::from("libs/core"),
            }
        );
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
