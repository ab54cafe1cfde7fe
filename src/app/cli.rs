//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// WebScribe - Turn recorded web interactions into replayable test scripts
#[derive(Parser, Debug)]
#[command(name = "webscribe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a test script from a recorded action log
    Generate {
        /// Input action log (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output script file (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target framework: playwright, puppeteer, or cypress
        #[arg(short, long)]
        library: Option<String>,

        /// Omit step-description comments
        #[arg(long)]
        no_comments: bool,
    },

    /// List the steps of a recorded action log
    Inspect {
        /// Input action log (JSON)
        input: PathBuf,
    },

    /// Validate a recorded action log
    Validate {
        /// Input action log (JSON)
        input: PathBuf,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "codegen.preferred_library")
        key: String,

        /// Value to set
        value: String,
    },

    /// Get a specific configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the recordings directory
    pub fn recordings_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".webscribe").join("recordings"))
            .unwrap_or_else(|| PathBuf::from("recordings"))
    }

    /// Get the generated-scripts output directory
    pub fn scripts_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".webscribe").join("scripts"))
            .unwrap_or_else(|| PathBuf::from("scripts"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_generate_command() {
        let args = vec![
            "webscribe",
            "generate",
            "--input", "/path/to/log.json",
            "--output", "/path/to/out.spec.ts",
            "--library", "playwright",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Generate {
                input,
                output,
                library,
                no_comments,
            } => {
                assert_eq!(input, PathBuf::from("/path/to/log.json"));
                assert_eq!(output, Some(PathBuf::from("/path/to/out.spec.ts")));
                assert_eq!(library.as_deref(), Some("playwright"));
                assert!(!no_comments);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_generate_defaults() {
        let args = vec!["webscribe", "generate", "--input", "log.json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Generate {
                output,
                library,
                no_comments,
                ..
            } => {
                assert!(output.is_none());
                assert!(library.is_none());
                assert!(!no_comments);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_generate_no_comments() {
        let args = vec![
            "webscribe",
            "generate",
            "--input", "log.json",
            "--no-comments",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Generate { no_comments, .. } => assert!(no_comments),
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_inspect_command() {
        let args = vec!["webscribe", "inspect", "/path/to/log.json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Inspect { input } => {
                assert_eq!(input, PathBuf::from("/path/to/log.json"));
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_command() {
        let args = vec!["webscribe", "validate", "/path/to/log.json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Validate { input } => {
                assert_eq!(input, PathBuf::from("/path/to/log.json"));
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_parse_init_command() {
        let args = vec!["webscribe", "init", "--force"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let args = vec![
            "webscribe",
            "--verbose",
            "--config", "/custom/config.toml",
            "inspect",
            "log.json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_cli_parse_config_subcommands() {
        let cli = Cli::try_parse_from(vec!["webscribe", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Show
            }
        ));

        let cli = Cli::try_parse_from(vec![
            "webscribe",
            "config",
            "set",
            "codegen.preferred_library",
            "cypress",
        ])
        .unwrap();
        match cli.command {
            Commands::Config {
                action: ConfigAction::Set { key, value },
            } => {
                assert_eq!(key, "codegen.preferred_library");
                assert_eq!(value, "cypress");
            }
            _ => panic!("Expected Config Set"),
        }

        let cli =
            Cli::try_parse_from(vec!["webscribe", "config", "get", "capture.overlay_root_id"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Get { .. }
            }
        ));

        let cli = Cli::try_parse_from(vec!["webscribe", "config", "reset", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Reset { force: true }
            }
        ));
    }

    #[test]
    fn test_cli_missing_required_argument_fails() {
        let args = vec!["webscribe", "generate"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_invalid_command_fails() {
        let args = vec!["webscribe", "record-forever"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        assert!(subcommands.contains(&"generate"));
        assert!(subcommands.contains(&"inspect"));
        assert!(subcommands.contains(&"validate"));
        assert!(subcommands.contains(&"init"));
        assert!(subcommands.contains(&"config"));
    }

    #[test]
    fn test_directories_have_fallbacks() {
        assert!(!Cli::recordings_dir().as_os_str().is_empty());
        assert!(!Cli::scripts_dir().as_os_str().is_empty());
    }
}
