//! WebScribe - web interaction recording to test scripts
//!
//! Compiles recorded action logs into Playwright, Puppeteer, or Cypress
//! scripts.

use std::path::{Path, PathBuf};
use webscribe::app::cli::{Cli, Commands, ConfigAction};
use webscribe::app::config::Config;
use webscribe::codegen::{compile, describe_action, ScriptType};
use webscribe::session::ActionLog;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    // Initialize tracing (--verbose enables debug-level output)
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Load config
    let config = if let Some(path) = &cli.config {
        Config::load(path)?
    } else {
        Config::load_default()?
    };

    // Execute command
    match cli.command {
        Commands::Generate {
            input,
            output,
            library,
            no_comments,
        } => {
            run_generate(&input, output, library, no_comments, &config)?;
        }
        Commands::Inspect { input } => {
            run_inspect(&input, &config)?;
        }
        Commands::Validate { input } => {
            run_validate(&input)?;
        }
        Commands::Init { force } => {
            run_init(force, &config)?;
        }
        Commands::Config { action } => {
            run_config(action, &config)?;
        }
    }

    Ok(())
}

/// File extension conventions per target framework.
fn script_extension(library: ScriptType) -> &'static str {
    match library {
        ScriptType::Playwright => "spec.ts",
        ScriptType::Puppeteer => "js",
        ScriptType::Cypress => "cy.js",
    }
}

fn run_generate(
    input: &Path,
    output: Option<PathBuf>,
    library: Option<String>,
    no_comments: bool,
    config: &Config,
) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("Action log not found: {:?}", input);
    }

    let log = ActionLog::load(input)?;
    log.validate()?;
    info!("Loaded action log with {} actions", log.len());

    // CLI choice wins over the configured default
    let library = match library {
        Some(name) => name.parse::<ScriptType>()?,
        None => config.codegen.preferred_library,
    };
    let show_comments = !no_comments && config.codegen.show_comments;

    let script = match compile(log.actions(), show_comments, library) {
        Ok(script) => script,
        Err(e) => {
            error!("Failed to generate script: {}", e);
            anyhow::bail!("Script generation failed: {}", e);
        }
    };

    match output {
        Some(mut path) => {
            if path.extension().is_none() {
                path.set_extension(script_extension(library));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &script)?;
            info!("Generated {} script at {:?}", library, path);

            println!("\nScript Generated Successfully!");
            println!("  Framework: {}", library);
            println!("  Steps: {}", log.len());
            println!("  Output: {:?}", path);
        }
        None => {
            println!("{script}");
        }
    }

    Ok(())
}

fn run_inspect(input: &Path, config: &Config) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("Action log not found: {:?}", input);
    }

    let log = ActionLog::load(input)?;
    println!("Action log {:?} ({} actions):", input, log.len());

    let library = config.codegen.preferred_library;
    for (i, action) in log.actions().iter().enumerate() {
        println!("  {}. {}", i + 1, describe_action(action, library));
    }

    Ok(())
}

fn run_validate(input: &Path) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("Action log not found: {:?}", input);
    }

    let log = match ActionLog::load(input) {
        Ok(log) => log,
        Err(e) => {
            println!("Validation FAILED:");
            println!("  - {}", e);
            anyhow::bail!("Validation failed");
        }
    };

    match log.validate() {
        Ok(()) => {
            println!("Validation PASSED ({} actions)", log.len());
            Ok(())
        }
        Err(e) => {
            println!("Validation FAILED:");
            println!("  - {}", e);
            anyhow::bail!("Validation failed")
        }
    }
}

fn run_init(force: bool, config: &Config) -> anyhow::Result<()> {
    let config_path = Config::default_path();

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    config.save_default()?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    // Create directories
    std::fs::create_dir_all(Cli::recordings_dir())?;
    std::fs::create_dir_all(Cli::scripts_dir())?;

    println!("\nCreated directories:");
    println!("  Recordings: {:?}", Cli::recordings_dir());
    println!("  Scripts: {:?}", Cli::scripts_dir());

    Ok(())
}

fn run_config(action: ConfigAction, config: &Config) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = config.to_toml()?;
            println!("Configuration ({:?}):\n", Config::default_path());
            println!("{}", toml_str);
        }
        ConfigAction::Get { key } => {
            let document: toml::Value = toml::from_str(&config.to_toml()?)?;
            match toml_get(&document, &key) {
                Some(v) => println!("{} = {}", key, v),
                None => {
                    anyhow::bail!("Configuration key '{}' not found", key);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let config_path = Config::default_path();
            if !config_path.exists() {
                anyhow::bail!("No config file found. Run 'webscribe init' first.");
            }

            let content = std::fs::read_to_string(&config_path)?;
            let mut document: toml::Value = toml::from_str(&content)?;
            if !toml_set(&mut document, &key, &value) {
                anyhow::bail!("Failed to set '{}'. Key may not exist in config.", key);
            }

            // The edited document must still deserialize and validate.
            let updated: Config = document
                .clone()
                .try_into()
                .map_err(|e| anyhow::anyhow!("Invalid value for '{}': {}", key, e))?;
            updated.validate()?;

            std::fs::write(&config_path, toml::to_string_pretty(&document)?)?;
            println!("Set {} = {}", key, value);
        }
        ConfigAction::Reset { force } => {
            let config_path = Config::default_path();

            if config_path.exists() && !force {
                println!("Config exists at {:?}", config_path);
                println!("Use --force to reset to defaults");
                return Ok(());
            }

            let default_config = Config::default();
            default_config.save_default()?;
            println!("Configuration reset to defaults at {:?}", config_path);
        }
    }

    Ok(())
}

/// Look up a dotted key in a parsed TOML document.
fn toml_get<'a>(root: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.').try_fold(root, |node, part| node.get(part))
}

/// Assign a dotted key in a parsed TOML document, coercing the raw text to
/// the type of the value already present. Unknown keys are rejected.
fn toml_set(root: &mut toml::Value, key: &str, raw: &str) -> bool {
    let mut node = root;
    let mut parts = key.split('.').peekable();
    while let Some(part) = parts.next() {
        if parts.peek().is_some() {
            match node.get_mut(part) {
                Some(next) => node = next,
                None => return false,
            }
            continue;
        }

        let Some(slot) = node.get_mut(part) else {
            return false;
        };
        let parsed = match slot {
            toml::Value::String(_) => Some(toml::Value::String(raw.to_string())),
            toml::Value::Integer(_) => raw.parse().ok().map(toml::Value::Integer),
            toml::Value::Float(_) => raw.parse().ok().map(toml::Value::Float),
            toml::Value::Boolean(_) => raw.parse().ok().map(toml::Value::Boolean),
            _ => None,
        };
        let Some(value) = parsed else {
            return false;
        };
        *slot = value;
        return true;
    }
    false
}
