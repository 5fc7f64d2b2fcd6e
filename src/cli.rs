//! CLI interface for the skill normalizer

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "skill-normalizer")]
#[command(about = "Reconcile extracted skill names against a controlled vocabulary")]
#[command(long_about = "Resolve free-text skill mentions to canonical vocabulary entries using exact, alias and fuzzy matching")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match skill mentions against a vocabulary
    Normalize {
        /// Mentions file (JSON list, JSON response object, or raw model text)
        #[arg(short, long, required_unless_present = "request", conflicts_with = "request")]
        mentions: Option<PathBuf>,

        /// Vocabulary file (JSON or TOML)
        #[arg(short = 'V', long, required_unless_present = "request", conflicts_with = "request")]
        vocabulary: Option<PathBuf>,

        /// Single JSON request holding both `mentions` and `vocabulary`
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Alias file (JSON or TOML), merged over the configured aliases
        #[arg(short, long)]
        aliases: Option<PathBuf>,

        /// Override the fuzzy similarity threshold (0.0 - 1.0)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show strategy, score and proficiency per mention
        #[arg(short, long)]
        detailed: bool,
    },

    /// Parse a model response and print the skill mentions it contains
    Extract {
        /// File holding the raw response text
        #[arg(short, long)]
        response: PathBuf,
    },

    /// Show edit distance and similarity between two labels
    Similarity {
        a: String,
        b: String,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "html" => Ok(crate::config::OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
