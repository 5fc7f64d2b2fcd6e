//! skill-normalizer: reconcile extracted skill names against a controlled vocabulary

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{error, info};
use skill_normalizer::cli::{self, Cli, Commands, ConfigAction};
use skill_normalizer::config::Config;
use skill_normalizer::input::InputManager;
use skill_normalizer::normalizer::similarity::{levenshtein_distance, similarity};
use skill_normalizer::output::{save_report_to_file, NormalizationReport, ReportGenerator, ReportMetadata};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))
    {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Normalize {
            mentions,
            vocabulary,
            request,
            aliases,
            threshold,
            output,
            save,
            detailed,
        } => {
            let started = Instant::now();
            let format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(|e| anyhow!(e))?,
                None => config.output.format,
            };

            let mut normalizer = config.normalizer();
            if let Some(threshold) = threshold {
                normalizer.set_fuzzy_threshold(threshold);
            }

            let mut input_manager = InputManager::new()
                .with_defaults(config.matching.default_sector.clone(), config.matching.default_proficiency);

            let mut alias_table = config.aliases.clone();
            if let Some(path) = &aliases {
                cli::validate_file_extension(path, &["json", "toml"])
                    .map_err(|e| anyhow!("Alias file: {}", e))?;
                let loaded = input_manager
                    .load_aliases(path)
                    .await
                    .with_context(|| format!("Failed to load aliases from {}", path.display()))?;
                alias_table.extend(&loaded);
            }

            let (results, mut metadata) = match (request, mentions, vocabulary) {
                (Some(request_path), _, _) => {
                    let request = input_manager
                        .load_request(&request_path)
                        .await
                        .with_context(|| format!("Failed to load request from {}", request_path.display()))?;
                    let results = normalizer.normalize_or_unmatched(&request, &alias_table);
                    let mut metadata = ReportMetadata::new(
                        request_path.display().to_string(),
                        request_path.display().to_string(),
                    );
                    metadata.vocabulary_size = request
                        .get("vocabulary")
                        .and_then(|v| v.as_array())
                        .map_or(0, Vec::len);
                    (results, metadata)
                }
                (None, Some(mentions_path), Some(vocabulary_path)) => {
                    let mentions = input_manager
                        .load_mentions(&mentions_path)
                        .await
                        .with_context(|| format!("Failed to load mentions from {}", mentions_path.display()))?;
                    let vocabulary = input_manager
                        .load_vocabulary(&vocabulary_path)
                        .await
                        .with_context(|| format!("Failed to load vocabulary from {}", vocabulary_path.display()))?;
                    let results = normalizer.normalize(&mentions, &vocabulary, &alias_table);
                    let mut metadata = ReportMetadata::new(
                        mentions_path.display().to_string(),
                        vocabulary_path.display().to_string(),
                    );
                    metadata.vocabulary_size = vocabulary.len();
                    (results, metadata)
                }
                _ => return Err(anyhow!("either --request or both --mentions and --vocabulary are required")),
            };

            metadata.alias_count = alias_table.len();
            metadata.fuzzy_threshold = normalizer.fuzzy_threshold();
            metadata.processing_time_ms = started.elapsed().as_millis() as u64;

            let report = NormalizationReport::new(results, metadata);
            info!(
                "Normalized {} mentions: {} matched, {} unmatched",
                report.summary.total, report.summary.matched, report.summary.unmatched
            );

            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::with_options(
                use_colors,
                detailed || config.output.detailed,
                config.output.pretty_json,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, &format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&rendered, &path)
                        .with_context(|| format!("Failed to save report to {}", path.display()))?;
                    info!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Extract { response } => {
            let mut input_manager = InputManager::new()
                .with_defaults(config.matching.default_sector.clone(), config.matching.default_proficiency);
            let mentions = input_manager
                .load_mentions(&response)
                .await
                .with_context(|| format!("Failed to read mentions from {}", response.display()))?;
            println!("{}", serde_json::to_string_pretty(&mentions)?);
        }

        Commands::Similarity { a, b } => {
            println!("distance:   {}", levenshtein_distance(&a, &b));
            println!("similarity: {:.4}", similarity(&a, &b));
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", content);
            }
            ConfigAction::Path => println!("{}", config_path.display()),
            ConfigAction::Reset => {
                Config::default()
                    .save_to(&config_path)
                    .with_context(|| format!("Failed to write {}", config_path.display()))?;
                println!("Configuration reset: {}", config_path.display());
            }
        },
    }

    Ok(())
}
