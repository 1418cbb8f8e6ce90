use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::future::join_all;
use game_image_resolver::{
    config::{default_config_path, load_config_from_path},
    helpers::{parse_batch_line, wait_for_shutdown_signal},
    images::ImageResolver,
    logger::{self, LogTag},
};
use serde::Serialize;
use std::path::PathBuf;

/// Resolve game artwork URLs to images that load, or to placeholders
#[derive(Debug, Parser)]
#[command(name = "game-image-resolver", version)]
struct Cli {
    /// Configuration file (defaults to data/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show verbose output for every tag
    #[arg(long, global = true)]
    verbose: bool,

    /// Enable debug output for a tag (images, probe, sweep, config, system)
    #[arg(long = "debug", value_name = "TAG", global = true)]
    debug: Vec<String>,

    /// Only print messages from these tags (errors are always printed)
    #[arg(long = "only", value_name = "TAG", global = true)]
    only: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve one candidate URL
    Resolve {
        url: String,
        /// Game title used to derive the placeholder
        #[arg(long)]
        label: String,
    },
    /// Print the placeholder URL for a label
    Fallback { label: String },
    /// Resolve every `url<TAB>label` line of a file concurrently
    Batch {
        file: PathBuf,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct BatchResult {
    candidate: String,
    label: String,
    resolved: String,
    placeholder: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose, &cli.debug, &cli.only);

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = load_config_from_path(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let resolver = ImageResolver::from_config(&config).context("building image resolver")?;

    match cli.command {
        Command::Fallback { label } => {
            println!("{}", resolver.fallback_url(&label));
        }
        Command::Resolve { url, label } => {
            let sweeper = resolver.start_sweeper();
            println!("{}", resolver.resolve(&url, &label).await);
            sweeper.stop().await;
        }
        Command::Batch { file, json } => {
            let sweeper = resolver.start_sweeper();
            tokio::select! {
                result = run_batch(&resolver, &file, json) => result?,
                _ = wait_for_shutdown_signal() => {
                    logger::warning(LogTag::System, "Interrupted, stopping batch");
                }
            }
            sweeper.stop().await;

            let metrics = resolver.metrics();
            logger::info(
                LogTag::Images,
                &format!(
                    "probes={} hits={} shared={} failures={} timeouts={} untrusted={} hit_rate={:.2}",
                    metrics.probes,
                    metrics.hits,
                    metrics.shared_waits,
                    metrics.probe_failures,
                    metrics.probe_timeouts,
                    metrics.untrusted,
                    metrics.hit_rate()
                ),
            );
        }
    }

    Ok(())
}

async fn run_batch(resolver: &ImageResolver, file: &PathBuf, json: bool) -> Result<()> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading batch file {}", file.display()))?;

    let requests: Vec<(String, String)> = contents.lines().filter_map(parse_batch_line).collect();
    logger::info(
        LogTag::Images,
        &format!("Resolving {} image(s) from {}", requests.len(), file.display()),
    );

    let results = join_all(requests.into_iter().map(|(candidate, label)| async move {
        let resolved = resolver.resolve(&candidate, &label).await;
        BatchResult {
            placeholder: resolver.is_fallback_url(&resolved),
            candidate,
            label,
            resolved,
        }
    }))
    .await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&results).context("serializing batch results")?
        );
    } else {
        for result in &results {
            let marker = if result.placeholder { "placeholder" } else { "ok" };
            println!("{}\t{}\t{}", marker, result.label, result.resolved);
        }
    }

    Ok(())
}
