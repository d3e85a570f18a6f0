//! Concept Worker Binary
//!
//! Loads configuration, wires the queue, generator and pipeline together and
//! runs the backlog monitor until interrupted.

use anyhow::Context;
use clap::Parser;
use concept_worker::config::{ConfigLoader, WorkerConfig};
use concept_worker::generation::PromptGenerator;
use concept_worker::logging::init_logging;
use concept_worker::monitor::{BacklogMonitor, TickOutcome};
use concept_worker::pipeline::ConceptPipeline;
use concept_worker::publisher::JobPublisher;
use concept_worker::queue::RedisQueue;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Concept worker - keeps the riddle queue stocked with puzzle concepts
#[derive(Parser)]
#[command(name = "concept-worker")]
#[command(about = "Keeps the riddle generation queue supplied with puzzle concepts")]
struct Cli {
    /// Configuration file path (TOML, JSON or YAML)
    #[arg(long, env = "CONCEPT_WORKER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    log_format: Option<String>,

    /// Run a single check-and-fill tick, then exit
    #[arg(long, default_value = "false")]
    once: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(cli.once, config).await {
        error!("Worker failed: {:#}", e);
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<WorkerConfig> {
    let mut config =
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // CLI arguments take priority over file and environment
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.trim().to_lowercase();
    }
    if let Some(ref format) = cli.log_format {
        config.logging.format = format.trim().to_lowercase();
    }
    Ok(config)
}

async fn run(once: bool, config: WorkerConfig) -> anyhow::Result<()> {
    info!(
        locale = %config.locale,
        queue = %config.queue.key,
        threshold = config.monitor.threshold,
        predefined = config.predefined_super_solutions.len(),
        "Concept worker starting"
    );

    let queue = Arc::new(RedisQueue::new(&config.queue).context("Invalid queue address")?);
    let generator = PromptGenerator::from_config(&config.generator)
        .context("Failed to build generative service client")?;
    let pipeline = ConceptPipeline::new(
        Arc::new(generator),
        JobPublisher::new(queue.clone()),
        config.locale,
    );
    let monitor = BacklogMonitor::new(
        queue,
        pipeline,
        config.predefined_super_solutions,
        config.monitor,
    );

    if once {
        let outcome = monitor.tick().await;
        info!(outcome = ?outcome, "Single tick finished");
        return match outcome {
            TickOutcome::Unreachable { error } | TickOutcome::Aborted { error, .. } => {
                Err(anyhow::anyhow!(error))
            }
            _ => Ok(()),
        };
    }

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
        signal_token.cancel();
    });

    monitor.run(shutdown).await;
    Ok(())
}
