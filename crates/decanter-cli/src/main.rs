//! decanter - extract text from documents and archives
//!
//! Usage:
//!   decanter extract <PATH>...                 Print the text of every input
//!   decanter extract --format json <PATH>...   Print text records as a JSON array
//!   decanter decomposers                       List the registered decomposers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use decanter::core::config::DecanterConfig;
use decanter::types::{Data, TextSummary};
use decanter::{DecanterError, Feeder, Plugin};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "decanter", version, about = "Recursive text extraction from documents and archives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from files, opening archives recursively
    Extract {
        /// Input files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Configuration file (TOML, YAML or JSON); defaults to a discovered decanter.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Deepest container nesting to open
        #[arg(long)]
        max_depth: Option<usize>,

        /// Ceiling on bytes read from container entries per input
        #[arg(long)]
        max_total_bytes: Option<u64>,
    },

    /// List the registered decomposers in selection order
    Decomposers {
        /// Configuration file (TOML, YAML or JSON); defaults to a discovered decanter.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load_config(path: Option<PathBuf>) -> Result<DecanterConfig> {
    match path {
        Some(path) => DecanterConfig::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(DecanterConfig::discover()
            .context("Failed to load discovered decanter.toml")?
            .unwrap_or_default()),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Extract every input; returns the number of inputs that failed.
fn extract(feeder: &Feeder, paths: &[PathBuf], format: OutputFormat) -> Result<usize> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0;
    let mut records = Vec::new();

    for path in paths {
        tracing::debug!(input = %path.display(), "Extracting");
        match feeder.extract(Data::from_path(path)) {
            Ok(texts) => match format {
                OutputFormat::Text => {
                    for text in &texts {
                        out.write_all(text.body().as_bytes())?;
                        if !text.body().ends_with('\n') {
                            out.write_all(b"\n")?;
                        }
                    }
                }
                OutputFormat::Json => records.extend(texts.iter().map(TextSummary::from)),
            },
            Err(e) => {
                failures += 1;
                report(path, &e);
            }
        }
    }

    if let OutputFormat::Json = format {
        serde_json::to_writer_pretty(&mut out, &records).context("Failed to write JSON output")?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(failures)
}

fn report(path: &std::path::Path, err: &DecanterError) {
    tracing::debug!(input = %path.display(), error = ?err, "Input failed");
    eprintln!("decanter: {}: {}", path.display(), err);
}

fn list_decomposers(feeder: &Feeder) -> Result<()> {
    let registry = feeder
        .registry()
        .read()
        .map_err(|e| anyhow::anyhow!("Decomposer registry lock poisoned: {}", e))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for key in registry.list() {
        if let Some(decomposer) = registry.get(&key) {
            writeln!(out, "{}\t{}\t{}", key, decomposer.version(), decomposer.description())?;
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Extract {
            paths,
            format,
            config,
            max_depth,
            max_total_bytes,
        } => {
            let mut config = load_config(config)?;
            if let Some(max_depth) = max_depth {
                config.max_depth = max_depth;
            }
            if let Some(max_total_bytes) = max_total_bytes {
                config.max_total_bytes = max_total_bytes;
            }
            config.validate().context("Invalid configuration")?;

            let feeder = Feeder::with_default_decomposers(config).context("Failed to register decomposers")?;
            let failures = extract(&feeder, &paths, format)?;
            if failures > 0 {
                tracing::warn!(failures, inputs = paths.len(), "Some inputs failed");
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Decomposers { config } => {
            let config = load_config(config)?;
            let feeder = Feeder::with_default_decomposers(config).context("Failed to register decomposers")?;
            list_decomposers(&feeder)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("decanter: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
