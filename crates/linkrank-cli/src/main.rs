#![forbid(unsafe_code)]

mod crawl;
mod output;

use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use linkrank_core::{RankConfig, config::load_config, iterate_rank, sample_rank};
use output::{IterationReport, OutputMode, RankReport, SamplingReport};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Config file looked up inside the corpus when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "linkrank.toml";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "linkrank: rank the pages of an HTML corpus",
    long_about = "Crawl a directory of .html pages, then estimate each page's rank twice: \
                  by sampling a random surfer and by iterating the rank equations.",
    after_help = "EXAMPLES:\n    # Rank a corpus with defaults\n    linkrank corpus0\n\n\
                  # Reproducible sampling with more samples\n    linkrank corpus0 --seed 42 --samples 100000\n\n\
                  # Machine-readable output\n    linkrank corpus0 --format json"
)]
struct Cli {
    /// Directory holding the .html pages.
    corpus: PathBuf,

    /// TOML config file (default: <CORPUS>/linkrank.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Probability of following a link instead of jumping to a random page.
    #[arg(long)]
    damping: Option<f64>,

    /// Number of pages visited by the random surfer.
    #[arg(long)]
    samples: Option<usize>,

    /// Stop iterating once no page's rank moves by more than this.
    #[arg(long)]
    tolerance: Option<f64>,

    /// Safety cap on rank iteration passes.
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Seed for the random surfer (default: OS entropy).
    #[arg(long)]
    seed: Option<u64>,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<OutputMode>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Config file path, explicit or the corpus default.
    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.corpus.join(DEFAULT_CONFIG_FILE))
    }

    /// Layer command-line overrides on top of the file config.
    fn apply_overrides(&self, mut config: RankConfig) -> RankConfig {
        if let Some(damping) = self.damping {
            config.damping = damping;
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("LINKRANK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "linkrank=debug,info"
        } else {
            "linkrank=info,warn"
        })
    });

    let format = env::var("LINKRANK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli) -> Result<RankReport> {
    let config_path = cli.config_path();
    let config = cli.apply_overrides(load_config(&config_path)?);
    config.validate().context("invalid ranking parameters")?;
    debug!(?config, path = %config_path.display(), "resolved configuration");

    let graph = crawl::crawl(&cli.corpus)?;
    info!(
        pages = graph.node_count(),
        links = graph.edge_count(),
        "corpus loaded"
    );

    let mut rng = config
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let sampled = sample_rank(&graph, &config.sampling(), &mut rng)?;
    let outcome = iterate_rank(&graph, &config.iteration())?;

    Ok(RankReport {
        sampling: SamplingReport {
            samples: config.samples,
            ranks: sampled,
        },
        iteration: IterationReport {
            iterations: outcome.iterations,
            converged: outcome.converged,
            ranks: outcome.ranks,
        },
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let report = run(&cli)?;

    let mode = output::resolve_output_mode(cli.format);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    output::render_report(&report, mode, &mut out)?;
    Ok(())
}
