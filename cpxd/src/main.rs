use anyhow::Result;
use clap::{Parser, Subcommand};
use cpx_core::config::load_configs;
use cpx_core::observability::{init_logging, install_metrics};
use cpxd::cache::{
    load_request, load_stored, parse_instant, MetricsObserver, ReuseEvaluator, ReuseObserver,
    TracingObserver,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::info;

#[derive(Parser)]
#[command(name = "cpxd", about = "cpx cache reuse evaluator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and validate configuration.
    Check {
        #[arg(short, long, required = true, num_args = 1..)]
        config: Vec<PathBuf>,
    },
    /// Decide whether a stored response may satisfy a request.
    Eval {
        #[arg(short, long, required = true, num_args = 1..)]
        config: Vec<PathBuf>,
        #[arg(short, long)]
        stored: PathBuf,
        #[arg(short, long)]
        request: PathBuf,
        /// Evaluation instant as an HTTP-date; defaults to the wall clock.
        #[arg(short, long)]
        now: Option<String>,
        /// Treat a successful revalidation as already performed.
        #[arg(long)]
        revalidated: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Check { config } => {
            load_configs(&config)?;
            println!("config ok");
            Ok(())
        }
        Command::Eval {
            config,
            stored,
            request,
            now,
            revalidated,
        } => run_eval(config, stored, request, now, revalidated),
    }
}

fn run_eval(
    config_paths: Vec<PathBuf>,
    stored_path: PathBuf,
    request_path: PathBuf,
    now: Option<String>,
    revalidated: bool,
) -> Result<()> {
    let config = load_configs(&config_paths)?;
    init_logging(&config.logging)?;
    let metrics = install_metrics(&config.metrics)?;

    let observer: Arc<dyn ReuseObserver> = if metrics.is_some() {
        Arc::new((
            TracingObserver,
            MetricsObserver::new(config.metrics.prefix.as_str()),
        ))
    } else {
        Arc::new(TracingObserver)
    };
    let evaluator = ReuseEvaluator::new(&config.cache).with_observer(observer);

    let stored = load_stored(&stored_path)?;
    let request = load_request(&request_path)?;
    let now = match now.as_deref() {
        Some(raw) => parse_instant(raw)?,
        None => SystemTime::now(),
    };

    let verdict = evaluator.evaluate_at(&request, &stored, now);
    let reusable = verdict.reusable(revalidated);
    info!(
        verdict = verdict.as_str(),
        reusable,
        compliance = ?evaluator.compliance(),
        "evaluated stored response"
    );
    println!("verdict: {verdict}");
    println!("can_reuse: {reusable}");

    if let Some(handle) = metrics {
        print!("{}", handle.render());
    }
    Ok(())
}
