#![deny(unsafe_code)]
//! CoCoEvo demo binary.
//!
//! Co-evolves logic encodings and queries for a small insurance-contract
//! world: seeding, vocabulary alignment (with emergency reseeds), then the
//! generational loop. The solver and the language model are both simulated,
//! so no external services are required.

use anyhow::Context;
use clap::Parser;
use coevo_engine::{CoEvoConfig, CoEvoEngine, EngineError, GenerationReport, RunSummary};
use coevo_evaluator::TracingMetricsSink;
use coevo_oracle::{KnowledgeWorld, WorldExecutionOracle, WorldSynthesisOracle};
use std::path::PathBuf;
use std::sync::Arc;

const PROBLEM: &str = "Which incidents does the household insurance contract settle?";
const DEFAULT_WORLD_SEED: u64 = 7;

/// CoCoEvo demo
#[derive(Parser)]
#[command(name = "coevo-demo")]
#[command(about = "Co-evolve logic programs and test queries", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file; the demo preset is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of generations
    #[arg(short, long)]
    generations: Option<usize>,

    /// Seed for the engine and the simulated language model
    #[arg(short, long)]
    seed: Option<u64>,

    /// Probability that the simulated model misspells a predicate
    #[arg(long, default_value_t = 0.2)]
    vocab_noise: f64,

    /// Probability that the simulated model gets an answer wrong
    #[arg(long, default_value_t = 0.3)]
    logic_noise: f64,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,

    /// Forward per-program fitness records to the log
    #[arg(long)]
    trace_metrics: bool,
}

// ── Formatting Helpers ──────────────────────────────────────────────────

const BANNER: &str = r#"
 ╔══════════════════════════════════════════════════════════════╗
 ║              CoCoEvo  --  Co-evolution Demo                  ║
 ║                                                              ║
 ║   Programs and tests evolve together: vocabulary first,      ║
 ║   then logic, culled on the Pareto front.                    ║
 ╚══════════════════════════════════════════════════════════════╝
"#;

fn section(title: &str) {
    let width: usize = 60;
    let pad = width.saturating_sub(title.len() + 4);
    let left = pad / 2;
    let right = pad - left;
    println!();
    println!(" ┌{}┐", "─".repeat(width));
    println!(" │{}  {}  {}│", " ".repeat(left), title, " ".repeat(right));
    println!(" └{}┘", "─".repeat(width));
}

fn ok(msg: &str) {
    println!("   [OK]  {}", msg);
}

fn info(msg: &str) {
    println!("   [--]  {}", msg);
}

fn warn(msg: &str) {
    println!("   [!!]  {}", msg);
}

// ── Main ────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    if !cli.json {
        println!("{}", BANNER);
    }

    if let Err(e) = run_demo(cli).await {
        eprintln!();
        eprintln!("   [FATAL]  Demo failed: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CoEvoConfig> {
    let mut config = match &cli.config {
        Some(path) => CoEvoConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CoEvoConfig::demo(),
    };
    if let Some(generations) = cli.generations {
        config = config.with_generations(generations);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

async fn run_demo(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let world_seed = config.rng_seed.unwrap_or(DEFAULT_WORLD_SEED);

    if !cli.json {
        section("Configuration");
        info(&format!(
            "generations={}  programs={}  tests={}  reseeds={}",
            config.max_generations,
            config.pop_cap_programs,
            config.pop_cap_tests,
            config.max_reseed_attempts
        ));
        info(&format!(
            "crossover {:.2} -> {:.2}  tournament={}  pareto={:?}",
            config.crossover_min, config.crossover_max, config.tournament_size, config.pareto_mode
        ));
        info(&format!(
            "vocab_noise={:.2}  logic_noise={:.2}  seed={}",
            cli.vocab_noise, cli.logic_noise, world_seed
        ));
    }

    let synthesis = WorldSynthesisOracle::new(KnowledgeWorld::insurance(), world_seed)
        .with_vocab_noise(cli.vocab_noise)
        .with_logic_noise(cli.logic_noise);
    let mut engine = CoEvoEngine::new(
        PROBLEM,
        config,
        Arc::new(WorldExecutionOracle::new()),
        Arc::new(synthesis),
    )?;
    if cli.trace_metrics {
        engine = engine.with_metrics_sink(Arc::new(TracingMetricsSink));
    }
    tracing::debug!(world_seed, trace_metrics = cli.trace_metrics, "engine ready");

    if !cli.json {
        section("Stage 1 + Stage 2");
    }
    let summary = match engine.run().await {
        Ok(summary) => summary,
        Err(e @ EngineError::AlignmentExhausted { .. }) => {
            warn("the simulated model never produced a compatible vocabulary");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for report in &summary.generations {
        print_generation(report);
    }
    print_summary(&summary, engine.metrics().spawn_success_rate());
    Ok(())
}

fn print_generation(report: &GenerationReport) {
    ok(&format!(
        "gen {:>3}  ratio={:.2}  children={}/{}  tests+={}  champion={:.3}  pop={}/{}",
        report.generation,
        report.crossover_ratio,
        report.children_added,
        report.crossover_requested + report.mutation_requested,
        report.tests_added,
        report.champion_fitness,
        report.programs_after_cull,
        report.tests_after_cull
    ));
}

fn print_summary(summary: &RunSummary, spawn_rate: f64) {
    section("Summary");
    info(&format!("Reseeds used     : {}", summary.reseeds_used));
    info(&format!("Spawn success    : {:.1}%", spawn_rate * 100.0));
    match summary.champion() {
        Some(champion) => ok(&format!(
            "Champion {}  logic={:.3}  vocab={:.3}",
            champion.id, champion.logic_fitness, champion.vocab_fitness
        )),
        None => warn("no programs survived"),
    }
    println!();
    print!("{}", summary);
}
