#![deny(warnings)]

//! Headless driver: build or load a world, play turns, optionally save.

use anyhow::{Context, Result};
use persistence::{load_snapshot, save_snapshot, SnapshotFormat};
use sim_core::{validate_world, Scenario, SimConfig};
use sim_runtime::{TurnEngine, TurnSummary};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_TURNS: u32 = 20;

#[derive(Debug, Default, PartialEq)]
struct Args {
    scenario: Option<PathBuf>,
    turns: Option<u32>,
    seed: Option<u64>,
    save: Option<PathBuf>,
    load: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Args {
    let mut parsed = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => parsed.scenario = it.next().map(PathBuf::from),
            "--turns" => parsed.turns = it.next().and_then(|s| s.parse().ok()),
            "--seed" => parsed.seed = it.next().and_then(|s| s.parse().ok()),
            "--save" => parsed.save = it.next().map(PathBuf::from),
            "--load" => parsed.load = it.next().map(PathBuf::from),
            _ => {}
        }
    }
    parsed
}

fn load_scenario(path: Option<&PathBuf>) -> Result<Scenario> {
    let Some(path) = path else {
        return Ok(Scenario::standard());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let scenario: Scenario = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing scenario {}", path.display()))?;
    Ok(scenario)
}

fn build_engine(args: &Args) -> Result<TurnEngine> {
    let scenario = load_scenario(args.scenario.as_ref())?;
    let config = SimConfig {
        rng_seed: args.seed.unwrap_or(scenario.config.rng_seed),
        ..scenario.config
    };
    let world = match &args.load {
        Some(path) => load_snapshot(path, SnapshotFormat::from_path(path))
            .with_context(|| format!("loading snapshot {}", path.display()))?,
        None => Scenario { config, ..scenario }.build_world()?,
    };
    validate_world(&world)?;
    Ok(TurnEngine::new(world, config))
}

fn print_turn(summary: &TurnSummary, engine: &TurnEngine) {
    let w = engine.world();
    let player = w.player();
    println!(
        "turn {:>3} | events: {} | approval: {:.1} | autonomy: {:.1} | trust: {:.1}",
        summary.turn,
        summary.events.len(),
        player.map_or(0.0, |p| p.approval.get()),
        player.map_or(0.0, |p| p.autonomy.get()),
        player.map_or(0.0, |p| p.trust.get()),
    );
}

fn main() -> Result<()> {
    // Logging setup; RUST_LOG=debug shows skipped operations and decisions
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args(std::env::args().skip(1));
    info!(
        git_sha = env!("GIT_SHA"),
        build_date = env!("BUILD_DATE"),
        ?args,
        "starting CLI"
    );

    let mut engine = build_engine(&args)?;
    let turns = args.turns.unwrap_or(DEFAULT_TURNS);
    for _ in 0..turns {
        let Ok(summary) = engine.end_turn() else {
            break;
        };
        print_turn(&summary, &engine);
        if summary.result.is_terminal() {
            break;
        }
    }

    let w = engine.world();
    let result = w.result();
    println!(
        "World | turn: {} | countries: {} | agents: {} | game over: {} | outcome: {:?} ({:?})",
        w.turn(),
        w.countries().len(),
        w.ais().len(),
        w.is_game_over(),
        result.outcome,
        result.reason,
    );
    for ai in w.ais() {
        println!(
            "  {:<8} {:<12} approval {:>5.1} autonomy {:>5.1} data {:>6.1} escaped {}",
            ai.id,
            ai.display_name,
            ai.approval.get(),
            ai.autonomy.get(),
            ai.data.get(),
            ai.has_escaped(),
        );
    }

    if let Some(path) = &args.save {
        save_snapshot(w, path, SnapshotFormat::from_path(path))
            .with_context(|| format!("saving snapshot {}", path.display()))?;
    }
    Ok(())
}
