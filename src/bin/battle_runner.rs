//! Headless Battle Runner
//!
//! Fights a scenario from a TOML file and prints the result as JSON or text.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use kingdoms_battle::battle::{troop_total, BattleResult, Side};
use kingdoms_battle::core::error::Result;
use kingdoms_battle::scenario::load_scenario;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Headless Battle Runner - resolve a battle scenario
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Resolve a battle scenario and report the outcome")]
struct Args {
    /// Scenario file (see data/scenarios/)
    scenario: PathBuf,

    /// Random seed; overrides the scenario's own seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario's round budget
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print each phase as it is fought (stderr)
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport {
    scenario: String,
    seed: u64,
    attacker_remaining: u64,
    defender_remaining: u64,
    result: BattleResult,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut scenario = load_scenario(&args.scenario)?;
    if let Some(max_rounds) = args.max_rounds {
        scenario.max_rounds = max_rounds;
    }

    let seed = args
        .seed
        .or(scenario.seed)
        .unwrap_or_else(rand::random);
    let rng = ChaCha8Rng::seed_from_u64(seed);

    let result = {
        let mut battle = scenario.battle(rng)?;

        if args.verbose {
            let mut printed = 0;
            while !battle.is_finished() {
                let step = battle.step_phase();
                eprintln!("=== Round {} - {} ===", step.round, step.phase);
                for event in &battle.events()[printed..] {
                    eprintln!("  {:?}: {}", event.event_type, event.description);
                }
                printed = battle.events().len();
            }
        }

        battle.run_to_completion()
    };

    let remaining = |side: Side| troop_total(&scenario.side(side).units);
    let report = RunReport {
        scenario: scenario.name.clone(),
        seed,
        attacker_remaining: remaining(Side::Attacker),
        defender_remaining: remaining(Side::Defender),
        result,
    };

    match args.format.as_str() {
        "text" => print_text(&report),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn print_text(report: &RunReport) {
    let result = &report.result;
    let outcome = match result.winner {
        Some(side) if result.is_decisive => format!("{} (decisive)", side),
        Some(side) => side.to_string(),
        None => "draw".to_string(),
    };

    println!("Battle Result: {}", report.scenario);
    println!("=============");
    for line in &result.battle_log {
        println!("{}", line);
    }
    println!();
    println!("Winner: {}", outcome);
    println!("Ended by: {:?}", result.termination);
    println!(
        "Rounds: {} ({} phases)",
        result.rounds_fought, result.phases_fought
    );
    for (label, side, remaining) in [
        ("Attacker", Side::Attacker, report.attacker_remaining),
        ("Defender", Side::Defender, report.defender_remaining),
    ] {
        println!(
            "{} casualties: {} ({} remain)",
            label,
            result.casualties(side),
            remaining
        );
    }
    println!("Experience gained: {}", result.exp_gained);
    println!("Seed: {}", report.seed);
}
