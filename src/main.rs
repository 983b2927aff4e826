//! Warroom -- compiles a turn's combat orders into battle rosters.
//!
//! Reads the galaxy snapshot and each species' order file, writes the
//! compiled rosters as JSON, applies recorded betrayals, and saves the
//! galaxy back unless running in test mode or the turn is refused.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use warroom::galaxy::{Galaxy, SpeciesId};
use warroom::pass::BetrayalLedger;
use warroom::roster::BattleRecord;
use warroom::transcript::MemoryTranscript;
use warroom::turn::{self, AlwaysCommit, CommitGate, RecordedBetrayals};
use warroom::CompileConfig;

/// Compile combat orders into battle rosters.
#[derive(Parser, Debug)]
#[command(name = "warroom", version, about)]
struct Cli {
    /// Galaxy snapshot (JSON).
    #[arg(long)]
    galaxy: PathBuf,

    /// Directory holding order files named spNN.ord.
    #[arg(long)]
    orders: PathBuf,

    /// New participants get summary-only battle reports.
    #[arg(short, long)]
    summary: bool,

    /// Ask for confirmation before saving the galaxy.
    #[arg(short, long)]
    prompt: bool,

    /// Test mode: never save the galaxy.
    #[arg(short, long)]
    test: bool,

    /// Debug-level logging.
    #[arg(short, long)]
    verbose: bool,

    /// Compile the strike section instead of the combat section.
    #[arg(long)]
    strike: bool,

    /// Seed for haven placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Betrayals reported by the tactical resolver (JSON list).
    #[arg(long)]
    betrayals: Option<PathBuf>,

    /// Where to write the compiled rosters (default: stdout).
    #[arg(long)]
    rosters: Option<PathBuf>,

    /// Directory for per-species transcript files.
    #[arg(long)]
    logs: Option<PathBuf>,

    /// Species to process (default: all active species).
    species: Vec<u16>,
}

/// Confirms the turn on stdin.
struct PromptGate;

impl CommitGate for PromptGate {
    fn approve(&mut self, battles: &[BattleRecord], betrayals: &BetrayalLedger) -> bool {
        eprint!(
            "{} battles, {} betrayals. Save changes? (y/N) ",
            battles.len(),
            betrayals.len()
        );
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes" | "YES")
    }
}

fn read_orders(dir: &Path, selection: &[SpeciesId]) -> io::Result<BTreeMap<SpeciesId, String>> {
    let mut orders = BTreeMap::new();
    for &species in selection {
        let path = dir.join(format!("sp{:02}.ord", species.0));
        match fs::read_to_string(&path) {
            Ok(text) => {
                orders.insert(species, text);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(%species, "no order file");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(orders)
}

fn read_betrayals(path: Option<&Path>) -> Result<BetrayalLedger, String> {
    let Some(path) = path else {
        return Ok(BetrayalLedger::new());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))
}

fn run(cli: Cli) -> Result<(), String> {
    let mut galaxy = Galaxy::load(&cli.galaxy).map_err(|e| e.to_string())?;

    let selection: Vec<SpeciesId> = if cli.species.is_empty() {
        turn::default_selection(&galaxy)
    } else {
        cli.species.iter().copied().map(SpeciesId).collect()
    };
    let orders = read_orders(&cli.orders, &selection).map_err(|e| e.to_string())?;
    let mut resolver = RecordedBetrayals(read_betrayals(cli.betrayals.as_deref())?);

    let config = CompileConfig {
        default_summary: cli.summary,
        strike_phase: cli.strike,
        seed: cli.seed,
        ..CompileConfig::default()
    };

    let mut transcript = MemoryTranscript::new();
    let mut gate: Box<dyn CommitGate> = if cli.prompt {
        Box::new(PromptGate)
    } else {
        Box::new(AlwaysCommit)
    };

    let result = turn::run_turn(
        &mut galaxy,
        &orders,
        &selection,
        &config,
        &mut resolver,
        gate.as_mut(),
        &mut transcript,
    );

    if let Some(dir) = &cli.logs {
        transcript
            .append_to_dir(dir)
            .map_err(|e| format!("{}: {}", dir.display(), e))?;
    }
    let report = result.map_err(|e| e.to_string())?;

    let json = serde_json::to_string_pretty(&report.battles).map_err(|e| e.to_string())?;
    match &cli.rosters {
        Some(path) => fs::write(path, json).map_err(|e| format!("{}: {}", path.display(), e))?,
        None => println!("{}", json),
    }

    if report.committed && !cli.test {
        galaxy.save(&cli.galaxy).map_err(|e| e.to_string())?;
        info!(path = %cli.galaxy.display(), "galaxy saved");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("warroom: {}", e);
            ExitCode::FAILURE
        }
    }
}
