//! HeatShield CLI
//!
//! Commands:
//! - run: process NDJSON sensor samples into risk assessments
//! - context: apply a context update (shade, exertion, hydration) to a state file
//! - profile: apply a partial profile update to a profile file
//! - status: print the current risk snapshot from a state file
//!
//! Profile and state live in JSON files between invocations; the files stand
//! in for the record-store collaborator, and nudges go to stderr in place of
//! the alert topic.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use heatshield::nudge::{self, NudgeSink};
use heatshield::{
    ContextUpdate, EngineConfig, EngineError, ProfileUpdate, RiskEngine, SensorReading,
    UserProfile, UserState, ENGINE_VERSION,
};

/// HeatShield - Personalized heat-stress risk engine
#[derive(Parser)]
#[command(name = "heatshield")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Assess heat-stress risk from ambient sensor samples", long_about = None)]
struct Cli {
    /// Engine configuration file (JSON); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process NDJSON sensor samples into risk assessments
    Run {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// User profile file (JSON); a missing file means the default profile
        #[arg(long)]
        profile: Option<PathBuf>,

        /// User state file (JSON); created on first run
        #[arg(long)]
        state: PathBuf,

        /// Suppress nudge output on stderr
        #[arg(long)]
        quiet: bool,
    },

    /// Apply a context update to a state file
    Context {
        /// User state file (JSON); created if absent
        #[arg(long)]
        state: PathBuf,

        /// Whether the user is currently shaded
        #[arg(long)]
        in_shade: Option<bool>,

        /// Activity intensity (clamped to 1-5)
        #[arg(long)]
        exertion: Option<i64>,

        /// Record a hydration event now
        #[arg(long)]
        hydrated: bool,
    },

    /// Apply a partial profile update to a profile file
    Profile {
        /// User profile file (JSON); created if absent
        #[arg(long)]
        profile: PathBuf,

        /// Update document, e.g. '{"clothing": "heavy", "coefficients": {"solar": 5.0}}'
        #[arg(long)]
        set: String,
    },

    /// Print the current risk snapshot from a state file
    Status {
        /// User state file (JSON)
        #[arg(long)]
        state: PathBuf,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("Bad input line {line}: {reason}")]
    BadLine { line: usize, reason: String },
}

/// One output record per processed sample: the reading plus derived values,
/// shaped like the persisted reading row.
#[derive(Serialize)]
struct AssessmentRecord<'a> {
    site_id: &'a str,
    device_id: &'a str,
    ts: i64,
    temp_c: f64,
    rh_pct: f64,
    hi_f: f64,
    hi_eff_f: f64,
    bucket: &'static str,
    next_break_eta_min: u32,
    nudged: bool,
}

/// Demonstration alert channel: nudges land on stderr
struct StderrSink;

impl NudgeSink for StderrSink {
    fn publish(&mut self, subject: &str, message: &str) -> Result<(), EngineError> {
        eprintln!("[{subject}] {message}");
        Ok(())
    }
}

/// Discarding alert channel for --quiet
struct NullSink;

impl NudgeSink for NullSink {
    fn publish(&mut self, _subject: &str, _message: &str) -> Result<(), EngineError> {
        Ok(())
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let engine = RiskEngine::new(config);

    match cli.command {
        Commands::Run {
            input,
            output,
            profile,
            state,
            quiet,
        } => cmd_run(&engine, &input, &output, profile.as_deref(), &state, quiet),
        Commands::Context {
            state,
            in_shade,
            exertion,
            hydrated,
        } => cmd_context(&engine, &state, in_shade, exertion, hydrated),
        Commands::Profile { profile, set } => cmd_profile(&engine, &profile, &set),
        Commands::Status { state } => cmd_status(&state),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(EngineConfig::from_json(&json)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_state(path: &Path) -> Result<UserState, CliError> {
    if path.exists() {
        let json = fs::read_to_string(path)?;
        Ok(UserState::from_json(&json)?)
    } else {
        Ok(UserState::default())
    }
}

fn save_state(path: &Path, state: &UserState) -> Result<(), CliError> {
    fs::write(path, state.to_json()?)?;
    Ok(())
}

fn load_profile(path: Option<&Path>) -> Result<UserProfile, CliError> {
    match path {
        Some(path) if path.exists() => {
            let json = fs::read_to_string(path)?;
            Ok(UserProfile::from_json(&json)?)
        }
        // Missing profile resolves to defaults, never an error
        _ => Ok(UserProfile::default()),
    }
}

fn cmd_run(
    engine: &RiskEngine,
    input: &Path,
    output: &Path,
    profile_path: Option<&Path>,
    state_path: &Path,
    quiet: bool,
) -> Result<(), CliError> {
    let profile = load_profile(profile_path)?;
    let mut state = load_state(state_path)?;

    let mut sink: Box<dyn NudgeSink> = if quiet {
        Box::new(NullSink)
    } else {
        Box::new(StderrSink)
    };

    let stdin = io::stdin();
    let reader: Box<dyn BufRead> = if input == Path::new("-") {
        Box::new(stdin.lock())
    } else {
        Box::new(io::BufReader::new(fs::File::open(input)?))
    };

    let stdout = io::stdout();
    let mut writer: Box<dyn Write> = if output == Path::new("-") {
        Box::new(stdout.lock())
    } else {
        Box::new(io::BufWriter::new(fs::File::create(output)?))
    };

    let mut processed = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut reading: SensorReading =
            serde_json::from_str(&line).map_err(|e| CliError::BadLine {
                line: index + 1,
                reason: e.to_string(),
            })?;
        if reading.site_id.is_empty() {
            reading.site_id = engine.config().site_id.clone();
        }

        let outcome = engine.process_sample(&reading, &profile, state);
        state = outcome.state;

        if outcome.should_nudge {
            nudge::deliver(sink.as_mut(), outcome.assessment.risk_bucket);
        }

        let record = AssessmentRecord {
            site_id: &reading.site_id,
            device_id: &reading.device_id,
            ts: reading.timestamp,
            temp_c: reading.temperature_c,
            rh_pct: reading.relative_humidity_pct,
            hi_f: outcome.hi_base_f,
            hi_eff_f: outcome.assessment.hi_nowcast_f,
            bucket: outcome.assessment.risk_bucket.as_str(),
            next_break_eta_min: outcome.assessment.next_break_eta_minutes,
            nudged: outcome.should_nudge,
        };
        serde_json::to_writer(&mut writer, &record)?;
        writeln!(writer)?;
        processed += 1;
    }
    writer.flush()?;

    save_state(state_path, &state)?;
    info!(processed, state = %state_path.display(), "run complete");
    Ok(())
}

fn cmd_context(
    engine: &RiskEngine,
    state_path: &Path,
    in_shade: Option<bool>,
    exertion: Option<i64>,
    hydrated: bool,
) -> Result<(), CliError> {
    let state = load_state(state_path)?;
    let update = ContextUpdate {
        in_shade,
        exertion_level: exertion,
        hydrated_now: hydrated,
    };
    let state = engine.update_context(state, &update);
    save_state(state_path, &state)?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn cmd_profile(engine: &RiskEngine, profile_path: &Path, set: &str) -> Result<(), CliError> {
    let profile = load_profile(Some(profile_path))?;
    let update: ProfileUpdate = serde_json::from_str(set)?;
    let profile = engine.update_profile(profile, &update);
    fs::write(
        profile_path,
        serde_json::to_string_pretty(&profile)?,
    )?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

fn cmd_status(state_path: &Path) -> Result<(), CliError> {
    if !state_path.exists() {
        warn!(state = %state_path.display(), "no state recorded yet");
        println!("{{\"message\": \"no data yet\"}}");
        return Ok(());
    }
    let state = load_state(state_path)?;
    let snapshot = serde_json::json!({
        "time": state.updated_at,
        "hi_nowcast_f": state.hi_nowcast_f,
        "bucket": state.risk_bucket.map(|b| b.as_str()).unwrap_or("Green"),
        "next_break_eta_min": state.next_break_eta_minutes,
        "duration_load": state.duration_load,
        "thermal_load": state.thermal_load,
        "since_hydration_min": state.since_hydration_minutes,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot)?
    );
    Ok(())
}
