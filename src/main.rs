//! Command line entry point for the tournament engines
//!
//! Reads rosters, results and ratings as JSON files, runs the requested
//! engine and prints the result as JSON on stdout. Logs go to stderr.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tournament_engine::config::AppConfig;
use tournament_engine::tournament::{apply_round, GameResult, RoundScoring};
use tournament_engine::{
    generate_pairings, Glicko2Calculator, OpponentResult, PairingResult, Player, Rating,
    RatingCalculator,
};
use tracing::{debug, info};

/// Tournament Engine - Swiss pairings and Glicko-2 ratings for Go tournaments
#[derive(Parser)]
#[command(
    name = "tournament-engine",
    version,
    about = "Swiss-system pairing and Glicko-2 rating engines for Go tournaments",
    long_about = "Generates Swiss-system round pairings from a roster snapshot, applies \
                 finished rounds back to the roster, and updates Glicko-2 ratings over a \
                 rating period. All inputs and outputs are JSON."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        global = true,
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        global = true,
        help = "Validate configuration and exit without running a command"
    )]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Pair the next round of a roster
    Pair {
        /// Roster JSON file (array of players)
        #[arg(short, long, value_name = "FILE")]
        roster: PathBuf,
    },
    /// Apply a finished round's results and print the next roster
    CloseRound {
        /// Roster JSON file the round was paired from
        #[arg(short, long, value_name = "FILE")]
        roster: PathBuf,
        /// Pairing result JSON file produced by `pair`
        #[arg(short, long, value_name = "FILE")]
        pairing: PathBuf,
        /// Game results JSON file (array of table results)
        #[arg(long, value_name = "FILE")]
        results: PathBuf,
    },
    /// Rate one player over a rating period
    Rate {
        /// JSON file with `current` rating and `opponents` results
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
    /// Expected score of one rating against another
    Expected {
        /// Player as rating,deviation,volatility
        #[arg(long, value_name = "R,D,V")]
        player: String,
        /// Opponent as rating,deviation,volatility
        #[arg(long, value_name = "R,D,V")]
        opponent: String,
    },
}

/// Input of the `rate` command
#[derive(Deserialize)]
struct RateInput {
    current: Rating,
    #[serde(default)]
    opponents: Vec<OpponentResult>,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration from file or environment and apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    tournament_engine::config::validate_config(&config)?;
    Ok(config)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn parse_rating(value: &str) -> Result<Rating> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| anyhow!("Invalid rating '{}', expected rating,deviation,volatility", value))?;

    match parts.as_slice() {
        [rating, deviation, volatility] => Ok(Rating::new(*rating, *deviation, *volatility)),
        _ => Err(anyhow!(
            "Invalid rating '{}', expected rating,deviation,volatility",
            value
        )),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Pair { roster } => {
            let roster: Vec<Player> = read_json(&roster)?;
            let result = generate_pairings(&roster, &config.pairing)?;
            info!(
                tables = result.pairings.len(),
                bye = ?result.bye,
                penalty = result.penalty,
                "Round paired"
            );
            print_json(&result)
        }
        Command::CloseRound {
            roster,
            pairing,
            results,
        } => {
            let roster: Vec<Player> = read_json(&roster)?;
            let pairing: PairingResult = read_json(&pairing)?;
            let results: Vec<GameResult> = read_json(&results)?;
            let next = apply_round(&roster, &pairing, &results, &RoundScoring::default())?;
            info!(players = next.len(), "Round closed");
            print_json(&next)
        }
        Command::Rate { input } => {
            let input: RateInput = read_json(&input)?;
            let calculator = Glicko2Calculator::new(config.rating.clone())?;
            let update = calculator.rate_player(&input.current, &input.opponents)?;
            info!(
                games = input.opponents.len(),
                rating_delta = update.rating_delta,
                "Rating period closed"
            );
            print_json(&update)
        }
        Command::Expected { player, opponent } => {
            let player = parse_rating(&player)?;
            let opponent = parse_rating(&opponent)?;
            let calculator = Glicko2Calculator::new(config.rating.clone())?;
            print_json(&serde_json::json!({
                "expectedScore": calculator.expected_score(&player, &opponent)
            }))
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    debug!(service = %config.service.name, "Configuration loaded");

    if args.dry_run {
        info!("Configuration validation successful");
        print_json(&config)?;
        return Ok(());
    }

    match args.command {
        Some(command) => run(command, &config),
        None => Err(anyhow!("No command given, see --help")),
    }
}
