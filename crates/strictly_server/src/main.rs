//! Strictly Server - unified CLI

use anyhow::{Context, Result};
use clap::Parser;
use strictly_checkers::{initial_state, GameState, Move, RulesConfig, TurnPolicy};
use strictly_server::cli::{Cli, Command};
use strictly_server::{serve, ServerConfig};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            free_turns,
        } => run_server(config, host, port, free_turns).await,
        Command::Board => {
            print!("{}", initial_state().board().display());
            Ok(())
        }
        Command::Replay { file, free_turns } => run_replay(file, free_turns),
    }
}

fn rules(free_turns: bool) -> RulesConfig {
    RulesConfig {
        turn_policy: if free_turns {
            TurnPolicy::Free
        } else {
            TurnPolicy::Strict
        },
        ..RulesConfig::default()
    }
}

/// Run the HTTP session server
#[instrument(skip_all)]
async fn run_server(
    config_path: Option<std::path::PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    free_turns: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ServerConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    }
    .with_env_overrides()?;

    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if free_turns {
        config = config.with_rules(rules(true));
    }

    info!(?config, "Starting Strictly Checkers server");
    serve(config).await
}

/// Replay a move file and print the final position
#[instrument(skip_all, fields(file = %file.display()))]
fn run_replay(file: std::path::PathBuf, free_turns: bool) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
    let moves: Vec<Move> = serde_json::from_str(&content).context("parsing move list")?;

    let state = GameState::replay(rules(free_turns), &moves).context("replaying moves")?;

    print!("{}", state.board().display());
    println!(
        "moves: {}  captured white: {}  captured black: {}",
        state.version(),
        state.captured().white,
        state.captured().black
    );
    if let Some(turn) = state.turn() {
        println!("to move: {}", turn);
    }
    Ok(())
}
