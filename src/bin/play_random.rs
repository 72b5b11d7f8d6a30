use std::io::stderr;

use chess_rules::{ClickOutcome, MoveOutcome, Position, Session, SessionConfig};
use clap::Parser;
use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use tracing::{Level, info, warn};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::{filter::Targets, prelude::*, registry, util::SubscriberInitExt};

/// Random playout driver.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Verbosity level.
    #[arg(short, long, default_value_t = Level::INFO)]
    verbosity: Level,

    /// Number of half moves to play.
    #[arg(short, long, default_value_t = 40)]
    moves: usize,

    /// Seed for the move picker.
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Starting board field; the standard setup when omitted.
    #[arg(long)]
    position: Option<String>,

    /// Disable castling.
    #[arg(long)]
    no_castling: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = Targets::new()
        .with_target("chess_rules", cli.verbosity)
        .with_default(Level::WARN);
    registry()
        .with(filter)
        .with(layer().with_writer(stderr))
        .init();

    let config = match &cli.position {
        Some(position) => SessionConfig::from_position(position.as_str()),
        None => SessionConfig::default(),
    }
    .with_castling(!cli.no_castling);

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "cannot start from the given position");
            std::process::exit(2);
        }
    };

    let mut rng = StdRng::seed_from_u64(cli.seed);

    for _ in 0..cli.moves {
        let side = session.side_to_move();
        let movable: Vec<(Position, Vec<Position>)> = session
            .current_board()
            .pieces(side)
            .into_iter()
            .map(|(pos, _)| (pos, session.legal_destinations(&pos).to_vec()))
            .filter(|(_, destinations)| !destinations.is_empty())
            .collect();

        let Some((src, destinations)) = movable.choose(&mut rng) else {
            info!(%side, "no pseudo-legal move left");
            break;
        };
        let Some(dst) = destinations.choose(&mut rng) else {
            break;
        };

        if session.click(*src) != ClickOutcome::Selected(*src) {
            warn!(%src, "selection refused");
            break;
        }
        if !matches!(
            session.click(*dst),
            ClickOutcome::Move(MoveOutcome::Moved(_))
        ) {
            warn!(%src, %dst, "move refused");
            break;
        }
    }

    println!("{}", session.current_board());
    println!("{}", session.to_fen());
    println!("{}", session.move_list().to_pgn_movetext());
}
