use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use std::io::{stdin, stdout, Stdin, Write};
use std::path::PathBuf;

use connect4_minimax::arena::{Arena, Contender};
use connect4_minimax::config::EngineConfig;
use connect4_minimax::game::{Game, GameState};
use connect4_minimax::{Error, Piece};

mod terminal;

/// Play Connect 4 against a minimax search
#[derive(Parser)]
#[command(name = "connect4", about = "Play Connect 4 against a minimax search")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect4.toml")]
    config: PathBuf,

    /// Override the search depth
    #[arg(long, allow_negative_numbers = true)]
    depth: Option<i64>,

    /// Override the tie-break seed
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play against the computer (default)
    Play,
    /// Play computer games against each other
    Arena {
        /// Number of games to play
        #[arg(long, default_value_t = 100)]
        games: u32,

        /// Search depth of the first contender
        #[arg(long, default_value_t = 4)]
        depth_a: usize,

        /// Search depth of the second contender, random moves if not given
        #[arg(long)]
        depth_b: Option<usize>,

        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = EngineConfig::load_or_default(&cli.config)?;
    if let Some(depth) = cli.depth {
        config.depth = depth;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => play(config),
        Command::Arena {
            games,
            depth_a,
            depth_b,
            quiet,
        } => {
            let second = match depth_b {
                Some(depth) => Contender::Engine { depth },
                None => Contender::Random,
            };
            let first = Contender::Engine { depth: depth_a };
            let tally = Arena::new(config, first, second)
                .with_progress(!quiet)
                .run(games)?;

            println!(
                "{:?} vs {:?} over {} games: {} wins, {} losses, {} draws",
                first,
                second,
                tally.games(),
                tally.first_wins,
                tally.second_wins,
                tally.draws
            );
            Ok(())
        }
    }
}

fn ask_yes_no(stdin: &Stdin, question: &str) -> Result<bool> {
    loop {
        let mut buffer = String::new();
        print!("{} y/n: ", question);
        stdout().flush().context("failed to flush to stdout")?;
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

fn play(config: EngineConfig) -> Result<()> {
    let stdin = stdin();
    let mut engine = config.engine();
    let mut game = Game::new(&config)?;

    println!("Welcome to Connect 4\n");

    loop {
        terminal::display(&game)?;

        match game.state() {
            GameState::Playing => {
                if game.is_computer_turn() {
                    println!("Computer is thinking...");
                    stdout().flush().context("failed to flush to stdout")?;

                    match game.computer_move(&mut engine)? {
                        Some(result) => {
                            if let Some(column) = result.column {
                                println!("Computer plays: {}", column + 1);
                            }
                            if result.is_decisive() {
                                println!("Computer sees a forced result: {}", result.score);
                            }
                        }
                        None => println!("Computer has no move"),
                    }
                    continue;
                }

                print!("Move input > ");
                stdout().flush().context("failed to flush to stdout")?;
                let mut input_str = String::new();
                stdin.read_line(&mut input_str)?;

                let column = match input_str.trim().parse::<usize>() {
                    Ok(column @ 1..=usize::MAX) => column - 1,
                    _ => {
                        println!("Invalid number: {}", input_str.trim());
                        continue;
                    }
                };
                match game.play(column) {
                    Ok(_) => {}
                    Err(Error::InvalidMove { reason, .. }) => {
                        println!("Invalid move, column {} {}", column + 1, reason);
                    }
                    Err(err) => return Err(err.into()),
                }
            }

            // end states
            state => {
                match state {
                    GameState::Won { piece, .. } if piece == game.human() => println!("You win!"),
                    GameState::Won { .. } => println!("Computer wins!"),
                    _ => println!("Draw!"),
                }
                let score = game.scoreboard();
                let (human, computer) = match game.human() {
                    Piece::PlayerA => (score.player_a, score.player_b),
                    _ => (score.player_b, score.player_a),
                };
                println!(
                    "Score: you {}, computer {}, draws {}",
                    human, computer, score.draws
                );

                if !ask_yes_no(&stdin, "Play again?")? {
                    break;
                }
                game.reset();
            }
        }
    }
    Ok(())
}
