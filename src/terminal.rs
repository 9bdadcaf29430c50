use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_minimax::game::{Game, GameState};
use connect4_minimax::{Coord, Piece};

/// Draws the board below the cursor, highlighting a winning run
pub fn display(game: &Game) -> Result<()> {
    let board = game.board();
    let mut stdout = stdout();

    let cols: String = (1..=board.cols()).map(|x| (x % 10).to_string()).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;
    for _ in 0..board.rows() {
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;

    let (origin_x, origin_y) = crossterm::cursor::position()?;
    let window = match game.state() {
        GameState::Won { window, .. } => Some(window),
        _ => None,
    };

    for row in 0..board.rows() {
        for col in 0..board.cols() {
            // origin is the line below the bottom row
            let (pos_x, pos_y) = (
                origin_x + col as u16,
                origin_y - (board.rows() - row) as u16,
            );
            let highlighted = window.map_or(false, |w| w.contains(Coord::new(row, col)));

            stdout
                .queue(MoveTo(pos_x, pos_y))?
                .queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(if highlighted {
                            Color::DarkGreen
                        } else {
                            Color::DarkBlue
                        })
                        .with(match board.get(row, col) {
                            Piece::PlayerA => Color::Red,
                            Piece::PlayerB => Color::Yellow,
                            Piece::Empty => Color::DarkBlue,
                        }),
                ))?;
        }
    }
    stdout
        .queue(MoveTo(origin_x, origin_y))?
        .queue(PrintStyledContent(style("\n")))?;
    stdout.flush()?;
    Ok(())
}
