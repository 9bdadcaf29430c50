#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::arena::{Arena, Contender};
    use crate::config::EngineConfig;
    use crate::evaluator::{Evaluator, ThreatPolicy};
    use crate::game::{Game, GameState, Scoreboard};
    use crate::scanner::{find_four, window_count, windows, winner, Coord, Direction};
    use crate::search::{SearchEngine, WIN_SCORE};
    use crate::{Board, Error, MoveRejection, Piece};

    fn coords(cells: &[(usize, usize)]) -> Vec<Coord> {
        cells.iter().map(|&c| c.into()).collect()
    }

    /// Plays up to `moves` random moves, stopping early if the game ends
    fn random_position(rng: &mut StdRng, moves: usize) -> Board {
        let mut board = Board::new();
        let mut piece = Piece::PlayerA;
        for _ in 0..moves {
            let valid = board.valid_moves();
            if valid.is_empty() || winner(&board).is_some() {
                break;
            }
            let column = valid[rng.gen_range(0..valid.len())];
            board = board.drop_piece(column, piece).unwrap();
            piece = piece.opponent();
        }
        board
    }

    /// Minimax without pruning, for checking the search scores
    fn full_minimax(
        evaluator: &Evaluator,
        board: &Board,
        depth: usize,
        maximizing: bool,
        piece: Piece,
    ) -> i32 {
        let valid = board.valid_moves();
        if find_four(board, piece).is_some() {
            return WIN_SCORE;
        }
        if find_four(board, piece.opponent()).is_some() {
            return -WIN_SCORE;
        }
        if depth == 0 || valid.is_empty() {
            return evaluator.evaluate(board, piece);
        }
        let mover = if maximizing { piece } else { piece.opponent() };
        let scores = valid.into_iter().map(|column| {
            let next = board.drop_piece(column, mover).unwrap();
            full_minimax(evaluator, &next, depth - 1, !maximizing, piece)
        });
        if maximizing {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    #[test]
    pub fn empty_board() -> Result<()> {
        let board = Board::new();
        assert_eq!(board.valid_moves(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(!board.is_full());
        assert_eq!(board.piece_count(), 0);

        let evaluator = Evaluator::default();
        assert_eq!(evaluator.evaluate(&board, Piece::PlayerA), 0);
        assert_eq!(evaluator.evaluate(&board, Piece::PlayerB), 0);
        assert_eq!(find_four(&board, Piece::PlayerA), None);
        Ok(())
    }

    #[test]
    pub fn drop_piece_lands_on_lowest_row() -> Result<()> {
        let board = Board::new();
        let next = board.drop_piece(3, Piece::PlayerA)?;
        let next = next.drop_piece(3, Piece::PlayerB)?;

        assert_eq!(next.get(5, 3), Piece::PlayerA);
        assert_eq!(next.get(4, 3), Piece::PlayerB);
        assert_eq!(next.open_row(3), Some(3));
        // the original board is untouched
        assert_eq!(board, Board::new());
        Ok(())
    }

    #[test]
    pub fn full_column() -> Result<()> {
        // column 0 filled with alternating pieces
        let board = Board::from_moves("111111")?;
        assert_eq!(board.valid_moves(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(board.open_row(0), None);

        for &piece in [Piece::PlayerA, Piece::PlayerB].iter() {
            assert_eq!(
                board.drop_piece(0, piece),
                Err(Error::InvalidMove {
                    column: 0,
                    reason: MoveRejection::ColumnFull
                })
            );
        }
        assert_eq!(
            board.drop_piece(7, Piece::PlayerA),
            Err(Error::InvalidMove {
                column: 7,
                reason: MoveRejection::OutOfRange
            })
        );
        assert!(board.drop_piece(1, Piece::Empty).is_err());
        Ok(())
    }

    #[test]
    pub fn move_legality() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let moves = rng.gen_range(0..42);
            let board = random_position(&mut rng, moves);
            let valid = board.valid_moves();
            for column in 0..board.cols() + 2 {
                let result = board.drop_piece(column, Piece::PlayerA);
                if valid.contains(&column) {
                    assert!(result.is_ok());
                } else {
                    assert!(result.map_err(|e| e.is_invalid_move()).unwrap_err());
                }
            }
            assert_eq!(board.is_full(), valid.is_empty());
        }
        Ok(())
    }

    #[test]
    pub fn full_board() -> Result<()> {
        let board = Board::from_rows(&[
            "AABBAAB", "BBAABBA", "AABBAAB", "BBAABBA", "AABBAAB", "BBAABBA",
        ])?;
        assert!(board.is_full());
        assert!(board.valid_moves().is_empty());
        assert_eq!(winner(&board), None);

        let mut engine = SearchEngine::seeded(Evaluator::default(), 0);
        let result = engine.choose_move(&board, 3, Piece::PlayerA)?;
        assert_eq!(result.column, None);
        // only the center bonus remains
        assert_eq!(result.score, 9);
        Ok(())
    }

    #[test]
    pub fn parse_positions() -> Result<()> {
        assert!(matches!(Board::from_moves("12a"), Err(Error::Parse(_))));
        assert!(Board::from_moves("8").unwrap_err().is_invalid_move());
        assert!(Board::from_moves("1111111").unwrap_err().is_invalid_move());

        // floating piece
        assert!(Board::from_rows(&["A..", "..."]).is_err());
        // ragged rows
        assert!(Board::from_rows(&["...", ".."]).is_err());
        assert!(Board::from_rows(&["..?"]).is_err());

        let board = Board::from_rows(&["....", "..B.", "A.A."])?;
        assert_eq!((board.rows(), board.cols()), (3, 4));
        assert_eq!(board.valid_moves(), vec![0, 1, 2, 3]);
        assert_eq!(board.open_row(2), Some(0));
        assert_eq!(board.to_string(), "....\n..B.\nA.A.\n");
        Ok(())
    }

    #[test]
    pub fn window_enumeration() -> Result<()> {
        let board = Board::new();
        let all: Vec<_> = windows(&board).collect();
        assert_eq!(all.len(), 69);
        assert_eq!(window_count(5, 5), 28);
        assert_eq!(window_count(3, 3), 0);
        assert_eq!(window_count(4, 7), 31);

        // phases come in scan order
        let directions: Vec<_> = all.iter().map(|w| w.direction).collect();
        let mut phases = directions.clone();
        phases.dedup();
        assert_eq!(phases, Direction::ALL.to_vec());
        assert_eq!(
            directions.iter().filter(|&&d| d == Direction::Vertical).count(),
            21
        );

        assert_eq!(all[0].cells.to_vec(), coords(&[(0, 0), (0, 1), (0, 2), (0, 3)]));
        // vertical windows go down each column before moving right
        assert_eq!(all[24].cells.to_vec(), coords(&[(0, 0), (1, 0), (2, 0), (3, 0)]));
        assert_eq!(all[25].cells.to_vec(), coords(&[(1, 0), (2, 0), (3, 0), (4, 0)]));
        assert_eq!(all[27].cells.to_vec(), coords(&[(0, 1), (1, 1), (2, 1), (3, 1)]));
        assert_eq!(all[45].cells.to_vec(), coords(&[(3, 0), (2, 1), (1, 2), (0, 3)]));
        assert_eq!(all[68].cells.to_vec(), coords(&[(2, 3), (3, 4), (4, 5), (5, 6)]));

        // every window is distinct
        let mut cells: Vec<_> = all.iter().map(|w| w.cells).collect();
        cells.sort_by_key(|c| c.iter().map(|x| (x.row, x.col)).collect::<Vec<_>>());
        cells.dedup();
        assert_eq!(cells.len(), 69);
        Ok(())
    }

    #[test]
    pub fn three_in_a_row() -> Result<()> {
        let board = Board::from_rows(&[
            ".......", ".......", ".......", ".......", ".......", "AAA....",
        ])?;
        assert_eq!(find_four(&board, Piece::PlayerA), None);

        let first = windows(&board)
            .find(|w| w.cells[0] == Coord::new(5, 0) && w.direction == Direction::Horizontal)
            .unwrap();
        assert_eq!(first.count(&board, Piece::PlayerA), 3);
        assert_eq!(first.count(&board, Piece::Empty), 1);

        // +10 for columns 0-3, +5 for columns 1-4
        let evaluator = Evaluator::default();
        assert_eq!(evaluator.evaluate(&board, Piece::PlayerA), 15);
        // the same three is a threat against PlayerB
        assert_eq!(evaluator.evaluate(&board, Piece::PlayerB), -80);
        Ok(())
    }

    #[test]
    pub fn four_in_a_row() -> Result<()> {
        let board = Board::from_rows(&[
            ".......", ".......", ".......", ".......", ".......", "AAAA...",
        ])?;
        let window = find_four(&board, Piece::PlayerA).unwrap();
        assert_eq!(window.direction, Direction::Horizontal);
        assert_eq!(
            window.cells.to_vec(),
            coords(&[(5, 0), (5, 1), (5, 2), (5, 3)])
        );
        assert_eq!(find_four(&board, Piece::PlayerB), None);
        assert_eq!(find_four(&board, Piece::Empty), None);
        Ok(())
    }

    #[test]
    pub fn scan_order() -> Result<()> {
        // horizontal is found before vertical
        let board = Board::from_rows(&[
            ".......", ".......", "A......", "A......", "A......", "AAAA...",
        ])?;
        let window = find_four(&board, Piece::PlayerA).unwrap();
        assert_eq!(
            window.cells.to_vec(),
            coords(&[(5, 0), (5, 1), (5, 2), (5, 3)])
        );

        // diagonal up is found before diagonal down
        let board = Board::from_rows(&[
            ".......", ".......", "...A...", "..ABA..", ".ABABA.", "ABABABA",
        ])?;
        let window = find_four(&board, Piece::PlayerA).unwrap();
        assert_eq!(window.direction, Direction::DiagonalUp);
        assert_eq!(
            window.cells.to_vec(),
            coords(&[(5, 0), (4, 1), (3, 2), (2, 3)])
        );

        let board = Board::from_rows(&[
            ".......", ".......", "...A...", "..ABA..", ".ABABA.", "BBABABA",
        ])?;
        let window = find_four(&board, Piece::PlayerA).unwrap();
        assert_eq!(window.direction, Direction::DiagonalDown);
        assert_eq!(
            window.cells.to_vec(),
            coords(&[(2, 3), (3, 4), (4, 5), (5, 6)])
        );
        assert_eq!(find_four(&board, Piece::PlayerB), None);
        Ok(())
    }

    #[test]
    pub fn vertical_run() -> Result<()> {
        let board = Board::from_moves("1212121")?;
        let (piece, window) = winner(&board).unwrap();
        assert_eq!(piece, Piece::PlayerA);
        assert_eq!(window.direction, Direction::Vertical);
        assert_eq!(
            window.cells.to_vec(),
            coords(&[(2, 0), (3, 0), (4, 0), (5, 0)])
        );
        Ok(())
    }

    #[test]
    pub fn small_boards() -> Result<()> {
        assert!(Board::with_dimensions(0, 7).is_err());

        // no room for a run, only the center bonus counts
        let board = Board::with_dimensions(3, 3)?
            .drop_piece(1, Piece::PlayerA)?
            .drop_piece(1, Piece::PlayerA)?
            .drop_piece(0, Piece::PlayerA)?;
        assert_eq!(find_four(&board, Piece::PlayerA), None);
        assert_eq!(Evaluator::default().evaluate(&board, Piece::PlayerA), 6);
        Ok(())
    }

    #[test]
    pub fn threat_policy() -> Result<()> {
        let board = Board::from_rows(&[
            ".......", ".......", ".......", ".......", ".......", "AAA....",
        ])?;
        let fixed = Evaluator::new(ThreatPolicy::Fixed(Piece::PlayerA));

        // evaluating for the fixed piece counts its own three as a threat too
        assert_eq!(fixed.evaluate(&board, Piece::PlayerA), 15 - 80);
        assert_eq!(fixed.evaluate(&board, Piece::PlayerB), -80);

        let mirrored = Board::from_rows(&[
            ".......", ".......", ".......", ".......", ".......", "BBB....",
        ])?;
        // not anti-symmetric: PlayerA never sees PlayerB's three
        assert_eq!(fixed.evaluate(&mirrored, Piece::PlayerA), 0);
        let symmetric = Evaluator::default();
        assert_eq!(symmetric.evaluate(&mirrored, Piece::PlayerA), -80);
        assert_eq!(symmetric.evaluate(&mirrored, Piece::PlayerB), 15);
        Ok(())
    }

    #[test]
    pub fn evaluator_bounds() -> Result<()> {
        let (low, high) = Evaluator::bounds(6, 7);
        assert!(low > -WIN_SCORE && high < WIN_SCORE);

        let mut rng = StdRng::seed_from_u64(2);
        let evaluators = [
            Evaluator::default(),
            Evaluator::new(ThreatPolicy::Fixed(Piece::PlayerA)),
        ];
        let mut checked = 0;
        for _ in 0..500 {
            let moves = rng.gen_range(0..42);
            let board = random_position(&mut rng, moves);
            if winner(&board).is_some() {
                continue;
            }
            for evaluator in evaluators.iter() {
                for &piece in [Piece::PlayerA, Piece::PlayerB].iter() {
                    let score = evaluator.evaluate(&board, piece);
                    assert!(low <= score && score <= high, "{} out of bounds", score);
                }
            }
            checked += 1;
        }
        assert!(checked > 100);
        Ok(())
    }

    #[test]
    pub fn forced_win() -> Result<()> {
        let board = Board::from_rows(&[
            ".......", ".......", ".......", "...B...", "..AB...", ".AAB.A.",
        ])?;
        let mut engine = SearchEngine::seeded(Evaluator::default(), 5);

        let result = engine.choose_move(&board, 2, Piece::PlayerB)?;
        assert_eq!(result.column, Some(3));
        assert_eq!(result.score, WIN_SCORE);
        assert!(result.is_decisive());

        // the other side blocks
        let result = engine.choose_move(&board, 2, Piece::PlayerA)?;
        assert_eq!(result.column, Some(3));
        assert!(!result.is_decisive());
        Ok(())
    }

    #[test]
    pub fn block_three() -> Result<()> {
        let board = Board::from_moves("15253")?;
        let mut engine = SearchEngine::seeded(Evaluator::default(), 5);
        let result = engine.choose_move(&board, 4, Piece::PlayerB)?;
        assert_eq!(result.column, Some(3));
        assert_eq!(result.score, 13);
        assert!(engine.node_count > 1);
        Ok(())
    }

    #[test]
    pub fn immediate_wins_score_max() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(3);
        let mut engine = SearchEngine::seeded(Evaluator::default(), 3);
        let mut checked = 0;
        for _ in 0..300 {
            let moves = rng.gen_range(6..30);
            let board = random_position(&mut rng, moves);
            if winner(&board).is_some() {
                continue;
            }
            for &piece in [Piece::PlayerA, Piece::PlayerB].iter() {
                let wins: Vec<_> = board
                    .valid_moves()
                    .into_iter()
                    .filter(|&c| find_four(&board.drop_piece(c, piece).unwrap(), piece).is_some())
                    .collect();
                if wins.is_empty() {
                    continue;
                }
                let result = engine.choose_move(&board, 1, piece)?;
                assert_eq!(result.score, WIN_SCORE);
                assert_eq!(result.column, Some(wins[0]));

                let result = engine.choose_move(&board, 3, piece)?;
                assert_eq!(result.score, WIN_SCORE);
                checked += 1;
            }
        }
        assert!(checked > 10);
        Ok(())
    }

    #[test]
    pub fn pruning_matches_full_minimax() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(4);
        for evaluator in [
            Evaluator::default(),
            Evaluator::new(ThreatPolicy::Fixed(Piece::PlayerA)),
        ]
        .iter()
        {
            let mut engine = SearchEngine::seeded(*evaluator, 4);
            for _ in 0..40 {
                let moves = rng.gen_range(0..30);
                let board = random_position(&mut rng, moves);
                for depth in 0..=3 {
                    for &piece in [Piece::PlayerA, Piece::PlayerB].iter() {
                        let result = engine.choose_move(&board, depth, piece)?;
                        let expected = full_minimax(evaluator, &board, depth, true, piece);
                        assert_eq!(result.score, expected, "{}depth {}", board, depth);
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    pub fn static_evaluation_at_depth_zero() -> Result<()> {
        let board = Board::from_moves("111111")?;
        let mut engine = SearchEngine::with_rng(Evaluator::default(), StepRng::new(0, 0));
        let result = engine.choose_move(&board, 0, Piece::PlayerA)?;
        // the fallback column is the first legal one for a zero random source
        assert_eq!(result.column, Some(1));
        assert_eq!(result.score, 0);
        assert_eq!(engine.node_count, 1);
        Ok(())
    }

    #[test]
    pub fn decided_position() -> Result<()> {
        let board = Board::from_moves("1122334")?;
        let mut engine = SearchEngine::with_rng(Evaluator::default(), StepRng::new(0, 0));

        let result = engine.choose_move(&board, 3, Piece::PlayerB)?;
        assert_eq!(result.score, -WIN_SCORE);
        assert_eq!(result.column, Some(0));

        let result = engine.choose_move(&board, 3, Piece::PlayerA)?;
        assert_eq!(result.score, WIN_SCORE);
        Ok(())
    }

    #[test]
    pub fn seeded_search_is_reproducible() -> Result<()> {
        let board = Board::from_moves("4453")?;
        let mut first = SearchEngine::seeded(Evaluator::default(), 11);
        let mut second = SearchEngine::seeded(Evaluator::default(), 11);
        for depth in 0..4 {
            assert_eq!(
                first.choose_move(&board, depth, Piece::PlayerA)?,
                second.choose_move(&board, depth, Piece::PlayerA)?
            );
        }
        assert!(matches!(
            first.choose_move(&board, 2, Piece::Empty),
            Err(Error::Configuration(_))
        ));
        Ok(())
    }

    #[test]
    pub fn game_session() -> Result<()> {
        let mut game = Game::new(&EngineConfig::default())?;
        assert_eq!(game.to_move(), Piece::PlayerA);
        assert_eq!(game.human(), Piece::PlayerA);

        for &column in [0, 0, 1, 1, 2, 2].iter() {
            assert_eq!(game.play(column)?, GameState::Playing);
        }
        assert!(game.play(9).unwrap_err().is_invalid_move());
        // a rejected move doesn't pass the turn
        assert_eq!(game.to_move(), Piece::PlayerA);

        match game.play(3)? {
            GameState::Won { piece, window } => {
                assert_eq!(piece, Piece::PlayerA);
                assert_eq!(
                    window.cells.to_vec(),
                    coords(&[(5, 0), (5, 1), (5, 2), (5, 3)])
                );
            }
            state => panic!("unexpected state {:?}", state),
        }
        assert_eq!(game.moves(), "1122334");
        assert_eq!(game.play(4), Err(Error::GameOver));
        assert_eq!(
            game.scoreboard(),
            Scoreboard {
                player_a: 1,
                player_b: 0,
                draws: 0
            }
        );

        game.reset();
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.moves(), "");
        assert_eq!(game.scoreboard().player_a, 1);
        Ok(())
    }

    #[test]
    pub fn game_draw() -> Result<()> {
        let config = EngineConfig {
            rows: 2,
            cols: 2,
            ..EngineConfig::default()
        };
        let mut game = Game::new(&config)?;
        for &column in [0, 0, 1].iter() {
            assert_eq!(game.play(column)?, GameState::Playing);
        }
        assert_eq!(game.play(1)?, GameState::Draw);
        assert_eq!(game.scoreboard().draws, 1);

        let mut engine = SearchEngine::seeded(Evaluator::default(), 0);
        assert_eq!(game.computer_move(&mut engine), Err(Error::GameOver));
        Ok(())
    }

    #[test]
    pub fn computer_blocks() -> Result<()> {
        let config = EngineConfig {
            seed: Some(9),
            ..EngineConfig::default()
        };
        let mut engine = config.engine();
        let mut game = Game::new(&config)?;

        assert!(matches!(
            game.computer_move(&mut engine),
            Err(Error::Configuration(_))
        ));

        for &column in [0, 4, 1, 4, 2].iter() {
            game.play(column)?;
        }
        assert!(game.is_computer_turn());
        let result = game.computer_move(&mut engine)?.unwrap();
        assert_eq!(result.column, Some(3));
        assert_eq!(game.board().get(5, 3), Piece::PlayerB);
        assert_eq!(game.to_move(), Piece::PlayerA);
        Ok(())
    }

    #[test]
    pub fn arena() -> Result<()> {
        let config = EngineConfig {
            seed: Some(7),
            ..EngineConfig::default()
        };
        let arena = Arena::new(config, Contender::Engine { depth: 2 }, Contender::Random);

        let tally = arena.run(6)?;
        assert_eq!(tally.games(), 6);
        assert_eq!(arena.run(6)?, tally);

        let invalid = EngineConfig {
            depth: -3,
            ..EngineConfig::default()
        };
        let arena = Arena::new(invalid, Contender::Random, Contender::Random);
        assert!(arena.run(1).is_err());
        Ok(())
    }
}
