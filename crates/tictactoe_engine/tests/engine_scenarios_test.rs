//! Full-round scenarios for the game engine.

use tictactoe_engine::{Board, GameEngine, GameStatus, Mark, MoveIgnored, MoveOutcome};

fn play(engine: &mut GameEngine, indices: &[usize]) -> Vec<MoveOutcome> {
    indices
        .iter()
        .map(|&i| engine.apply_move(i).expect("index in range"))
        .collect()
}

#[test]
fn test_x_wins_on_main_diagonal() {
    let mut engine = GameEngine::new();
    let outcomes = play(&mut engine, &[0, 1, 4, 2, 8]);

    assert!(outcomes.iter().all(MoveOutcome::is_applied));
    assert_eq!(engine.status(), GameStatus::WonBy(Mark::X));
    assert_eq!(engine.winning_line().map(|l| l.indices()), Some([0, 4, 8]));
    assert_eq!(engine.score().get(Mark::X), 1);
    assert_eq!(engine.score().get(Mark::O), 0);
}

#[test]
fn test_full_board_without_line_is_draw() {
    let mut engine = GameEngine::new();
    // X O X / X O O / O X X
    play(&mut engine, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);

    assert!(engine.board().is_full());
    assert_eq!(engine.status(), GameStatus::Draw);
    assert_eq!(engine.winning_line(), None);
    assert_eq!(engine.score().total(), 0);
}

#[test]
fn test_o_completes_middle_row_before_board_fills() {
    // Sequence X@0, O@1, X@2, O@4, X@6, O@5, X@7, O@3, X@8: O's fourth
    // mark completes 3-4-5, so the ninth move arrives after game over.
    let mut engine = GameEngine::new();
    let outcomes = play(&mut engine, &[0, 1, 2, 4, 6, 5, 7, 3, 8]);

    assert_eq!(engine.status(), GameStatus::WonBy(Mark::O));
    assert_eq!(engine.winning_line().map(|l| l.indices()), Some([3, 4, 5]));
    assert_eq!(outcomes[8], MoveOutcome::Ignored(MoveIgnored::GameOver));
    assert_eq!(engine.score().get(Mark::O), 1);
}

#[test]
fn test_same_cell_twice_is_noop() {
    let mut engine = GameEngine::new();
    engine.apply_move(0).unwrap();
    let before = engine.snapshot();

    let second = engine.apply_move(0).unwrap();

    assert!(!second.is_applied());
    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.to_move(), Mark::O);
}

#[test]
fn test_score_accumulates_across_rounds() {
    let mut engine = GameEngine::new();

    play(&mut engine, &[0, 1, 4, 2, 8]); // X wins
    engine.reset();
    play(&mut engine, &[0, 1, 2, 4, 3, 5, 7, 6, 8]); // draw
    engine.reset();
    play(&mut engine, &[3, 0, 4, 1, 8, 2]); // O wins top row
    engine.reset();

    assert_eq!(engine.score().get(Mark::X), 1);
    assert_eq!(engine.score().get(Mark::O), 1);
    assert_eq!(engine.round(), 3);
    assert_eq!(engine.board(), &Board::new());
}

#[test]
fn test_snapshot_serializes_for_renderers() {
    let mut engine = GameEngine::new();
    play(&mut engine, &[0, 1, 4, 2, 8]);

    let json = serde_json::to_value(engine.snapshot()).unwrap();

    assert_eq!(json["status"]["WonBy"], "X");
    assert_eq!(json["score"]["x"], 1);
    assert_eq!(json["round"], 0);
}
