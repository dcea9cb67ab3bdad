use glam::IVec3;

use voxel_tetris::core::{Board, Game, MoveOutcome};
use voxel_tetris::types::{GameAction, GameConfig, GameEvent, GamePhase};

fn started(config: GameConfig) -> Game {
    let mut game = Game::new(config);
    game.start();
    game
}

#[test]
fn nothing_moves_before_start() {
    let mut game = Game::new(GameConfig::default());
    assert!(!game.started());
    assert!(game.current().is_none());
    assert_eq!(game.advance(5000), 0);
    assert!(!game.apply_action(GameAction::Drop));
}

#[test]
fn piece_falls_to_floor_and_next_spawns() {
    let mut game = started(GameConfig::default());
    let first = game.current().cloned().unwrap();
    assert_eq!(first.position(), IVec3::new(2, 2, 15));

    let mut moves = 0;
    let outcome = loop {
        match game.step() {
            MoveOutcome::Moved => moves += 1,
            other => break other,
        }
        assert!(moves < 20, "piece never landed");
    };

    assert_eq!(moves, 14);
    assert!(matches!(outcome, MoveOutcome::Landed(clear) if clear.is_empty()));
    assert_eq!(game.board().petrified_count(), first.offsets().len());
    for offset in first.offsets() {
        let cell = IVec3::new(2, 2, 0) + *offset;
        assert!(game.board().is_petrified(cell), "{:?} not settled", cell);
    }
    assert_eq!(game.pieces_spawned(), 2);

    let events: Vec<_> = game.drain_events().collect();
    assert!(matches!(events.first(), Some(GameEvent::Spawned { .. })));
    assert!(matches!(events.last(), Some(GameEvent::Spawned { .. })));
    assert!(events.iter().any(|e| matches!(e, GameEvent::Landed { cells } if cells.len() == first.offsets().len())));
}

#[test]
fn advance_steps_only_after_interval_is_exceeded() {
    let mut game = started(GameConfig::default());
    assert_eq!(game.advance(1000), 0);
    assert_eq!(game.current().map(|p| p.position().z), Some(15));
    assert_eq!(game.advance(1), 1);
    assert_eq!(game.current().map(|p| p.position().z), Some(14));
    assert_eq!(game.advance(2500), 2);
    assert_eq!(game.current().map(|p| p.position().z), Some(12));
}

#[test]
fn wall_move_is_rejected_and_flashes() {
    let mut game = started(GameConfig::default());
    let mut tries = 0;
    loop {
        tries += 1;
        assert!(tries < 10, "wall never reached");
        if game.move_piece(IVec3::NEG_X) == MoveOutcome::Blocked {
            break;
        }
    }
    assert_eq!(game.current().map(|p| p.position().x), Some(0));
    assert!(game.blocked());
    assert!(game.snapshot().blocked);
    game.advance(100);
    assert!(!game.blocked());
}

#[test]
fn descending_into_wall_discards_whole_move() {
    let mut game = started(GameConfig::default());
    let before = game.current().cloned().unwrap();

    assert_eq!(game.move_piece(IVec3::new(-10, 0, -1)), MoveOutcome::Blocked);
    assert_eq!(game.current(), Some(&before));
    assert_eq!(game.board().petrified_count(), 0);
    assert_eq!(game.pieces_spawned(), 1);
    assert!(game.blocked());
}

#[test]
fn sliding_over_settled_cells_is_blocked_not_landed() {
    let config = GameConfig::default();
    let mut board = Board::from_config(&config.bounding_box);
    // A ledge one layer below the spawn height, just left of the piece.
    for y in 0..6 {
        board.add_static_block(IVec3::new(1, y, 14));
    }
    let mut game = Game::with_board(config, board);
    game.start();
    let before = game.current().cloned().unwrap();

    assert_eq!(game.move_piece(IVec3::NEG_X), MoveOutcome::Blocked);
    assert_eq!(game.current(), Some(&before));
    assert_eq!(game.board().petrified_count(), 6);
    assert_eq!(game.pieces_spawned(), 1);
    assert!(game
        .drain_events()
        .all(|e| !matches!(e, GameEvent::Landed { .. })));
}

#[test]
fn landing_on_full_layer_clears_it() {
    // Spawn z is 3 on an 8-deep box.
    let config = GameConfig::with_splits(2, 3, 8);
    let mut board = Board::from_config(&config.bounding_box);
    for y in 0..3 {
        for x in 0..2 {
            board.add_static_block(IVec3::new(x, y, 0));
        }
    }
    let mut game = Game::with_board(config, board);
    game.start();
    let cells = game.current().map(|p| p.offsets().len()).unwrap();

    assert_eq!(game.step(), MoveOutcome::Moved);
    match game.step() {
        MoveOutcome::Landed(clear) => {
            assert_eq!(clear.layers, 1);
            assert_eq!(clear.points, 1000);
        }
        other => panic!("expected landing, got {:?}", other),
    }

    assert_eq!(game.score(), 1000);
    assert_eq!(game.layers_cleared(), 1);
    assert_eq!(game.board().petrified_count(), cells);
    assert_eq!(game.board().layer_count(0), cells);
    assert_eq!(game.board().layer_count(1), 0);
    assert!(game
        .drain_events()
        .any(|e| e == GameEvent::LayersCleared { layers: 1, bonus: 1, points: 1000 }));
}

#[test]
fn blocked_spawn_ends_game_and_restart_recovers() {
    let config = GameConfig::default();
    let mut board = Board::from_config(&config.bounding_box);
    for y in 0..6 {
        for x in 0..6 {
            board.add_static_block(IVec3::new(x, y, 14));
        }
    }
    let mut game = Game::with_board(config, board);
    game.start();

    assert!(game.game_over());
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert!(game.current().is_none());
    assert!(game.drain_events().any(|e| e == GameEvent::GameOver { score: 0 }));
    assert_eq!(game.advance(10_000), 0);
    assert!(!game.apply_action(GameAction::MoveLeft));
    assert!(game.snapshot().game_over());

    assert!(game.apply_action(GameAction::Restart));
    assert!(!game.game_over());
    assert_eq!(game.episode_id(), 1);
    assert_eq!(game.board().petrified_count(), 0);
    assert_eq!(game.pieces_spawned(), 1);
}

#[test]
fn remote_action_names_drive_the_game() {
    let mut game = started(GameConfig::default());
    for name in ["moveRight", "moveForward", "rotateZPos"] {
        let action = GameAction::from_str(name).unwrap();
        assert!(game.apply_action(action), "{} had no effect", name);
    }
    let piece = game.current().unwrap();
    assert_eq!(piece.position(), IVec3::new(3, 3, 15));
    assert_eq!(piece.orientation(), IVec3::new(0, 0, 90));
}

#[test]
fn snapshot_serializes_grid_and_active_piece() {
    let game = started(GameConfig::default());
    let snap = game.snapshot();
    assert_eq!(snap.cells.len(), 720);
    assert_eq!(snap.step_ms, 1000);

    let v = serde_json::to_value(&snap).unwrap();
    assert_eq!(v["dims"], serde_json::json!([6, 6, 20]));
    assert_eq!(v["phase"], "running");
    assert_eq!(v["active"]["position"], serde_json::json!([2, 2, 15]));
}
