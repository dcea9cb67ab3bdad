//! Key mapping from terminal events to game actions.
//!
//! Arrow keys slide the piece across the floor plane, space drops it one
//! layer, and `w`/`s`, `q`/`e`, `a`/`d` turn it about x, y and z.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        // Movement
        KeyCode::Up => Some(GameAction::MoveForward),
        KeyCode::Down => Some(GameAction::MoveBack),
        KeyCode::Left => Some(GameAction::MoveLeft),
        KeyCode::Right => Some(GameAction::MoveRight),
        KeyCode::Char(' ') => Some(GameAction::Drop),

        // Rotation
        KeyCode::Char('w') | KeyCode::Char('W') => Some(GameAction::RotateXPos),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(GameAction::RotateXNeg),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(GameAction::RotateYPos),
        KeyCode::Char('e') | KeyCode::Char('E') => Some(GameAction::RotateYNeg),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(GameAction::RotateZPos),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(GameAction::RotateZNeg),

        // Restart
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Check if key switches the elevation view between the two side faces.
pub fn should_cycle_view(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('v') | KeyCode::Char('V'))
}
