//! Key mapping from terminal events to player intents.

use crate::types::{Command, InputAction, MoveDirection, RotateDirection};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to an action. Key releases are ignored.
pub fn handle_key_event(key: KeyEvent) -> Option<InputAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if should_quit(key) {
        return Some(InputAction::Quit);
    }

    let command = match key.code {
        // Movement
        KeyCode::Left => Command::Move(MoveDirection::Left),
        KeyCode::Right => Command::Move(MoveDirection::Right),
        KeyCode::Down => Command::Move(MoveDirection::Down),

        // Rotation
        KeyCode::Up | KeyCode::Char('z') | KeyCode::Char('Z') => {
            Command::Rotate(RotateDirection::Clockwise)
        }
        KeyCode::Char('x') | KeyCode::Char('X') => {
            Command::Rotate(RotateDirection::CounterClockwise)
        }

        KeyCode::Char(' ') => Command::Drop,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('r') | KeyCode::Char('R') => {
            Command::NewGame
        }

        // Session toggles
        KeyCode::Char('p') | KeyCode::Char('P') => return Some(InputAction::TogglePause),
        KeyCode::Char('g') | KeyCode::Char('G') => return Some(InputAction::ToggleGrid),
        KeyCode::Char('e') | KeyCode::Char('E') => return Some(InputAction::EndGame),

        _ => return None,
    };

    Some(InputAction::Command(command))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
