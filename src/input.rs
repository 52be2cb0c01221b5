use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Rotation;

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Turn(Rotation),
    /// End the game and offer to save the score.
    Quit,
    /// End the game without saving.
    Abort,
}

/// Maps one key event to a game input. Releases and unbound keys map to `None`.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Abort);
    }

    match key.code {
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'q') => Some(GameInput::Quit),
        KeyCode::Left => Some(GameInput::Turn(Rotation::Left)),
        KeyCode::Right => Some(GameInput::Turn(Rotation::Right)),
        _ => None,
    }
}

/// Reads terminal key events without a background thread.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for one event and returns its mapped input, if any.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key(key)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    use super::{GameInput, map_key};
    use crate::snake::Rotation;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_map_to_turns() {
        assert_eq!(
            map_key(press(KeyCode::Left)),
            Some(GameInput::Turn(Rotation::Left))
        );
        assert_eq!(
            map_key(press(KeyCode::Right)),
            Some(GameInput::Turn(Rotation::Right))
        );
    }

    #[test]
    fn quit_key_is_case_insensitive() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(GameInput::Quit));
        assert_eq!(map_key(press(KeyCode::Char('Q'))), Some(GameInput::Quit));
    }

    #[test]
    fn ctrl_c_aborts() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(GameInput::Abort));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(map_key(press(KeyCode::Up)), None);
        assert_eq!(map_key(press(KeyCode::Down)), None);
        assert_eq!(map_key(press(KeyCode::Char('c'))), None);
        assert_eq!(map_key(press(KeyCode::Enter)), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let key = KeyEvent::new_with_kind(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(map_key(key), None);
    }
}
