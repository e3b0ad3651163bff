use crate::engine::{InputEvent, InputSource};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;

/// Maps a keyboard event to an engine input event.
///
/// Plain and shifted characters become key tokens. Ctrl+C and Ctrl+D end the
/// input. Only presses count: auto-repeat, releases and bare modifier
/// presses are dropped.
pub fn map_key_event(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Some(InputEvent::Closed),
        KeyCode::Char(c) if !ctrl && !alt => Some(InputEvent::Key(c)),
        KeyCode::Char(c) if ctrl => Some(InputEvent::Other(format!("Ctrl+{}", c))),
        KeyCode::Char(c) => Some(InputEvent::Other(format!("Alt+{}", c))),
        KeyCode::Modifier(_) => None,
        other => Some(InputEvent::Other(format!("{:?}", other))),
    }
}

/// Blocking crossterm event reader
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn next_event(&mut self) -> io::Result<InputEvent> {
        loop {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(input) = map_key_event(key) {
                        return Ok(input);
                    }
                }
                Event::Resize(_, _) => return Ok(InputEvent::Redraw),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::ModifierKeyCode;

    #[test]
    fn test_plain_character() {
        let key = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE);
        assert_eq!(map_key_event(key), Some(InputEvent::Key('1')));
    }

    #[test]
    fn test_shifted_character() {
        let key = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(map_key_event(key), Some(InputEvent::Key('A')));
    }

    #[test]
    fn test_ctrl_c_and_ctrl_d_close_input() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key_event(key), Some(InputEvent::Closed));

        let key = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(map_key_event(key), Some(InputEvent::Closed));
    }

    #[test]
    fn test_other_ctrl_is_unrecognized() {
        let key = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(
            map_key_event(key),
            Some(InputEvent::Other("Ctrl+z".to_string()))
        );
    }

    #[test]
    fn test_named_keys() {
        let key = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(map_key_event(key), Some(InputEvent::Other("Left".to_string())));

        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(map_key_event(key), Some(InputEvent::Other("Esc".to_string())));
    }

    #[test]
    fn test_release_repeat_and_modifier_are_dropped() {
        let mut key = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key_event(key), None);

        let key = KeyEvent::new_with_kind(
            KeyCode::Char('1'),
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        );
        assert_eq!(map_key_event(key), None);

        let key = KeyEvent::new(
            KeyCode::Modifier(ModifierKeyCode::LeftShift),
            KeyModifiers::SHIFT,
        );
        assert_eq!(map_key_event(key), None);
    }
}
