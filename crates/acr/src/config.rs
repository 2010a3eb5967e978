use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub keybinds: Keybinds,
}

pub type InnerKeybinds = HashMap<Vec<KeyEvent>, Action>;

#[derive(Clone, Debug)]
pub struct Keybinds(pub InnerKeybinds);

impl Deref for Keybinds {
    type Target = InnerKeybinds;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Keybinds {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

const DEFAULT_KEYBINDS: &[(&str, Action)] = &[
    ("esc", Action::Quit),
    ("ctrl-c", Action::Quit),
    ("ctrl-s", Action::Submit),
    ("pageup", Action::ScrollUp),
    ("pagedown", Action::ScrollDown),
];

impl Default for Keybinds {
    fn default() -> Self {
        let mut keybinds = HashMap::new();
        for (raw, action) in DEFAULT_KEYBINDS {
            match parse_key_event(raw) {
                Ok(key) => {
                    keybinds.insert(vec![key], action.clone());
                }
                Err(e) => tracing::warn!("skipping keybind: {e}"),
            }
        }

        Self(keybinds)
    }
}

/// Parses bindings like `q`, `esc`, `ctrl-s` or `ctrl-alt-x`.
pub fn parse_key_event(raw: &str) -> anyhow::Result<KeyEvent> {
    let raw_lower = raw.to_ascii_lowercase();

    let mut parts = raw_lower.split('-').collect::<Vec<_>>();
    let key = parts
        .pop()
        .filter(|k| !k.is_empty())
        .ok_or(anyhow::anyhow!("Unable to parse {raw_lower}"))?;

    let mut modifiers = KeyModifiers::empty();
    for modifier in parts {
        modifiers |= match modifier {
            "ctrl" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            _ => anyhow::bail!("Unable to parse modifier {modifier} in {raw_lower}"),
        };
    }

    let code = match key {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        c => {
            let mut chars = c.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => anyhow::bail!("Unable to parse {raw_lower}"),
            }
        }
    };

    Ok(KeyEvent::new(code, modifiers))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parses_plain_and_modified_keys() -> anyhow::Result<()> {
        assert_eq!(
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::empty()),
            parse_key_event("q")?
        );
        assert_eq!(
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
            parse_key_event("Ctrl-S")?
        );
        assert_eq!(
            KeyEvent::new(
                KeyCode::Char('x'),
                KeyModifiers::CONTROL | KeyModifiers::ALT
            ),
            parse_key_event("ctrl-alt-x")?
        );
        assert_eq!(
            KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()),
            parse_key_event("esc")?
        );

        Ok(())
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(parse_key_event("hyper-x").is_err());
        assert!(parse_key_event("escape").is_err());
        assert!(parse_key_event("ctrl-").is_err());
        assert!(parse_key_event("").is_err());
    }

    #[test]
    fn test_default_keybinds() {
        let keybinds = Keybinds::default();

        assert_eq!(
            Some(&Action::Submit),
            keybinds.get(&vec![KeyEvent::new(
                KeyCode::Char('s'),
                KeyModifiers::CONTROL
            )])
        );
        assert_eq!(
            Some(&Action::Quit),
            keybinds.get(&vec![KeyEvent::new(KeyCode::Esc, KeyModifiers::empty())])
        );
        assert_eq!(DEFAULT_KEYBINDS.len(), keybinds.len());
    }
}
