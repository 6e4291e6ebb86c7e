//! Step scripts for headless runs.
//!
//! A script is a comma-separated list of steps:
//!
//! - `key:<name>` presses a key, e.g. `key:down`, `key:f5`, `key:ctrl+u`
//! - `type:<text>` types into the query box
//! - `assert:contains:<text>` checks the rendered screen (case-insensitive)
//! - `assert:state:<field>=<value>` checks a field of [`HeadlessState`]
//!
//! A comma inside a step is written `\,`.

use super::HeadlessState;
use crate::error::{DashError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::str::FromStr;

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("enter", KeyCode::Enter),
    ("esc", KeyCode::Esc),
    ("tab", KeyCode::Tab),
    ("backtab", KeyCode::BackTab),
    ("backspace", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("space", KeyCode::Char(' ')),
];

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Key(KeyEvent),
    Type(String),
    Expect(Check),
}

/// A condition checked against the dashboard after the steps before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    ScreenContains(String),
    State { field: String, expected: String },
}

impl Check {
    pub fn holds(&self, screen: &str, state: &HeadlessState) -> bool {
        match self {
            Self::ScreenContains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::State { field, expected } => {
                state.field(field).as_deref() == Some(expected.as_str())
            }
        }
    }
}

impl FromStr for Step {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = |msg: &str| DashError::config(format!("Invalid step '{s}': {msg}"));

        match s.split_once(':') {
            Some(("key", key)) => parse_key(key.trim()).map(Step::Key).map_err(|e| bad(&e)),
            Some(("type", text)) => Ok(Step::Type(text.to_string())),
            Some(("assert", check)) => match check.split_once(':') {
                Some(("contains", text)) => Ok(Step::Expect(Check::ScreenContains(text.to_string()))),
                Some(("state", pair)) => {
                    let (field, expected) = pair
                        .split_once('=')
                        .ok_or_else(|| bad("state checks are written field=value"))?;
                    Ok(Step::Expect(Check::State {
                        field: field.trim().to_string(),
                        expected: expected.trim().to_string(),
                    }))
                }
                _ => Err(bad("expected assert:contains:<text> or assert:state:<field>=<value>")),
            },
            _ => Err(bad("expected key:, type: or assert:")),
        }
    }
}

/// Parses a script into steps.
pub fn parse(script: &str) -> Result<Vec<Step>> {
    split(script)
        .iter()
        .map(|raw| raw.trim_start())
        .filter(|raw| !raw.is_empty())
        .map(str::parse::<Step>)
        .collect()
}

fn split(script: &str) -> Vec<String> {
    let mut steps = Vec::new();
    let mut current = String::new();
    let mut chars = script.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                chars.next();
                current.push(',');
            }
            ',' => steps.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    steps.push(current);
    steps
}

fn parse_key(name: &str) -> std::result::Result<KeyEvent, String> {
    let mut parts: Vec<&str> = name.split('+').collect();
    let key = parts.pop().unwrap_or_default().to_lowercase();

    let mut modifiers = KeyModifiers::NONE;
    for part in parts {
        modifiers |= match part.to_lowercase().as_str() {
            "ctrl" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            other => return Err(format!("unknown modifier '{other}'")),
        };
    }

    let code = if let Some(&(_, code)) = NAMED_KEYS.iter().find(|(n, _)| *n == key) {
        code
    } else if let Some(n) = key.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        KeyCode::F(n)
    } else {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => return Err(format!("unknown key '{key}'")),
        }
    };

    Ok(KeyEvent::new(code, modifiers))
}
