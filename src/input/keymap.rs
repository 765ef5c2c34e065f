//! Gesture bindings
//!
//! Gestures are written in the config as `alt+<char>`, `ctrl+<letter>` or
//! a single literal character, and stored as the bytes a terminal sends for
//! them. Alt+Shift+9 on a US layout arrives as ESC followed by `(`, hence
//! the defaults `alt+(` and `alt+)`.

use crate::state::config::Config;
use log::{debug, warn};
use std::collections::HashMap;

/// Key sequence type
pub type KeySequence = Vec<u8>;

/// Action identifier for key bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Speak per-core CPU usage of the focused program
    ReportCpuCores,
    /// Speak physical memory usage of the focused program
    ReportMemory,
    /// Speak average CPU usage across all cores
    ReportAverageCpu,
    /// Stop current speech
    Silence,
}

impl KeyAction {
    /// Every action, in the order bindings are applied
    pub const ALL: [KeyAction; 4] = [
        KeyAction::ReportCpuCores,
        KeyAction::ReportMemory,
        KeyAction::ReportAverageCpu,
        KeyAction::Silence,
    ];

    /// Key name in the `[keys]` config section
    pub fn config_key(self) -> &'static str {
        match self {
            KeyAction::ReportCpuCores => "cpu_cores",
            KeyAction::ReportMemory => "memory",
            KeyAction::ReportAverageCpu => "average_cpu",
            KeyAction::Silence => "silence",
        }
    }

    /// Built-in gesture, `None` when unbound by default
    pub fn default_gesture(self) -> Option<&'static str> {
        match self {
            KeyAction::ReportCpuCores => Some("alt+("),
            KeyAction::ReportMemory => Some("alt+)"),
            KeyAction::ReportAverageCpu => None,
            KeyAction::Silence => Some("alt+x"),
        }
    }
}

/// Parse gesture notation into the byte sequence a terminal sends
///
/// Returns `None` for empty or malformed gestures.
pub fn parse_gesture(gesture: &str) -> Option<KeySequence> {
    let gesture = gesture.trim();
    if gesture.is_empty() {
        return None;
    }

    let lower = gesture.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("alt+") {
        // Keep the original case: alt+X and alt+x are different keys
        let key = &gesture[gesture.len() - rest.len()..];
        let mut seq = vec![0x1b];
        seq.extend_from_slice(single_char(key)?.encode_utf8(&mut [0; 4]).as_bytes());
        return Some(seq);
    }

    if let Some(rest) = lower.strip_prefix("ctrl+") {
        let ch = single_char(rest)?;
        if !ch.is_ascii_lowercase() {
            return None;
        }
        return Some(vec![ch as u8 - b'a' + 1]);
    }

    let ch = single_char(gesture)?;
    Some(ch.encode_utf8(&mut [0; 4]).as_bytes().to_vec())
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

/// Create the keymap with built-in gestures only
pub fn create_default_keymap() -> HashMap<KeySequence, KeyAction> {
    let mut map = HashMap::new();
    for action in KeyAction::ALL {
        if let Some(seq) = action.default_gesture().and_then(parse_gesture) {
            map.insert(seq, action);
        }
    }
    map
}

/// Create the keymap, applying `[keys]` overrides from config
///
/// An empty value unbinds the action. A malformed value is logged and the
/// action stays unbound rather than silently falling back.
pub fn create_keymap(config: &Config) -> HashMap<KeySequence, KeyAction> {
    let mut map = HashMap::new();

    for action in KeyAction::ALL {
        let gesture = match config.key_binding(action.config_key()) {
            Some(configured) => configured,
            None => match action.default_gesture() {
                Some(default) => default.to_string(),
                None => continue,
            },
        };

        if gesture.is_empty() {
            debug!("{:?} is unbound", action);
            continue;
        }

        match parse_gesture(&gesture) {
            Some(seq) => {
                if let Some(previous) = map.insert(seq, action) {
                    warn!(
                        "Gesture '{}' was bound to {:?}, now {:?}",
                        gesture, previous, action
                    );
                }
            }
            None => warn!("Ignoring invalid gesture '{}' for {:?}", gesture, action),
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alt() {
        assert_eq!(parse_gesture("alt+("), Some(b"\x1b(".to_vec()));
        assert_eq!(parse_gesture("Alt+)"), Some(b"\x1b)".to_vec()));
        assert_eq!(parse_gesture("alt+X"), Some(b"\x1bX".to_vec()));
    }

    #[test]
    fn test_parse_ctrl() {
        assert_eq!(parse_gesture("ctrl+a"), Some(vec![0x01]));
        assert_eq!(parse_gesture("CTRL+E"), Some(vec![0x05]));
        assert_eq!(parse_gesture("ctrl+1"), None);
    }

    #[test]
    fn test_parse_literal_and_invalid() {
        assert_eq!(parse_gesture("q"), Some(b"q".to_vec()));
        assert_eq!(parse_gesture(""), None);
        assert_eq!(parse_gesture("   "), None);
        assert_eq!(parse_gesture("alt+"), None);
        assert_eq!(parse_gesture("alt+ab"), None);
    }
}
