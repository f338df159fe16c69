//! Key bindings for driving a countdown from the keyboard.

use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;

/// A set of keys that trigger one action, plus its help text.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Keys that trigger the binding.
    pub keys: Vec<KeyCode>,
    /// Short key label, e.g. `"space"`.
    pub help: String,
    /// What the binding does, e.g. `"pause/resume"`.
    pub description: String,
    /// Disabled bindings never match.
    pub enabled: bool,
}

impl Binding {
    /// Creates an enabled binding without help text.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            help: String::new(),
            description: String::new(),
            enabled: true,
        }
    }

    /// Sets the key label and description shown in help views.
    pub fn with_help(mut self, help: impl Into<String>, description: impl Into<String>) -> Self {
        self.help = help.into();
        self.description = description.into();
        self
    }

    /// Whether a bubbletea key message triggers this binding.
    pub fn matches(&self, key_msg: &KeyMsg) -> bool {
        self.enabled && self.keys.contains(&key_msg.key)
    }
}

/// Keys understood by [`crate::countdown::Model::update`].
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Pauses a running countdown or resumes a paused one.
    pub toggle: Binding,
    /// Restarts the countdown from the configured duration.
    pub reset: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            toggle: Binding::new(vec![KeyCode::Char(' '), KeyCode::Char('p')])
                .with_help("space/p", "pause/resume"),
            reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
        }
    }
}

impl KeyMap {
    /// Bindings in display order, for help views.
    pub fn short_help(&self) -> Vec<&Binding> {
        vec![&self.toggle, &self.reset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyMsg {
        KeyMsg {
            key: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_default_bindings() {
        let keymap = KeyMap::default();
        assert!(keymap.toggle.matches(&key(' ')));
        assert!(keymap.toggle.matches(&key('p')));
        assert!(keymap.reset.matches(&key('r')));
        assert!(!keymap.reset.matches(&key('x')));
        assert_eq!(keymap.short_help()[0].description, "pause/resume");
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut keymap = KeyMap::default();
        keymap.reset.enabled = false;
        assert!(!keymap.reset.matches(&key('r')));
        assert!(keymap.toggle.matches(&key(' ')));
    }
}
