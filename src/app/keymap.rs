//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! This module manages keyboard shortcuts for the TUI. It supports:
//! - Loading custom keybindings from a config file (`keybinds.conf`)
//! - Providing sensible defaults if no config is present
//! - Resolving key presses (with modifiers) to semantic actions
//! - Exporting the current keymap back to a file for reference or customization
//!
//! Only Normal-mode keys go through the keymap; the dialog handles its raw
//! key codes directly so that typed characters reach the form fields.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Multiple key combinations can map to the same action (e.g., both 'j' and
/// Down arrow move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Re-fetch the user collection from the directory.
    Refresh,
    /// Open the dialog in create mode.
    NewUser,
    /// Open the dialog in edit mode for the selected user.
    EditSelection,
    /// Delete the selected user.
    DeleteSelection,
    /// Open the edit dialog for the selected item (Enter).
    EnterAction,
    /// Move up in the list.
    MoveUp,
    /// Move down in the list.
    MoveDown,
    /// Move to the previous page of results.
    PageUp,
    /// Move to the next page of results.
    PageDown,
    /// Ignore this key.
    Ignore,
}

/// Manages keybinding configuration and key-to-action resolution.
///
/// The keymap uses a canonical mapping from `(KeyModifiers, KeyCode)` pairs to
/// [`KeyAction`]s. It supports loading from and saving to a configuration
/// file, with sensible defaults if no custom config is present.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: std::collections::HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = std::collections::HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, KeyCode::Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Enter), KeyAction::EnterAction);
        // Navigation
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        // Vim-like keys
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        // Page keys
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);

        Self { bindings }
    }

    /// Load a keymap from a file, or create defaults if the file doesn't exist.
    ///
    /// If the path is missing, a fresh default keymap is written there for
    /// future customization.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        let _ = km.write_file(path);
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// The file uses the format `<Action> = <KeySpec>`. The method starts
    /// from defaults and overrides with user-specified bindings.
    ///
    /// # Returns
    ///
    /// `Some(keymap)` if the file exists and is readable; `None` otherwise.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        Some(map)
    }

    /// Write the current keymap to a configuration file.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userdir-manager keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Delete, Up, Down, PageUp, PageDown, /, n, e, d, j, k\n");
        buf.push_str("# Actions: Quit, Refresh, NewUser, EditSelection, DeleteSelection, EnterAction, MoveUp, MoveDown, PageUp, PageDown, Ignore\n\n");

        // Emit a stable, readable subset of current bindings
        let dump = [
            ("q", KeyAction::Quit),
            ("Esc", KeyAction::Ignore),
            ("r", KeyAction::Refresh),
            ("n", KeyAction::NewUser),
            ("e", KeyAction::EditSelection),
            ("d", KeyAction::DeleteSelection),
            ("Delete", KeyAction::DeleteSelection),
            ("Enter", KeyAction::EnterAction),
            ("Up", KeyAction::MoveUp),
            ("Down", KeyAction::MoveDown),
            ("j", KeyAction::MoveDown),
            ("k", KeyAction::MoveUp),
            ("PageUp", KeyAction::PageUp),
            ("PageDown", KeyAction::PageDown),
        ];
        for (k, a) in dump {
            let _ = writeln!(&mut buf, "{} = {}", format_action(a), k);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event to its corresponding action, if one is bound.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Return a snapshot of all bindings as ((modifiers, code), action) pairs.
    #[allow(dead_code)]
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "/" => Char('/'),
        "Esc" | "Escape" => Esc,
        "Up" => Up,
        "Down" => Down,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let chars: Vec<char> = rest.chars().collect();
            if chars.len() == 1 {
                KeyCode::Char(chars[0])
            } else {
                return None;
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "Refresh" => Some(KeyAction::Refresh),
        "NewUser" => Some(KeyAction::NewUser),
        "EditSelection" => Some(KeyAction::EditSelection),
        "DeleteSelection" => Some(KeyAction::DeleteSelection),
        "EnterAction" => Some(KeyAction::EnterAction),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "PageUp" => Some(KeyAction::PageUp),
        "PageDown" => Some(KeyAction::PageDown),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::Refresh => "Refresh",
        KeyAction::NewUser => "NewUser",
        KeyAction::EditSelection => "EditSelection",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::EnterAction => "EnterAction",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::Ignore => "Ignore",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn defaults_resolve_expected_actions() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&key(KeyCode::Char('q'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key(KeyCode::Char('n'))), Some(KeyAction::NewUser));
        assert_eq!(km.resolve(&key(KeyCode::Char('d'))), Some(KeyAction::DeleteSelection));
        assert_eq!(km.resolve(&key(KeyCode::Enter)), Some(KeyAction::EnterAction));
        assert_eq!(km.resolve(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn parse_action_and_key_specs() {
        assert_eq!(parse_action("Refresh"), Some(KeyAction::Refresh));
        assert_eq!(parse_action("NoSuchAction"), None);
        assert_eq!(
            parse_key("Ctrl+r"),
            Some((KeyModifiers::CONTROL, KeyCode::Char('r')))
        );
        assert_eq!(parse_key("PageDown"), Some((KeyModifiers::NONE, KeyCode::PageDown)));
        assert_eq!(parse_key("notakey"), None);
    }
}
