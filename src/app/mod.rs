//! Application state types and entry glue.
//!
//! Defines the structs and enums that model the TUI state, the transition
//! functions that mutate it, and re-exports the event loop entry (`run`).
//! All state lives in a single [`AppState`] record; handlers in
//! [`update`] drive it through the transition methods defined here.

pub mod keymap;
pub mod update;

use ratatui::style::Color;

use crate::api::{User, UserDraft, UserId};

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Dialog,
}

/// Kind of a transient notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient status message shown after an action completes. Cleared by a
/// timer event scheduled at the moment it is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

/// Which text field of the dialog has focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DialogField {
    Name,
    Email,
}

/// State of the create/edit dialog while it is open.
///
/// `editing` doubles as the mode switch: `Some(id)` means the dialog edits
/// that user, `None` means it creates a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogState {
    pub draft: UserDraft,
    pub editing: Option<UserId>,
    pub focus: DialogField,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Dark default theme.
    #[allow(dead_code)]
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),      // text
            title: Color::Rgb(0xcb, 0xa6, 0xf7),     // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),    // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44), // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe), // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4), // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),   // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "success" => theme.success = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or special names: "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let t = s.trim();
        let lower = t.to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = if let Some(h) = lower.strip_prefix('#') { h } else { lower.as_str() };
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userdir-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::Black => "#000000".to_string(),
                other => format!("{:?}", other),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("success", self.success);
        kv("error", self.error);

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the current default theme and return it.
    /// If present, load from it; on parse errors, return `mocha`.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        let _ = t.write_file(path);
        t
    }
}

/// The whole of the TUI state. Mutated only by the transition methods below
/// and the handlers in [`update`], all running on the event-loop task.
pub struct AppState {
    pub users: Vec<User>,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub dialog: Option<DialogState>,
    pub notice: Option<Notice>,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    pub running: bool,
}

impl AppState {
    /// Create a fresh state with an empty collection. The first fetch is
    /// issued by the event loop when it starts.
    pub fn new(theme: Theme, keymap: keymap::Keymap) -> Self {
        Self {
            users: Vec::new(),
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            dialog: None,
            notice: None,
            theme,
            keymap,
            running: true,
        }
    }

    /// Open the dialog in create mode with an empty draft, whatever the
    /// prior state was.
    pub fn open_create_form(&mut self) {
        self.dialog = Some(DialogState {
            draft: UserDraft::default(),
            editing: None,
            focus: DialogField::Name,
        });
        self.input_mode = InputMode::Dialog;
    }

    /// Open the dialog in edit mode with the draft seeded from `user`.
    pub fn open_edit_form(&mut self, user: &User) {
        self.dialog = Some(DialogState {
            draft: UserDraft {
                name: user.name.clone(),
                email: user.email.clone(),
            },
            editing: Some(user.id.clone()),
            focus: DialogField::Name,
        });
        self.input_mode = InputMode::Dialog;
    }

    /// Close the dialog and drop the draft and edit target.
    pub fn close_form(&mut self) {
        self.dialog = None;
        self.input_mode = InputMode::Normal;
    }

    /// Replace the current notice, if any.
    pub fn set_notice(&mut self, text: impl Into<String>, kind: NoticeKind) {
        self.notice = Some(Notice {
            text: text.into(),
            kind,
        });
    }

    /// Replace the collection wholesale and clamp the selection to it.
    pub fn replace_users(&mut self, users: Vec<User>) {
        self.users = users;
        if self.selected_index >= self.users.len() {
            self.selected_index = self.users.len().saturating_sub(1);
        }
    }

    /// The currently selected user, if the collection is non-empty.
    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selected_index)
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
