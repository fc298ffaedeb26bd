//! Shared UI components (status bar, modal helpers).
//!
//! Contains small building blocks reused across the screen.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, InputMode, NoticeKind};

/// Render the bottom status bar. A pending notice takes the whole line,
/// colored by kind; otherwise mode and counts are shown.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    if let Some(notice) = &app.notice {
        let bg = match notice.kind {
            NoticeKind::Success => app.theme.success,
            NoticeKind::Error => app.theme.error,
        };
        let p = Paragraph::new(notice.text.clone())
            .style(Style::default().fg(Color::Black).bg(bg));
        f.render_widget(p, area);
        return;
    }

    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Dialog => "DIALOG",
    };
    let msg = format!(
        "mode: {mode}  users:{}  rows/page:{}",
        app.users.len(),
        app.rows_per_page
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
