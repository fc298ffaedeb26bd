pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(root[1]);

    let p = Paragraph::new(format!(
        "userdir-manager  users:{}  — n: new; e/Enter: edit; d: delete; r: refresh; q: quit",
        app.users.len()
    ))
    .block(
        Block::default()
            .title("userdir-manager")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    users::render_users_table(f, body[0], app);
    users::render_user_details(f, body[1], app);

    components::render_status_bar(f, root[2], app);

    if app.input_mode == InputMode::Dialog {
        users::render_user_dialog(f, f.area(), app);
    }
}
