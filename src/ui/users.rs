use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use crate::app::{AppState, DialogField};

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.users.len());
    let slice = &app.users[start..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_index {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from("[e]dit [d]el"),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(3),
        Constraint::Length(13),
    ];

    let header = Row::new(vec!["NAME", "EMAIL", "ACTIONS"]).style(
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::REVERSED),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let (id, name, email) = match app.selected_user() {
        Some(u) => (u.id.to_string(), u.name.clone(), u.email.clone()),
        None => (String::new(), String::new(), String::new()),
    };

    let text = format!("Id: {id}\nName: {name}\nEmail: {email}");
    let p = Paragraph::new(text).style(Style::default().fg(app.theme.text)).block(
        Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

/// Render the add/edit dialog over the current frame.
pub fn render_user_dialog(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(dialog) = &app.dialog else { return };

    let rect = crate::ui::components::centered_rect(54, 9, area);
    let title = if dialog.editing.is_some() { "Edit user" } else { "Add user" };
    let name_marker = if dialog.focus == DialogField::Name { "▶" } else { " " };
    let email_marker = if dialog.focus == DialogField::Email { "▶" } else { " " };
    let body = format!(
        "{} Name:  {}\n{} Email: {}\n\nEnter: save   Tab: switch field   Esc: cancel",
        name_marker, dialog.draft.name, email_marker, dialog.draft.email
    );
    let p = Paragraph::new(body).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
