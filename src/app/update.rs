use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, warn};

use crate::api::{DirectoryClient, User, UserDraft, UserId};
use crate::app::{AppState, DialogField, InputMode, NoticeKind};
use crate::app::keymap::KeyAction;
use crate::ui;

/// How long a notice stays on screen before its expiry event fires.
pub const NOTICE_TTL: Duration = Duration::from_millis(3000);

/// Everything the event loop reacts to: forwarded terminal input, API
/// outcomes from spawned request tasks, and notice-expiry timers.
#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Api(ApiOutcome),
    NoticeExpired,
    Redraw,
}

/// Result of a spawned API call, reduced to what the handlers need.
/// Failure variants carry the user-facing message text.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiOutcome {
    Loaded(Vec<User>),
    LoadFailed(String),
    Created,
    CreateFailed(String),
    Updated,
    UpdateFailed(String),
    Deleted,
    DeleteFailed(String),
}

/// Side effects requested by the handlers. The loop executes these by
/// spawning tasks; handlers themselves never touch the network or clock.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    FetchUsers,
    SubmitCreate(UserDraft),
    SubmitUpdate(UserId, UserDraft),
    SubmitDelete(UserId),
    ExpireNotice,
}

/// Run the TUI until the user quits or the event channel closes.
///
/// The collection is fetched once on entry and again after every successful
/// mutation. Requests run in spawned tasks, so input keeps flowing while
/// they are outstanding; nothing blocks, and nothing is cancelled.
pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut app: AppState,
    client: DirectoryClient,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_input_thread(tx.clone());
    dispatch(Effect::FetchUsers, &client, &tx);

    loop {
        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        let Some(event) = rx.recv().await else { break };
        for effect in handle_event(&mut app, event) {
            dispatch(effect, &client, &tx);
        }
        if !app.running {
            break;
        }
    }

    Ok(())
}

/// Apply one event to the state, returning the effects it requests.
pub fn handle_event(app: &mut AppState, event: AppEvent) -> Vec<Effect> {
    match event {
        AppEvent::Input(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        AppEvent::Input(_) | AppEvent::Redraw => Vec::new(),
        AppEvent::Api(outcome) => handle_api(app, outcome),
        // Expiry clears whatever notice is current. Timers are never
        // cancelled, so an older timer can cut a newer notice short.
        AppEvent::NoticeExpired => {
            app.notice = None;
            Vec::new()
        }
    }
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<Effect> {
    match app.input_mode {
        InputMode::Normal => {
            let action = app.keymap.resolve(&key).unwrap_or(KeyAction::Ignore);
            handle_action(app, action)
        }
        InputMode::Dialog => handle_dialog_key(app, key.code),
    }
}

fn handle_action(app: &mut AppState, action: KeyAction) -> Vec<Effect> {
    match action {
        KeyAction::Quit => {
            app.running = false;
            Vec::new()
        }
        KeyAction::Refresh => vec![Effect::FetchUsers],
        KeyAction::NewUser => {
            app.open_create_form();
            Vec::new()
        }
        KeyAction::EditSelection | KeyAction::EnterAction => {
            if let Some(user) = app.selected_user().cloned() {
                app.open_edit_form(&user);
            }
            Vec::new()
        }
        KeyAction::DeleteSelection => match app.selected_user() {
            Some(user) => vec![Effect::SubmitDelete(user.id.clone())],
            None => Vec::new(),
        },
        KeyAction::MoveUp => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
            Vec::new()
        }
        KeyAction::MoveDown => {
            if app.selected_index + 1 < app.users.len() {
                app.selected_index += 1;
            }
            Vec::new()
        }
        KeyAction::PageUp => {
            let rpp = app.rows_per_page.max(1);
            app.selected_index = app.selected_index.saturating_sub(rpp);
            Vec::new()
        }
        KeyAction::PageDown => {
            let rpp = app.rows_per_page.max(1);
            let new_idx = app.selected_index.saturating_add(rpp);
            app.selected_index = new_idx.min(app.users.len().saturating_sub(1));
            Vec::new()
        }
        KeyAction::Ignore => Vec::new(),
    }
}

fn handle_dialog_key(app: &mut AppState, code: KeyCode) -> Vec<Effect> {
    if code == KeyCode::Esc {
        app.close_form();
        return Vec::new();
    }
    let Some(dialog) = &mut app.dialog else {
        app.input_mode = InputMode::Normal;
        return Vec::new();
    };
    match code {
        KeyCode::Enter => {
            // The dialog stays open until the server confirms; a failure
            // keeps the draft intact for another attempt.
            let draft = dialog.draft.clone();
            match dialog.editing.clone() {
                Some(id) => vec![Effect::SubmitUpdate(id, draft)],
                None => vec![Effect::SubmitCreate(draft)],
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            dialog.focus = DialogField::Email;
            Vec::new()
        }
        KeyCode::BackTab | KeyCode::Up => {
            dialog.focus = DialogField::Name;
            Vec::new()
        }
        KeyCode::Backspace => {
            match dialog.focus {
                DialogField::Name => dialog.draft.name.pop(),
                DialogField::Email => dialog.draft.email.pop(),
            };
            Vec::new()
        }
        KeyCode::Char(c) => {
            match dialog.focus {
                DialogField::Name => dialog.draft.name.push(c),
                DialogField::Email => dialog.draft.email.push(c),
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

pub fn handle_api(app: &mut AppState, outcome: ApiOutcome) -> Vec<Effect> {
    match outcome {
        ApiOutcome::Loaded(users) => {
            app.replace_users(users);
            Vec::new()
        }
        ApiOutcome::LoadFailed(msg) => vec![notify(app, msg, NoticeKind::Error)],
        ApiOutcome::Created => {
            app.close_form();
            vec![
                Effect::FetchUsers,
                notify(app, "User added successfully!", NoticeKind::Success),
            ]
        }
        ApiOutcome::Updated => {
            app.close_form();
            vec![
                Effect::FetchUsers,
                notify(app, "User updated successfully!", NoticeKind::Success),
            ]
        }
        ApiOutcome::Deleted => vec![
            Effect::FetchUsers,
            notify(app, "User deleted successfully!", NoticeKind::Success),
        ],
        ApiOutcome::CreateFailed(msg)
        | ApiOutcome::UpdateFailed(msg)
        | ApiOutcome::DeleteFailed(msg) => vec![notify(app, msg, NoticeKind::Error)],
    }
}

fn notify(app: &mut AppState, text: impl Into<String>, kind: NoticeKind) -> Effect {
    app.set_notice(text, kind);
    Effect::ExpireNotice
}

/// Execute one effect: spawn the request or timer task that will feed its
/// outcome back through the channel.
pub fn dispatch(effect: Effect, client: &DirectoryClient, tx: &UnboundedSender<AppEvent>) {
    let client = client.clone();
    let tx = tx.clone();
    match effect {
        Effect::ExpireNotice => schedule_notice_expiry(&tx),
        Effect::FetchUsers => {
            tokio::spawn(async move {
                let outcome = match client.list_users().await {
                    Ok(users) => ApiOutcome::Loaded(users),
                    Err(e) => {
                        warn!(error = %e, "list request failed");
                        ApiOutcome::LoadFailed(e.user_message())
                    }
                };
                let _ = tx.send(AppEvent::Api(outcome));
            });
        }
        Effect::SubmitCreate(draft) => {
            tokio::spawn(async move {
                let outcome = match client.create_user(&draft).await {
                    Ok(()) => ApiOutcome::Created,
                    Err(e) => {
                        warn!(error = %e, "create request failed");
                        ApiOutcome::CreateFailed(e.user_message())
                    }
                };
                let _ = tx.send(AppEvent::Api(outcome));
            });
        }
        Effect::SubmitUpdate(id, draft) => {
            tokio::spawn(async move {
                let outcome = match client.update_user(&id, &draft).await {
                    Ok(()) => ApiOutcome::Updated,
                    Err(e) => {
                        warn!(error = %e, "update request failed");
                        ApiOutcome::UpdateFailed(e.user_message())
                    }
                };
                let _ = tx.send(AppEvent::Api(outcome));
            });
        }
        Effect::SubmitDelete(id) => {
            tokio::spawn(async move {
                let outcome = match client.delete_user(&id).await {
                    Ok(()) => ApiOutcome::Deleted,
                    Err(e) => {
                        warn!(error = %e, "delete request failed");
                        ApiOutcome::DeleteFailed(e.user_message())
                    }
                };
                let _ = tx.send(AppEvent::Api(outcome));
            });
        }
    }
}

/// Arm a 3 s timer that will clear the notice. One timer per notify call;
/// none are ever cancelled.
pub fn schedule_notice_expiry(tx: &UnboundedSender<AppEvent>) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(NOTICE_TTL).await;
        let _ = tx.send(AppEvent::NoticeExpired);
    });
}

/// Forward terminal input into the event channel from a plain thread, so the
/// loop can await input and API outcomes on the same receiver.
fn spawn_input_thread(tx: UnboundedSender<AppEvent>) {
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if tx.send(AppEvent::Input(key)).is_err() {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if tx.send(AppEvent::Redraw).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, "input thread stopping");
                    break;
                }
            }
        }
    });
}
