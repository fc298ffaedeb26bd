// Integration tests for userdir-manager

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use userdir_manager::api::{DirectoryClient, User, UserDraft, UserId};
use userdir_manager::app::keymap::Keymap;
use userdir_manager::app::update::{
    AppEvent, Effect, NOTICE_TTL, dispatch, handle_event, schedule_notice_expiry,
};
use userdir_manager::app::{AppState, NoticeKind, Theme};
use userdir_manager::ui::render;

fn test_app() -> AppState {
    AppState::new(Theme::dark(), Keymap::default())
}

fn buffer_text(backend: &TestBackend) -> String {
    let buf = backend.buffer();
    let mut out = String::new();
    for y in buf.area.top()..buf.area.bottom() {
        for x in buf.area.left()..buf.area.right() {
            out.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
        }
        out.push('\n');
    }
    out
}

// 1) The list call returns exactly the server's data array, in order
#[tokio::test]
async fn list_users_matches_server_data_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 2, "name": "Bob", "email": "b@x.com"},
                {"id": 1, "name": "Ann", "email": "a@x.com"},
                {"id": "66f", "name": "Cay", "email": "c@x.com"}
            ]
        })))
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&format!("{}/api/users", server.uri())).unwrap();
    let users = client.list_users().await.unwrap();

    assert_eq!(
        users,
        vec![
            User { id: UserId::Int(2), name: "Bob".into(), email: "b@x.com".into() },
            User { id: UserId::Int(1), name: "Ann".into(), email: "a@x.com".into() },
            User { id: UserId::Text("66f".into()), name: "Cay".into(), email: "c@x.com".into() },
        ]
    );
}

// 2) A rejected create surfaces the server message and keeps the dialog open
#[tokio::test]
async fn create_failure_surfaces_server_message_and_keeps_dialog() {
    let server = MockServer::start().await;
    let draft = UserDraft { name: "Ann".into(), email: "a@x.com".into() };
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(body_json(json!({"name": "Ann", "email": "a@x.com"})))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "Email taken"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&format!("{}/api/users", server.uri())).unwrap();
    let mut app = test_app();
    app.open_create_form();
    app.dialog.as_mut().unwrap().draft = draft.clone();

    let (tx, mut rx) = mpsc::unbounded_channel();
    dispatch(Effect::SubmitCreate(draft.clone()), &client, &tx);

    let event = rx.recv().await.expect("api outcome");
    let effects = handle_event(&mut app, event);

    assert!(!effects.contains(&Effect::FetchUsers));
    let dialog = app.dialog.as_ref().expect("dialog still open");
    assert_eq!(dialog.draft, draft);
    let notice = app.notice.as_ref().expect("notice set");
    assert_eq!(notice.text, "Email taken");
    assert_eq!(notice.kind, NoticeKind::Error);
}

// 3) A successful delete triggers exactly one re-fetch of the collection
#[tokio::test]
async fn delete_success_refetches_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 2, "name": "Bob", "email": "b@x.com"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&format!("{}/api/users", server.uri())).unwrap();
    let mut app = test_app();

    let (tx, mut rx) = mpsc::unbounded_channel();
    dispatch(Effect::SubmitDelete(UserId::Int(1)), &client, &tx);

    let event = rx.recv().await.expect("delete outcome");
    let effects = handle_event(&mut app, event);

    let fetches: Vec<_> = effects.iter().filter(|e| **e == Effect::FetchUsers).collect();
    assert_eq!(fetches.len(), 1);
    let notice = app.notice.as_ref().expect("notice set");
    assert_eq!(notice.text, "User deleted successfully!");
    assert_eq!(notice.kind, NoticeKind::Success);

    // Execute only the re-fetch; the wiremock expectation pins it to one call
    dispatch(Effect::FetchUsers, &client, &tx);
    let event = rx.recv().await.expect("list outcome");
    handle_event(&mut app, event);
    assert_eq!(app.users.len(), 1);
    assert_eq!(app.users[0].name, "Bob");
}

// 4) A non-2xx body without the expected message field falls back gracefully
#[tokio::test]
async fn malformed_error_payload_falls_back_to_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&format!("{}/api/users", server.uri())).unwrap();
    let draft = UserDraft { name: "Bob".into(), email: "b@x.com".into() };
    let err = client.update_user(&UserId::Int(2), &draft).await.unwrap_err();

    assert_eq!(err.user_message(), "request failed with status 500");
}

// 5) Notice expiry fires after exactly 3000 ms of simulated time
#[tokio::test(start_paused = true)]
async fn notice_expires_after_ttl_of_simulated_time() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let armed_at = tokio::time::Instant::now();
    schedule_notice_expiry(&tx);

    let event = rx.recv().await.expect("expiry event");
    assert!(matches!(event, AppEvent::NoticeExpired));
    assert_eq!(armed_at.elapsed(), NOTICE_TTL);

    let mut app = test_app();
    app.set_notice("User added successfully!", NoticeKind::Success);
    let effects = handle_event(&mut app, event);
    assert!(effects.is_empty());
    assert!(app.notice.is_none());
}

// 6) The rendered table shows the user's cells and both action controls
#[test]
fn rendered_table_contains_row_cells_and_action_controls() {
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).expect("create terminal");
    let mut app = test_app();
    app.replace_users(vec![User {
        id: UserId::Int(1),
        name: "Ann".into(),
        email: "a@x.com".into(),
    }]);

    terminal
        .draw(|f| {
            render(f, &mut app);
        })
        .expect("render frame");

    let text = buffer_text(terminal.backend());
    assert!(text.contains("Ann"), "missing name cell:\n{text}");
    assert!(text.contains("a@x.com"), "missing email cell:\n{text}");
    assert!(text.contains("[e]dit"), "missing edit control:\n{text}");
    assert!(text.contains("[d]el"), "missing delete control:\n{text}");
}

// 7) Rendering with an empty collection and an open dialog doesn't panic
#[test]
fn render_smoke_with_empty_data_and_dialog() {
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).expect("create terminal");
    let mut app = test_app();
    app.open_create_form();

    terminal
        .draw(|f| {
            render(f, &mut app);
        })
        .expect("render frame with empty data");

    let text = buffer_text(terminal.backend());
    assert!(text.contains("Add user"));
}

// 8) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use std::{fs, path::PathBuf, time::{SystemTime, UNIX_EPOCH}};

    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("udm_theme_{}_{}.conf", std::process::id(), nonce));
    let path_str = path.to_string_lossy().to_string();

    let t = Theme::mocha();
    t.write_file(&path_str).expect("write theme");
    let t2 = Theme::from_file(&path_str).expect("read theme");
    assert_eq!(format!("{:?}", t.text), format!("{:?}", t2.text));
    assert_eq!(format!("{:?}", t.success), format!("{:?}", t2.success));
    assert_eq!(format!("{:?}", t.error), format!("{:?}", t2.error));

    // load_or_init creates file if missing
    let mut p2 = PathBuf::from(&path_str);
    p2.set_file_name(format!("{}_init.conf", p2.file_stem().unwrap().to_string_lossy()));
    let p2_str = p2.to_string_lossy().to_string();
    let _ = fs::remove_file(&p2_str);
    let _created = Theme::load_or_init(&p2_str);
    assert!(PathBuf::from(&p2_str).exists());

    let _ = fs::remove_file(&path_str);
    let _ = fs::remove_file(&p2_str);
}

// 9) Keymap config roundtrip: written file loads back with overrides applied
#[test]
fn keymap_roundtrip_and_overrides() {
    use std::{fs, time::{SystemTime, UNIX_EPOCH}};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use userdir_manager::app::keymap::KeyAction;

    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("udm_keys_{}_{}.conf", std::process::id(), nonce));
    let p = path.to_string_lossy().to_string();

    let km = Keymap::default();
    km.write_file(&p).expect("write keymap");
    let loaded = Keymap::from_file(&p).expect("load keymap");
    let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
    assert_eq!(loaded.resolve(&quit), Some(KeyAction::Quit));

    // A user override on top of the written file takes effect
    let mut contents = fs::read_to_string(&p).unwrap();
    contents.push_str("Refresh = F\n");
    fs::write(&p, contents).unwrap();
    let loaded = Keymap::from_file(&p).expect("reload keymap");
    let f_key = KeyEvent::new(KeyCode::Char('F'), KeyModifiers::NONE);
    assert_eq!(loaded.resolve(&f_key), Some(KeyAction::Refresh));

    let _ = fs::remove_file(&p);
}
