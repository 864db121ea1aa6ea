use serde_json::json;
use sheguard_core::model::{
    DocPath, ONBOARDING_FLAG_KEY, OnboardingStatus, ReadinessSnapshot, Session, UserId,
};
use sheguard_core::nav::Screen;
use sheguard_core::shell::ShellState;
use storage::document::WriteMode;
use storage::repository::{DocumentStore, FlagStore, Storage};

use super::test_harness::{
    HarnessOptions, TEST_APP_ID, anonymous_session, completed_shell, registered_session,
    setup_app_harness, setup_login_harness, setup_shell_harness,
};

#[tokio::test(flavor = "current_thread")]
async fn cold_start_shows_loading_then_onboarding() {
    let mut harness =
        setup_app_harness(Storage::in_memory(), HarnessOptions { with_identity: false }).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Loading..."), "missing loading state in {html}");

    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("Welcome to SheGuard+"),
        "missing onboarding in {html}"
    );
    assert!(!html.contains("Welcome, stay safe."), "home leaked in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn onboarded_launch_goes_straight_home() {
    let storage = Storage::in_memory();
    storage
        .flags
        .set_flag(ONBOARDING_FLAG_KEY, "true")
        .await
        .expect("set flag");
    let mut harness = setup_app_harness(storage, HarnessOptions { with_identity: true }).await;
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Welcome, stay safe."), "missing home in {html}");
    assert!(html.contains("Location ON"), "missing location status in {html}");
    assert!(html.contains("Online"), "missing network status in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_status_labels_follow_readiness() {
    let mut harness = setup_shell_harness(
        completed_shell(),
        anonymous_session(),
        ReadinessSnapshot::default(),
    )
    .await;
    harness.rebuild();
    let html = harness.render();
    for label in ["Location OFF", "Offline", "Add Contacts"] {
        assert!(html.contains(label), "missing {label} in {html}");
    }

    let mut harness = setup_shell_harness(
        completed_shell(),
        anonymous_session(),
        ReadinessSnapshot {
            location_enabled: true,
            network_online: true,
            contacts_configured: true,
        },
    )
    .await;
    harness.rebuild();
    let html = harness.render();
    for label in ["Location ON", "Online", "View Contacts"] {
        assert!(html.contains(label), "missing {label} in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn onboarding_hides_navigation() {
    let mut shell = ShellState::new();
    shell.set_onboarding(OnboardingStatus::NotCompleted);
    shell.navigate_to(Screen::Settings);
    let mut harness =
        setup_shell_harness(shell, anonymous_session(), ReadinessSnapshot::default()).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Welcome to SheGuard+"), "missing carousel in {html}");
    assert!(!html.contains("SOS Message"), "settings leaked in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unresolved_session_keeps_loading() {
    let mut harness = setup_shell_harness(
        completed_shell(),
        Session::default(),
        ReadinessSnapshot::default(),
    )
    .await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Loading..."), "missing loading state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn menu_offers_login_to_anonymous_users() {
    let mut shell = completed_shell();
    shell.toggle_menu();
    let mut harness =
        setup_shell_harness(shell, anonymous_session(), ReadinessSnapshot::default()).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Emergency Contacts"), "missing entries in {html}");
    assert!(html.contains("Login / Sign Up"), "missing login entry in {html}");
    assert!(!html.contains("Logout"), "unexpected logout in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn menu_shows_email_and_logout_for_registered_users() {
    let mut shell = completed_shell();
    shell.toggle_menu();
    let mut harness = setup_shell_harness(
        shell,
        registered_session("u1", "me@example.com"),
        ReadinessSnapshot::default(),
    )
    .await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("me@example.com"), "missing email in {html}");
    assert!(html.contains("Logout"), "missing logout in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn back_on_home_renders_exit_prompt() {
    let mut shell = completed_shell();
    shell.handle_back();
    let mut harness =
        setup_shell_harness(shell, anonymous_session(), ReadinessSnapshot::default()).await;
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("Are you sure you want to exit?"),
        "missing exit prompt in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn contacts_view_lists_saved_contacts() {
    let mut shell = completed_shell();
    shell.navigate_to(Screen::Contacts);
    let mut harness = setup_shell_harness(
        shell,
        registered_session("u1", "me@example.com"),
        ReadinessSnapshot::default(),
    )
    .await;
    let path = DocPath::emergency_contacts(TEST_APP_ID, &UserId::new("u1")).expect("path");
    let doc = json!({"list": [{"id": "1", "name": "Mom", "phone": "+15550100"}]})
        .as_object()
        .cloned()
        .expect("object");
    harness
        .storage
        .documents
        .set_document(&path, doc, WriteMode::Replace)
        .await
        .expect("seed contacts");

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Mom"), "missing contact in {html}");
    assert!(html.contains("+15550100"), "missing phone in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn contacts_view_asks_anonymous_users_to_log_in() {
    let mut shell = completed_shell();
    shell.navigate_to(Screen::Contacts);
    let mut harness =
        setup_shell_harness(shell, anonymous_session(), ReadinessSnapshot::default()).await;
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("Log in to save emergency contacts."),
        "missing login hint in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn feature_screens_render_title_and_back() {
    let mut shell = completed_shell();
    shell.navigate_to(Screen::Helpline);
    let mut harness =
        setup_shell_harness(shell, anonymous_session(), ReadinessSnapshot::default()).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Helplines"), "missing title in {html}");
    assert!(html.contains("Back"), "missing back control in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn contacts_view_follows_writes_made_elsewhere() {
    let mut shell = completed_shell();
    shell.navigate_to(Screen::Contacts);
    let mut harness = setup_shell_harness(
        shell,
        registered_session("u1", "me@example.com"),
        ReadinessSnapshot::default(),
    )
    .await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("No emergency contacts yet."),
        "missing empty state in {html}"
    );

    let path = DocPath::emergency_contacts(TEST_APP_ID, &UserId::new("u1")).expect("path");
    let doc = json!({"list": [{"id": "c1", "name": "Mom", "phone": "+15550100"}]})
        .as_object()
        .cloned()
        .expect("object");
    harness
        .storage
        .documents
        .set_document(&path, doc, WriteMode::Replace)
        .await
        .expect("write contacts");

    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Mom"), "live update not rendered in {html}");
    assert!(
        !html.contains("No emergency contacts yet."),
        "stale empty state in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_lists_newest_alert_first() {
    let mut shell = completed_shell();
    shell.navigate_to(Screen::History);
    let mut harness = setup_shell_harness(
        shell,
        registered_session("u1", "me@example.com"),
        ReadinessSnapshot::default(),
    )
    .await;
    let path = DocPath::sos_history(TEST_APP_ID, &UserId::new("u1")).expect("path");
    let doc = json!({"entries": [
        {"id": "h1", "timestamp": "2026-01-01T09:00:00Z", "message": "older alert", "recipients": 1},
        {"id": "h2", "timestamp": "2026-01-02T09:00:00Z", "message": "newer alert", "recipients": 3},
    ]})
    .as_object()
    .cloned()
    .expect("object");
    harness
        .storage
        .documents
        .set_document(&path, doc, WriteMode::Replace)
        .await
        .expect("seed history");

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    let newer = html.find("newer alert").expect("newer entry rendered");
    let older = html.find("older alert").expect("older entry rendered");
    assert!(newer < older, "entries out of order in {html}");
    assert!(html.contains("Sent to 3 contacts"), "missing recipients in {html}");
    assert!(html.contains("Sent to 1 contact<"), "missing singular in {html}");
    assert!(html.contains("2026-01-02 09:00 UTC"), "missing date in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_shows_empty_state() {
    let mut shell = completed_shell();
    shell.navigate_to(Screen::History);
    let mut harness = setup_shell_harness(
        shell,
        registered_session("u1", "me@example.com"),
        ReadinessSnapshot::default(),
    )
    .await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("No SOS history found."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn report_view_offers_every_category() {
    let mut shell = completed_shell();
    shell.navigate_to(Screen::Report);
    let mut harness = setup_shell_harness(
        shell,
        registered_session("u1", "me@example.com"),
        ReadinessSnapshot::default(),
    )
    .await;
    harness.rebuild();
    let html = harness.render();
    for label in ["Harassment", "Stalking", "Other", "Report Anonymously", "Submit Report"] {
        assert!(html.contains(label), "missing {label} in {html}");
    }
    assert!(
        html.contains("category-chip category-chip--selected"),
        "no default category in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn report_view_needs_a_session() {
    let mut shell = completed_shell();
    shell.navigate_to(Screen::Report);
    let mut harness = setup_shell_harness(
        shell,
        Session::resolved(None),
        ReadinessSnapshot::default(),
    )
    .await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Sign in to file a report."), "missing hint in {html}");
    assert!(!html.contains("Submit Report"), "submit offered in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_explains_why_it_opened() {
    let mut harness = setup_login_harness("Please log in to use the SOS feature.").await;
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("Please log in to use the SOS feature."),
        "missing login reason in {html}"
    );
}
