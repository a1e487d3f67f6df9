//! Integration tests for the HTTP submission client and a full wizard run.
//!
//! Each test spins up an Axum fake backend on a random port and drives the
//! real `reqwest` client against it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use register_wizard::client::{HttpSubmissionClient, SubmissionClient};
use register_wizard::error::SubmissionError;
use register_wizard::photo::NoCamera;
use register_wizard::registration::wizard::{MSG_REGISTER_FAILED, MSG_REGISTERED};
use register_wizard::registration::{
    FormField, IdentityField, RecoveryPart, RecoverySlot, RegistrationRecord, RegistrationWizard,
    SubmitOutcome, WizardDeps, WizardStep,
};
use register_wizard::session::{Navigator, Route, SessionStore};

const TIMEOUT: Duration = Duration::from_secs(5);

/// What the fake backend answers with.
#[derive(Clone, Copy)]
enum Backend {
    Accept,
    Reject,
    NoUser,
}

#[derive(Clone)]
struct FakeState {
    mode: Backend,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn register(State(state): State<FakeState>, Json(body): Json<Value>) -> (StatusCode, String) {
    state.received.lock().unwrap().push(body.clone());
    match state.mode {
        Backend::Accept => (
            StatusCode::CREATED,
            json!({"user": {"id": 1, "username": body["username"]}}).to_string(),
        ),
        Backend::Reject => (StatusCode::CONFLICT, "username taken".to_string()),
        Backend::NoUser => (StatusCode::OK, json!({"message": "ok"}).to_string()),
    }
}

/// Start a fake backend; return (register URL, captured request bodies).
async fn start_backend(mode: Backend) -> (String, Arc<Mutex<Vec<Value>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route("/register", post(register)).with_state(FakeState {
        mode,
        received: Arc::clone(&received),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{port}/register"), received)
}

#[derive(Default)]
struct Routes(Mutex<Vec<Route>>);

impl Navigator for Routes {
    fn navigate(&self, route: Route) {
        self.0.lock().unwrap().push(route);
    }
}

fn filled_record() -> RegistrationRecord {
    let mut record = RegistrationRecord::default();
    for field in IdentityField::ALL {
        record.set(FormField::Identity(field), format!("{}-value", field.name()));
    }
    record.photo = "data:image/png;base64,YWJj".into();
    record.skills = vec!["Rust".into()];
    record.recovery_q1.question = "What city were you born in?".into();
    record.recovery_q1.answer = "Paris".into();
    record.recovery_q2.question = "What is your mother's maiden name?".into();
    record.recovery_q2.answer = "Smith".into();
    record
}

#[tokio::test]
async fn client_posts_full_record() {
    let (url, received) = start_backend(Backend::Accept).await;
    let client = HttpSubmissionClient::new(url, TIMEOUT).unwrap();

    let user = client.register(&filled_record()).await.unwrap();
    assert_eq!(user.user["username"], "username-value");
    assert_eq!(user.display_name(), Some("username-value"));

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["password"], "password-value");
    assert_eq!(body["phone_number"], "phone_number-value");
    assert_eq!(body["photo"], "data:image/png;base64,YWJj");
    assert_eq!(body["skills"], json!(["Rust"]));
    assert_eq!(body["recovery_q1"], json!({"question": "What city were you born in?", "answer": "Paris"}));
    assert_eq!(body["recovery_q2"]["answer"], "Smith");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let (url, _) = start_backend(Backend::Reject).await;
    let client = HttpSubmissionClient::new(url, TIMEOUT).unwrap();

    match client.register(&filled_record()).await {
        Err(SubmissionError::Status { status, body }) => {
            assert_eq!(status, 409);
            assert_eq!(body, "username taken");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn success_without_user_still_registers() {
    let (url, received) = start_backend(Backend::NoUser).await;
    let client = HttpSubmissionClient::new(url, TIMEOUT).unwrap();

    let user = client.register(&filled_record()).await.unwrap();
    assert!(user.user.is_null());
    assert_eq!(user.display_name(), None);
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_backend_is_request_failure() {
    // Bind and drop to get a port nobody is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client =
        HttpSubmissionClient::new(format!("http://127.0.0.1:{port}/register"), TIMEOUT).unwrap();
    let err = client.register(&filled_record()).await.unwrap_err();
    assert!(matches!(err, SubmissionError::RequestFailed { .. }), "{err:?}");
}

fn wizard_against(url: String) -> (RegistrationWizard, SessionStore, Arc<Routes>) {
    let session = SessionStore::new();
    let routes = Arc::new(Routes::default());
    let wizard = RegistrationWizard::new(WizardDeps {
        client: Arc::new(HttpSubmissionClient::new(url, TIMEOUT).unwrap()),
        camera: Arc::new(NoCamera),
        session: Arc::new(session.clone()),
        navigator: routes.clone(),
    });
    (wizard, session, routes)
}

async fn walk_to_recovery(wizard: &mut RegistrationWizard) {
    for field in IdentityField::ALL {
        wizard
            .edit_field(FormField::Identity(field), format!("{}-value", field.name()))
            .unwrap();
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("me.png");
    std::fs::write(&path, b"abc").unwrap();
    assert!(wizard.upload_photo(&path).await.unwrap());
    assert_eq!(wizard.advance().unwrap(), WizardStep::Skills);

    wizard.set_skill_input("Python");
    wizard.add_skill();
    wizard.set_skill_input("Python");
    wizard.add_skill();
    assert_eq!(wizard.record().skills, vec!["Python".to_string()]);
    assert_eq!(wizard.advance().unwrap(), WizardStep::Recovery);

    wizard
        .select_question(RecoverySlot::First, "What city were you born in?")
        .unwrap();
    wizard
        .edit_field(
            FormField::Recovery { slot: RecoverySlot::First, part: RecoveryPart::Answer },
            "Paris",
        )
        .unwrap();
    wizard
        .select_question(RecoverySlot::Second, "What is your mother's maiden name?")
        .unwrap();
    wizard
        .edit_field(
            FormField::Recovery { slot: RecoverySlot::Second, part: RecoveryPart::Answer },
            "Smith",
        )
        .unwrap();
}

#[tokio::test]
async fn wizard_registers_end_to_end() {
    let (url, received) = start_backend(Backend::Accept).await;
    let (mut wizard, session, routes) = wizard_against(url);

    walk_to_recovery(&mut wizard).await;
    assert_eq!(wizard.submit().await.unwrap(), SubmitOutcome::Registered);

    assert_eq!(wizard.success(), Some(MSG_REGISTERED));
    assert!(wizard.error().is_none());
    assert_eq!(wizard.step(), WizardStep::Submitted);
    assert_eq!(*routes.0.lock().unwrap(), vec![Route::Home]);
    assert_eq!(
        session.current_user().unwrap().user["username"],
        "username-value"
    );

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["skills"], json!(["Python"]));
    assert_eq!(bodies[0]["photo"], "data:image/png;base64,YWJj");
}

#[tokio::test]
async fn wizard_treats_userless_success_as_registered() {
    let (url, received) = start_backend(Backend::NoUser).await;
    let (mut wizard, session, routes) = wizard_against(url);

    walk_to_recovery(&mut wizard).await;
    assert_eq!(wizard.submit().await.unwrap(), SubmitOutcome::Registered);

    assert_eq!(wizard.success(), Some(MSG_REGISTERED));
    assert!(wizard.error().is_none());
    assert_eq!(wizard.step(), WizardStep::Submitted);
    assert_eq!(*routes.0.lock().unwrap(), vec![Route::Home]);
    assert!(session.current_user().unwrap().user.is_null());
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn wizard_failure_allows_retry() {
    let (url, received) = start_backend(Backend::Reject).await;
    let (mut wizard, session, routes) = wizard_against(url);

    walk_to_recovery(&mut wizard).await;
    assert_eq!(wizard.submit().await.unwrap(), SubmitOutcome::Failed);
    assert_eq!(wizard.error(), Some(MSG_REGISTER_FAILED));
    assert_eq!(wizard.step(), WizardStep::Recovery);
    assert!(session.current_user().is_none());
    assert!(routes.0.lock().unwrap().is_empty());

    assert_eq!(wizard.submit().await.unwrap(), SubmitOutcome::Failed);
    assert_eq!(received.lock().unwrap().len(), 2);
}
