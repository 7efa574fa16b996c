use egui_kittest::Harness;
use roster_business::{Role, SessionState};
use roster_ui::RosterApp;
use roster_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestCtx<'a> {
    /// Mock server must be retained to keep HTTP endpoints alive during tests.
    #[allow(dead_code)]
    pub mock_server: MockServer,
    harness: Harness<'a, RosterApp>,
}

impl<'a> TestCtx<'a> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, RosterApp> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, RosterApp> {
        &self.harness
    }

    /// App harness over a server the test has already configured, signed in
    /// as an administrator.
    pub async fn new_app_with_server(mock_server: MockServer) -> Self {
        let state = State::test(mock_server.uri());
        Self::from_parts(mock_server, state)
    }

    /// App harness against a healthy directory whose profile listing
    /// returns `users`.
    #[allow(unused)]
    pub async fn new_app_with_users(users: serde_json::Value) -> Self {
        let mock_server = start_directory(users).await;
        let state = State::test(mock_server.uri());
        Self::from_parts(mock_server, state)
    }

    /// App harness signed in with a non-administrator session.
    #[allow(unused)]
    pub async fn new_app_denied() -> Self {
        let mock_server = start_directory(serde_json::json!([])).await;
        let state = State::test_with_session(
            mock_server.uri(),
            SessionState::new("viewer", Role::User),
        );
        Self::from_parts(mock_server, state)
    }

    fn from_parts(mock_server: MockServer, state: State) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let harness = Harness::new_eframe(|cc| RosterApp::new(state, &cc.egui_ctx));

        Self {
            mock_server,
            harness,
        }
    }

    /// Steps `frames` frames with short sleeps in between so spawned
    /// commands get a chance to finish.
    pub async fn pump(&mut self, frames: usize) {
        for _ in 0..frames {
            self.harness.step();
            tokio::time::sleep(std::time::Duration::from_millis(25)).await;
        }
    }
}

/// Starts a mock directory service: a healthy `/health` endpoint and a
/// profile listing that returns `users`. Tests mount any further mocks on
/// the returned server before building the harness.
pub async fn start_directory(users: serde_json::Value) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users))
        .mount(&mock_server)
        .await;

    mock_server
}
