//! Shared harness for widget unit tests.
//!
//! Pairs an [`egui_kittest::Harness`] with a [`wiremock::MockServer`] that
//! stands in for the directory service. The server lives as long as the
//! `TestCtx`, so expectations set on it are verified when the test drops it.

use egui_kittest::Harness;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::state::State;

pub struct TestCtx<'a> {
    _mock_server: MockServer,
    harness: Harness<'a, State>,
}

impl<'a> TestCtx<'a> {
    /// Harness against a healthy directory with no users.
    pub async fn new(app: impl FnMut(&mut egui::Ui, &mut State) + 'a) -> Self {
        Self::new_with_users(app, serde_json::json!([])).await
    }

    /// Harness against a healthy directory whose profile listing returns
    /// `users` (the wire-format JSON array).
    pub async fn new_with_users(
        app: impl FnMut(&mut egui::Ui, &mut State) + 'a,
        users: serde_json::Value,
    ) -> Self {
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

        let state = State::test(mock_server.uri());
        let harness = Harness::new_ui_state(app, state);

        Self {
            _mock_server: mock_server,
            harness,
        }
    }

    /// Harness against a directory that answers every GET with
    /// `status_code`.
    pub async fn new_with_status(
        app: impl FnMut(&mut egui::Ui, &mut State) + 'a,
        status_code: u16,
    ) -> Self {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status_code))
            .mount(&mock_server)
            .await;

        let state = State::test(mock_server.uri());
        let harness = Harness::new_ui_state(app, state);

        Self {
            _mock_server: mock_server,
            harness,
        }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, State> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, State> {
        &self.harness
    }
}
