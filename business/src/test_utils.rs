//! Test utilities for business layer testing with mock servers.
//!
//! This module provides helpers to set up mock HTTP servers and test the
//! business commands (FetchUsers, SaveUser, DeleteUser, CheckApiHealth)
//! without hitting the real directory service.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{TestContext, sample_user};
//!
//! #[tokio::test]
//! async fn test_fetch_users() {
//!     let mut test_ctx = TestContext::new().await;
//!
//!     // Mount a mock response for the profile listing endpoint
//!     test_ctx.mock_list_profiles(vec![sample_user("u_1", "alice")]).await;
//!
//!     // Execute the command and wait for the cache to land
//!     test_ctx.ctx.dispatch::<FetchUsersCommand>();
//!     test_ctx
//!         .wait_until(|ctx| ctx.cached::<FetchUsersCompute>().unwrap().users().is_some())
//!         .await;
//! }
//! ```

#![cfg(all(test, not(target_arch = "wasm32")))]

use std::time::{Duration, Instant};

use chrono::{TimeZone as _, Utc};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use roster_states::{StateCtx, Time};

use crate::api_health::{ApiHealth, CheckApiHealthCommand};
use crate::config::AppConfig;
use crate::directory::{
    AccountStatus, DeleteUserCommand, FetchUsersCommand, FetchUsersCompute, FilterCriteria, Role,
    SaveUserCommand, UserActionCompute, UserActionInput, UserRecord, UsersState,
    VisibleUsersCompute,
};

/// Test context that holds a mock server and a configured StateCtx.
pub struct TestContext {
    /// The mock server instance.
    pub mock_server: MockServer,
    /// The state context configured to use the mock server.
    pub ctx: StateCtx,
}

impl TestContext {
    /// Create a new test context with a fresh mock server.
    pub async fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mock_server = MockServer::start().await;
        let config = AppConfig::new(mock_server.uri());
        let ctx = build_test_state_ctx(config);

        Self { mock_server, ctx }
    }

    /// Poll the context until `condition` holds, syncing published results
    /// between polls. Command futures run on the shared background runtime,
    /// so waiting is observation, not draining.
    ///
    /// Panics after five seconds.
    pub async fn wait_until(&mut self, condition: impl Fn(&StateCtx) -> bool) {
        let timeout = Duration::from_secs(5);
        let start = Instant::now();

        loop {
            self.ctx.run_computed();
            if condition(&self.ctx) {
                return;
            }
            if start.elapsed() > timeout {
                panic!("Timed out waiting for test condition");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    // =========================================================================
    // Mock endpoint helpers
    // =========================================================================

    /// Mock the profile listing endpoint.
    pub async fn mock_list_profiles(&self, users: Vec<UserRecord>) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/profiles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users))
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the profile listing endpoint with an error.
    pub async fn mock_list_profiles_error(&self, status: u16, error: &str) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/profiles"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(serde_json::json!({"message": error})),
            )
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the identity store update endpoint.
    pub async fn mock_identity_update(&self, user_id: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/auth/v1/admin/users/{user_id}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the profile store update endpoint.
    pub async fn mock_profile_update(&self, user_id: &str, status: u16) {
        Mock::given(method("PUT"))
            .and(path(format!("/rest/v1/profiles/{user_id}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the identity store delete endpoint.
    pub async fn mock_identity_delete(&self, user_id: &str, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(format!("/auth/v1/admin/users/{user_id}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the profile store delete endpoint.
    pub async fn mock_profile_delete(&self, user_id: &str, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(format!("/rest/v1/profiles/{user_id}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    /// Mock the health endpoint.
    pub async fn mock_health(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }
}

/// Build a StateCtx configured for testing with all necessary states,
/// computes and commands.
fn build_test_state_ctx(config: AppConfig) -> StateCtx {
    let mut ctx = StateCtx::new();

    // Config and time
    ctx.add_state(config);
    ctx.add_state(Time::default());

    // Users page states and computes
    ctx.add_state(UsersState::default());
    ctx.add_state(FilterCriteria::default());
    ctx.add_state(UserActionInput::default());
    ctx.record_compute(FetchUsersCompute::default());
    ctx.record_compute(UserActionCompute::default());
    ctx.record_compute(VisibleUsersCompute::default());

    // Health probe
    ctx.record_compute(ApiHealth::default());

    // Commands
    ctx.record_command(FetchUsersCommand);
    ctx.record_command(SaveUserCommand);
    ctx.record_command(DeleteUserCommand);
    ctx.record_command(CheckApiHealthCommand);

    ctx
}

/// Helper to create a sample UserRecord for testing.
pub fn sample_user(id: &str, username: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        role: Role::User,
        status: AccountStatus::Active,
        created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    }
}
