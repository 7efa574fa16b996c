//! Command flow tests against a mock directory service.

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use crate::directory::{
        DeleteUserCommand, EditDraft, FetchUsersCommand, FetchUsersCompute, FetchUsersResult,
        Role, SaveUserCommand, UserActionCompute, UserActionInput, UserActionKind,
        UserActionState,
    };
    use crate::test_utils::{TestContext, sample_user};
    use chrono::{Duration, TimeZone as _, Utc};
    use ustr::Ustr;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn fill_save_input(test_ctx: &mut TestContext) {
        test_ctx.ctx.update::<UserActionInput>(|input| {
            input.user_id = Some(Ustr::from("u_1"));
            input.username = Some(Ustr::from("alice"));
            input.draft = Some(EditDraft {
                username: "alice2".to_string(),
                email: "alice2@example.com".to_string(),
                role: Role::Moderator,
            });
            input.previous = Some(EditDraft {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                role: Role::User,
            });
        });
    }

    fn action_state(test_ctx: &TestContext) -> UserActionState {
        test_ctx
            .ctx
            .cached::<UserActionCompute>()
            .expect("action cache is registered")
            .state()
            .clone()
    }

    #[tokio::test]
    async fn test_fetch_users_sorts_newest_first() {
        let mut test_ctx = TestContext::new().await;

        let mut older = sample_user("u_old", "olivia");
        older.created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut newer = sample_user("u_new", "noah");
        newer.created_at = older.created_at + Duration::days(30);

        // Served oldest first; the command re-sorts.
        test_ctx.mock_list_profiles(vec![older, newer]).await;

        test_ctx.ctx.dispatch::<FetchUsersCommand>();
        test_ctx
            .wait_until(|ctx| {
                ctx.cached::<FetchUsersCompute>()
                    .is_some_and(|cache| cache.users().is_some())
            })
            .await;

        let cache = test_ctx.ctx.cached::<FetchUsersCompute>().unwrap();
        let users = cache.users().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "u_new");
        assert_eq!(users[1].id, "u_old");
    }

    #[tokio::test]
    async fn test_fetch_users_error_carries_body_message() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.mock_list_profiles_error(500, "downstream down").await;

        test_ctx.ctx.dispatch::<FetchUsersCommand>();
        test_ctx
            .wait_until(|ctx| {
                ctx.cached::<FetchUsersCompute>()
                    .is_some_and(|cache| cache.error_message().is_some())
            })
            .await;

        let cache = test_ctx.ctx.cached::<FetchUsersCompute>().unwrap();
        let message = cache.error_message().unwrap();
        assert!(message.contains("downstream down"), "got: {message}");
        assert!(message.contains("500"), "got: {message}");
    }

    #[tokio::test]
    async fn test_fetch_users_empty_directory_is_loaded_not_error() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.mock_list_profiles(vec![]).await;

        test_ctx.ctx.dispatch::<FetchUsersCommand>();
        test_ctx
            .wait_until(|ctx| {
                !matches!(
                    ctx.cached::<FetchUsersCompute>().unwrap().result,
                    FetchUsersResult::Idle | FetchUsersResult::Loading
                )
            })
            .await;

        let cache = test_ctx.ctx.cached::<FetchUsersCompute>().unwrap();
        assert_eq!(cache.result, FetchUsersResult::Loaded(vec![]));
    }

    #[tokio::test]
    async fn test_save_updates_identity_then_profile() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.mock_identity_update("u_1", 200).await;
        test_ctx.mock_profile_update("u_1", 204).await;

        fill_save_input(&mut test_ctx);
        test_ctx.ctx.dispatch::<SaveUserCommand>();
        test_ctx
            .wait_until(|ctx| {
                !matches!(
                    ctx.cached::<UserActionCompute>().unwrap().state(),
                    UserActionState::Idle | UserActionState::InFlight { .. }
                )
            })
            .await;

        match action_state(&test_ctx) {
            UserActionState::Success {
                kind, id, draft, ..
            } => {
                assert_eq!(kind, UserActionKind::Save);
                assert_eq!(id.as_str(), "u_1");
                let draft = draft.expect("save success carries the applied draft");
                assert_eq!(draft.username, "alice2");
                assert_eq!(draft.role, Role::Moderator);
            }
            other => panic!("expected save success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_save_aborts_before_profile_when_identity_rejects() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.mock_identity_update("u_1", 500).await;

        // The profile store must never be touched when phase one fails.
        Mock::given(method("PUT"))
            .and(path("/rest/v1/profiles/u_1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&test_ctx.mock_server)
            .await;

        fill_save_input(&mut test_ctx);
        test_ctx.ctx.dispatch::<SaveUserCommand>();
        test_ctx
            .wait_until(|ctx| {
                matches!(
                    ctx.cached::<UserActionCompute>().unwrap().state(),
                    UserActionState::Error { .. }
                )
            })
            .await;

        match action_state(&test_ctx) {
            UserActionState::Error { kind, message, .. } => {
                assert_eq!(kind, UserActionKind::Save);
                assert!(message.contains("identity update failed"), "got: {message}");
            }
            other => panic!("expected save error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_save_rolls_back_identity_when_profile_fails() {
        let mut test_ctx = TestContext::new().await;

        // Two identity PUTs: the update and the rollback.
        Mock::given(method("PUT"))
            .and(path("/auth/v1/admin/users/u_1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&test_ctx.mock_server)
            .await;
        test_ctx.mock_profile_update("u_1", 500).await;

        fill_save_input(&mut test_ctx);
        test_ctx.ctx.dispatch::<SaveUserCommand>();
        test_ctx
            .wait_until(|ctx| {
                matches!(
                    ctx.cached::<UserActionCompute>().unwrap().state(),
                    UserActionState::Error { .. }
                )
            })
            .await;

        match action_state(&test_ctx) {
            UserActionState::Error { kind, message, .. } => {
                assert_eq!(kind, UserActionKind::Save);
                assert!(message.contains("profile update failed"), "got: {message}");
                assert!(message.contains("rolled back"), "got: {message}");
            }
            other => panic!("expected save error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_identity_and_profile() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.mock_identity_delete("u_1", 204).await;
        test_ctx.mock_profile_delete("u_1", 204).await;

        test_ctx.ctx.update::<UserActionInput>(|input| {
            input.user_id = Some(Ustr::from("u_1"));
            input.username = Some(Ustr::from("alice"));
        });
        test_ctx.ctx.dispatch::<DeleteUserCommand>();
        test_ctx
            .wait_until(|ctx| {
                matches!(
                    ctx.cached::<UserActionCompute>().unwrap().state(),
                    UserActionState::Success { .. }
                )
            })
            .await;

        match action_state(&test_ctx) {
            UserActionState::Success {
                kind, id, draft, ..
            } => {
                assert_eq!(kind, UserActionKind::Delete);
                assert_eq!(id.as_str(), "u_1");
                assert!(draft.is_none());
            }
            other => panic!("expected delete success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_retry_converges_after_partial_failure() {
        let mut test_ctx = TestContext::new().await;
        test_ctx.mock_identity_delete("u_1", 204).await;
        test_ctx.mock_profile_delete("u_1", 500).await;

        test_ctx.ctx.update::<UserActionInput>(|input| {
            input.user_id = Some(Ustr::from("u_1"));
            input.username = Some(Ustr::from("alice"));
        });
        test_ctx.ctx.dispatch::<DeleteUserCommand>();
        test_ctx
            .wait_until(|ctx| {
                matches!(
                    ctx.cached::<UserActionCompute>().unwrap().state(),
                    UserActionState::Error { .. }
                )
            })
            .await;

        match action_state(&test_ctx) {
            UserActionState::Error { message, .. } => {
                assert!(message.contains("retry"), "got: {message}");
            }
            other => panic!("expected delete error, got {other:?}"),
        }

        // Retry: the identity record is already gone (404), which deletes
        // treat as success; the profile delete now goes through.
        test_ctx.mock_server.reset().await;
        test_ctx.mock_identity_delete("u_1", 404).await;
        test_ctx.mock_profile_delete("u_1", 204).await;

        test_ctx.ctx.dispatch::<DeleteUserCommand>();
        test_ctx
            .wait_until(|ctx| {
                matches!(
                    ctx.cached::<UserActionCompute>().unwrap().state(),
                    UserActionState::Success {
                        kind: UserActionKind::Delete,
                        ..
                    }
                )
            })
            .await;
    }

    #[tokio::test]
    async fn test_save_without_target_reports_missing_field() {
        let mut test_ctx = TestContext::new().await;

        test_ctx.ctx.dispatch::<SaveUserCommand>();
        test_ctx
            .wait_until(|ctx| {
                matches!(
                    ctx.cached::<UserActionCompute>().unwrap().state(),
                    UserActionState::Error { .. }
                )
            })
            .await;

        match action_state(&test_ctx) {
            UserActionState::Error { message, .. } => {
                assert_eq!(
                    message,
                    "SaveUserCommand: missing required input field `user_id`"
                );
            }
            other => panic!("expected input error, got {other:?}"),
        }
    }
}
