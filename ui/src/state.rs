use roster_business::{
    ApiHealth, AppConfig, CheckApiHealthCommand, DeleteUserCommand, FetchUsersCommand,
    FetchUsersCompute, FilterCriteria, Role, Route, SaveUserCommand, SessionState,
    UserActionCompute, UserActionInput, UsersState, VisibleUsersCompute,
};
use roster_states::{StateCtx, Time};

/// The main application state.
///
/// Everything the pages render from lives inside the [`StateCtx`]; this
/// struct exists so the app and the test harnesses share one wiring point.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
}

fn build_ctx(config: AppConfig, session: SessionState) -> StateCtx {
    let mut ctx = StateCtx::new();

    // The route is derived from the session once at startup; a non-admin
    // session never reaches the users page.
    let route = Route::for_session(&session);

    ctx.add_state(Time::default());
    ctx.add_state(config);
    ctx.add_state(session);
    ctx.add_state(route);
    ctx.add_state(UsersState::default());
    ctx.add_state(FilterCriteria::default());
    ctx.add_state(UserActionInput::default());

    ctx.record_compute(ApiHealth::default());
    ctx.record_compute(FetchUsersCompute::default());
    ctx.record_compute(VisibleUsersCompute::default());
    ctx.record_compute(UserActionCompute::default());

    ctx.record_command(CheckApiHealthCommand);
    ctx.record_command(FetchUsersCommand);
    ctx.record_command(SaveUserCommand);
    ctx.record_command(DeleteUserCommand);

    ctx
}

impl Default for State {
    fn default() -> Self {
        Self {
            ctx: build_ctx(AppConfig::load(), SessionState::load()),
        }
    }
}

impl State {
    /// A context pointed at `base_url` with an admin session, for tests.
    pub fn test(base_url: String) -> Self {
        Self::test_with_session(base_url, SessionState::new("test-admin", Role::Admin))
    }

    pub fn test_with_session(base_url: String, session: SessionState) -> Self {
        Self {
            ctx: build_ctx(AppConfig::new(base_url), session),
        }
    }
}
