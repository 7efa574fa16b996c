mod api_health;
mod config;
mod http;
mod route;
mod session;
mod test_utils;
mod tests;

pub mod directory;

pub use api_health::{ApiAvailability, ApiHealth, CheckApiHealthCommand};
pub use config::AppConfig;
pub use directory::{
    AccountStatus, DeleteUserCommand, EditDraft, FetchUsersCommand, FetchUsersCompute,
    FetchUsersResult, FilterCriteria, Role, SaveUserCommand, UserActionCompute, UserActionInput,
    UserActionKind, UserActionState, UserDialog, UserRecord, UsersState, VisibleUsersCompute,
    filter_users,
};
pub use route::Route;
pub use session::SessionState;

pub use roster_utils::version_info;
