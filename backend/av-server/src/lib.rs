pub mod api;
pub mod device;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod server_state;

#[cfg(test)]
mod tests;

pub use api::{
    audit_log::{RecentLogsQuery, recent_logs},
    caller::resolve_caller,
    commands::{execute_command, query_control},
    error::{ApiError, Result as ApiResult},
    middleware::audit_commands,
    status::device_status,
};
pub use device::{DeviceCommands, MockDevice};
pub use error::{Result as ServerResult, ServerError};
pub use routes::build_router;
pub use server_state::ServerState;
