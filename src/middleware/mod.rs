mod auth;
mod error_handler;
mod service;

pub use auth::{AuthContext, RENEWAL_TOKEN_HEADER, auth_middleware};
pub use error_handler::log_errors;
pub use service::{SERVICE_SECRET_HEADER, service_auth_middleware};
