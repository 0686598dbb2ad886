mod handler;
mod model;

pub use handler::{issue, renew, revoke, status};
