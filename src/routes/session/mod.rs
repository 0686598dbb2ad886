mod handler;

pub use handler::{elevated, health, whoami};
