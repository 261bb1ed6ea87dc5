pub mod config;
pub mod error;
pub mod notify;
pub mod record;
pub mod schedule;
pub mod window;
