pub mod app;
pub mod routes;
pub mod scheduler;
pub mod state;
