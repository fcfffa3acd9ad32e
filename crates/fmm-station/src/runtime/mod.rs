mod app;
mod config;
mod logging;
mod session;
mod telemetry;

pub use app::run_from_args;
