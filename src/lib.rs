// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod composer;
pub mod config;
pub mod error;
pub mod language;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod stats;
