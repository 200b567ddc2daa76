// ABOUTME: Library root for ecsroll - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod credentials;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod types;
pub mod verify;
