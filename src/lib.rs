//! # Duskr Library
//!
//! Internal library for the duskr binary.
//!
//! This library exists to enable testing of internals and provide clean
//! separation between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Entry Point**: `Duskr` struct provides the application API
//! - **Decision Engine**: `engine` module, pure sunrise/sunset window logic
//! - **Scheduler**: `scheduler` module, background worker and one-shot trigger
//! - **Actuators**: `backend` module with GNOME and logging implementations
//! - **Geographic**: `geo` module for location resolution and sun times
//! - **Configuration**: `config` module for TOML-based settings
//! - **Commands**: `commands` module for CLI subcommands (apply, status, set)
//! - **Infrastructure**: logging and shared constants

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

// Public API modules
pub mod args;
pub mod backend;
pub mod commands;
pub mod config;
pub mod constants;
pub mod engine;
pub mod geo;
pub mod scheduler;

// Internal modules
mod app;

// Re-export for binary
pub use app::Duskr;
