//! Presentation layer for boardroom
//!
//! This crate contains the HTTP API, CLI definitions, console output
//! formatting, and the scripted board simulation.

pub mod api;
pub mod cli;
pub mod output;
pub mod simulate;

// Re-export commonly used types
pub use api::{ApiError, ApiResponse, ApiResult, AppState, create_router};
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use simulate::{Scenario, Simulation, SimulationError, SimulationReport};
