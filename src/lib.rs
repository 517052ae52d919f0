pub mod core;
pub mod permissions;
pub mod sandbox;

// Check-before-act entry point for tools
pub mod guard;

// Startup wiring
pub mod config;
pub mod logging;

// Optional terminal front end
pub mod cli;

pub use crate::core::{CheckContext, GuardError, GuardResult};
pub use guard::ToolGuard;
