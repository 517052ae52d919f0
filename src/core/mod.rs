//! Core types shared across the guard
//!
//! - `CheckContext` - Caller state handed to prompt handlers
//! - `GuardError` - Error types

pub mod context;
pub mod error;

pub use context::CheckContext;
pub use error::{GuardError, GuardResult};
