//! Terminal front end: colored output and the interactive prompt handler

mod console;

pub use console::{Console, ConsolePromptHandler};
