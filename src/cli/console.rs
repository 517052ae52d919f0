use async_trait::async_trait;
use colored::*;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::Mutex;

use crate::core::{CheckContext, GuardError, GuardResult};
use crate::permissions::{AuditEntry, PermissionRequest, PromptHandler, RiskLevel};

type InputLines = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;

/// Console handles all terminal I/O with colored formatting
///
/// Clones share one line reader, so the shell loop and the prompt handler
/// never split a line between them. Reads are cancel-safe: dropping a
/// pending read loses no input.
#[derive(Clone)]
pub struct Console {
    prompt_color: Color,
    tool_color: Color,
    input: Arc<Mutex<InputLines>>,
}

impl Console {
    /// Create a new Console reading from stdin
    pub fn new() -> Self {
        Self::with_input(BufReader::new(tokio::io::stdin()))
    }

    /// Create a new Console reading lines from `reader`
    pub fn with_input(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        let reader: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(reader);
        Self {
            prompt_color: Color::Cyan,
            tool_color: Color::Magenta,
            input: Arc::new(Mutex::new(reader.lines())),
        }
    }

    async fn next_line(&self) -> io::Result<Option<String>> {
        self.input.lock().await.next_line().await
    }

    /// Print a welcome banner
    pub fn print_banner(&self) {
        println!("{}", "=".repeat(60).bright_blue());
        println!("{}", "  Shadow Guard - tool authorization shell".bright_blue().bold());
        println!("{}", "=".repeat(60).bright_blue());
        println!();
        println!("Enter requests as: <permission> <resource> <operation...>");
        println!("Commands: grant <p>, revoke <p>, grant-all, revoke-all, mode <m>");
        println!("          audit [p], denials, quit");
        println!();
    }

    /// Print a system message
    pub fn print_system(&self, message: &str) {
        println!("{} {}", "System:".yellow().bold(), message);
    }

    /// Print an error message
    pub fn print_error(&self, error: &str) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }

    /// Print the outcome of a check
    pub fn print_decision(&self, request: &PermissionRequest, granted: bool) {
        let verdict = if granted {
            "✓ Granted".green().bold()
        } else {
            "✗ Denied".red().bold()
        };
        println!(
            "{} {} {} ({} risk)",
            verdict,
            request.permission.to_string().color(self.tool_color),
            request.resource,
            risk_label(request.risk)
        );
    }

    /// Print audit entries, oldest first
    pub fn print_audit(&self, entries: &[AuditEntry]) {
        if entries.is_empty() {
            println!("{}", "(no decisions yet)".bright_black());
            return;
        }
        for entry in entries {
            let mark = if entry.granted { "✓".green() } else { "✗".red() };
            println!(
                "{} {} [{}] {} {} - {}",
                entry.timestamp.format("%H:%M:%S").to_string().bright_black(),
                mark,
                entry.mode,
                entry.permission.to_string().color(self.tool_color),
                entry.resource,
                entry.operation
            );
        }
    }

    /// Read a line of input; returns None at end of input
    pub async fn read_input(&self) -> io::Result<Option<String>> {
        print!("{} ", ">".color(self.prompt_color).bold());
        io::stdout().flush()?;

        let line = self.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    /// Ask whether a request may proceed
    ///
    /// Anything other than yes, including end of input, is a denial.
    pub async fn ask_permission(&self, request: &PermissionRequest) -> io::Result<bool> {
        println!();
        println!("{}", "─".repeat(60).yellow());
        let tool = if request.tool_name.is_empty() {
            "unknown tool"
        } else {
            request.tool_name.as_str()
        };
        println!(
            "{} {} wants {} access",
            "⚠️ Permission Required".yellow().bold(),
            tool.color(self.tool_color).bold(),
            request.permission.to_string().bold()
        );
        println!();
        println!("  {}", request.operation);
        println!("  {}", request.resource.bright_black());
        if let Some(ref reason) = request.reason {
            println!("  {} {}", "Reason:".bright_black(), reason);
        }
        println!("  {} {}", "Risk:".bright_black(), risk_label(request.risk));
        println!();
        println!(
            "{}",
            "Approving grants this permission for the rest of the session.".bright_black()
        );
        println!("{}", "─".repeat(60).yellow());
        print!("{} ", "Allow? (y/n):".yellow().bold());
        io::stdout().flush()?;

        let answer = self.next_line().await?.unwrap_or_default();
        let allowed = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");

        if allowed {
            println!("{}", "✓ Allowed".green());
        } else {
            println!("{}", "✗ Denied".red());
        }
        println!();

        Ok(allowed)
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("prompt_color", &self.prompt_color)
            .field("tool_color", &self.tool_color)
            .finish_non_exhaustive()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

fn risk_label(risk: RiskLevel) -> ColoredString {
    match risk {
        RiskLevel::Low => "low".green(),
        RiskLevel::Medium => "medium".yellow(),
        RiskLevel::High => "high".red().bold(),
    }
}

/// Prompt handler that asks on the terminal
///
/// Cancelling the check context abandons the prompt with
/// `GuardError::Cancelled`. The next line typed goes to whoever reads
/// the console after that.
#[derive(Debug, Clone, Default)]
pub struct ConsolePromptHandler {
    console: Console,
}

impl ConsolePromptHandler {
    pub fn new(console: Console) -> Self {
        Self { console }
    }
}

#[async_trait]
impl PromptHandler for ConsolePromptHandler {
    async fn prompt(&self, ctx: &CheckContext, request: &PermissionRequest) -> GuardResult<bool> {
        if ctx.is_cancelled() {
            return Err(GuardError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                println!();
                tracing::info!("Permission prompt cancelled");
                Err(GuardError::Cancelled)
            }
            answer = self.console.ask_permission(request) => {
                answer.map_err(|e| GuardError::handler(format!("failed to read answer: {}", e)))
            }
        }
    }
}
