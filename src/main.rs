use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use shadow_agent_guard::cli::{Console, ConsolePromptHandler};
use shadow_agent_guard::config::SecurityConfig;
use shadow_agent_guard::logging;
use shadow_agent_guard::permissions::{
    ArcPromptHandler, Permission, PermissionMode, PermissionRequest,
};
use shadow_agent_guard::{CheckContext, GuardError, ToolGuard};

/// Environment variable naming the security config file
const CONFIG_ENV: &str = "SECURITY_CONFIG";

/// How long exit waits on runtime threads; a stdin read in flight cannot
/// be interrupted
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

fn main() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    let result = runtime.block_on(run());
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn run() -> Result<()> {
    let config_path = env::args().nth(1).or_else(|| env::var(CONFIG_ENV).ok());
    let config = match &config_path {
        Some(path) => SecurityConfig::load(path)
            .with_context(|| format!("Failed to load security config: {}", path))?,
        None => SecurityConfig::default(),
    };

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = logging::init_logging(&config.logging)?;
    tracing::info!("=== Shadow Guard Starting ===");

    let console = Console::new();
    let handler: ArcPromptHandler = Arc::new(ConsolePromptHandler::new(console.clone()));
    let manager = Arc::new(config.build_manager(Some(handler)));

    let mut guard = ToolGuard::new(manager.clone());
    if let Some(sandbox) = config.build_validator() {
        tracing::info!(
            "Sandbox enabled: {} allowed, {} denied prefixes",
            sandbox.allowed_paths().len(),
            sandbox.denied_paths().len()
        );
        guard = guard.with_sandbox(Arc::new(sandbox));
    }

    let shutdown = CancellationToken::new();
    let root = CheckContext::new(uuid::Uuid::new_v4().to_string(), "shell")
        .with_cancellation(shutdown.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received");
            shutdown.cancel();
        }
    });

    console.print_banner();
    console.print_system(&format!("Mode: {}", manager.mode().await));

    loop {
        let line = tokio::select! {
            biased;
            _ = root.cancelled() => {
                println!();
                break;
            }
            line = console.read_input() => line.context("Failed to read input")?,
        };
        let Some(line) = line else { break };
        if line.is_empty() {
            continue;
        }

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else { continue };
        let rest: Vec<&str> = words.collect();

        match command {
            "quit" | "exit" => break,
            "audit" => match rest.first().map(|arg| arg.parse::<Permission>()) {
                Some(Ok(p)) => console.print_audit(&manager.audit_for(p).await),
                Some(Err(e)) => console.print_error(&e.to_string()),
                None => console.print_audit(&manager.get_audit_log().await),
            },
            "denials" => console.print_audit(&manager.denials().await),
            "grant-all" => manager.grant_all().await,
            "revoke-all" => manager.revoke_all().await,
            "grant" | "revoke" => {
                let permission = match rest.first().map(|arg| arg.parse::<Permission>()) {
                    Some(Ok(p)) => p,
                    Some(Err(e)) => {
                        console.print_error(&e.to_string());
                        continue;
                    }
                    None => {
                        console.print_error(&format!("usage: {} <permission>", command));
                        continue;
                    }
                };
                if command == "grant" {
                    manager.grant(permission).await;
                } else {
                    manager.revoke(permission).await;
                }
            }
            "mode" => match rest.first().map(|arg| arg.parse::<PermissionMode>()) {
                Some(Ok(mode)) => {
                    manager.set_mode(mode).await;
                    console.print_system(&format!("Mode: {}", mode));
                }
                Some(Err(e)) => console.print_error(&e.to_string()),
                None => console.print_error("usage: mode <interactive|yolo|auto_approve|deny>"),
            },
            _ => {
                let permission = match command.parse::<Permission>() {
                    Ok(p) => p,
                    Err(e) => {
                        console.print_error(&e.to_string());
                        continue;
                    }
                };
                if rest.len() < 2 {
                    console.print_error("usage: <permission> <resource> <operation...>");
                    continue;
                }
                let request = PermissionRequest::new(permission, rest[0], rest[1..].join(" "))
                    .with_tool("shell")
                    .assessed();

                match guard.authorize(&root.child(), &request).await {
                    Ok(granted) => console.print_decision(&request, granted),
                    Err(GuardError::Cancelled) => {
                        console.print_system("Cancelled");
                        break;
                    }
                    Err(e) => console.print_error(&e.to_string()),
                }
            }
        }
    }

    let decisions = manager.audit_len().await;
    tracing::info!(decisions, "=== Shadow Guard Shutting Down ===");

    Ok(())
}
