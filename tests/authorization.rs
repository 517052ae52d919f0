//! End-to-end authorization flows through the public API

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use shadow_agent_guard::config::SecurityConfig;
use shadow_agent_guard::permissions::{
    assess_risk, ArcPromptHandler, FnPromptHandler, Permission, PermissionManager,
    PermissionMode, PermissionRequest, RiskLevel,
};
use shadow_agent_guard::{CheckContext, GuardError, ToolGuard};

/// The slow handler approves only odd-numbered resources
fn approves(resource: &str) -> bool {
    resource.ends_with(['1', '3', '5', '7', '9'])
}

/// Handler that sleeps while tracking how many prompts run at once
fn slow_tracking_handler(
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
) -> ArcPromptHandler {
    Arc::new(FnPromptHandler::new(move |_ctx, req: PermissionRequest| {
        let active = active.clone();
        let peak = peak.clone();
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            active.fetch_sub(1, Ordering::SeqCst);
            Ok(approves(&req.resource))
        }
    }))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checks_are_serialized() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(AtomicUsize::new(0));
    let handler = slow_tracking_handler(active, peak.clone(), calls.clone());
    let manager = Arc::new(PermissionManager::new(
        PermissionMode::Interactive,
        Some(handler),
    ));

    // Distinct permissions per task so memoization does not skip prompts
    let permissions = [Permission::Network, Permission::ExternalTool];
    let tasks = (0..8).map(|i| {
        let manager = manager.clone();
        let permission = permissions[i % 2];
        tokio::spawn(async move {
            let req = PermissionRequest::new(permission, format!("target-{}", i), "connect");
            manager.check(&CheckContext::default(), &req).await
        })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(peak.load(Ordering::SeqCst), 1);
    assert_eq!(manager.audit_len().await, results.len());

    // Replaying the log in order reproduces every decision and prompt
    let log = manager.get_audit_log().await;
    let mut granted = HashSet::new();
    let mut expected_prompts = 0;
    for entry in &log {
        let expected = if granted.contains(&entry.permission) {
            true
        } else {
            expected_prompts += 1;
            approves(&entry.resource)
        };
        assert_eq!(entry.granted, expected, "entry for {}", entry.resource);
        if expected {
            granted.insert(entry.permission);
        }
    }
    assert_eq!(calls.load(Ordering::SeqCst), expected_prompts);
    assert_eq!(
        results.iter().filter(|g| **g).count(),
        log.iter().filter(|e| e.granted).count()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_prompts_for_same_permission_prompt_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let handler: ArcPromptHandler = Arc::new(FnPromptHandler::new(move |_ctx, _req| {
        counter.fetch_add(1, Ordering::SeqCst);
        async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(true)
        }
    }));
    let manager = Arc::new(PermissionManager::new(
        PermissionMode::Interactive,
        Some(handler),
    ));

    let tasks = (0..6).map(|i| {
        let manager = manager.clone();
        tokio::spawn(async move {
            let req = PermissionRequest::new(Permission::Write, format!("/tmp/{}", i), "write");
            manager.check(&CheckContext::default(), &req).await
        })
    });

    for joined in join_all(tasks).await {
        assert!(joined.unwrap().unwrap());
    }

    // The first approval is memoized before the lock is released
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(manager.audit_len().await, 6);
}

#[tokio::test]
async fn test_config_driven_guard() {
    let config = SecurityConfig::from_json(
        r#"{
            "mode": "interactive",
            "auto_approve_low_risk": true,
            "sandbox": {
                "enabled": true,
                "allowed_paths": ["/workspace"],
                "denied_paths": ["/workspace/secrets"]
            }
        }"#,
    )
    .unwrap();

    let manager = Arc::new(config.build_manager(None));
    let sandbox = Arc::new(config.build_validator().unwrap());
    let guard = ToolGuard::new(manager.clone()).with_sandbox(sandbox);
    let ctx = CheckContext::new("session-1", "coder");

    // Low risk is auto-approved
    let read = PermissionRequest::new(Permission::Read, "/workspace/src/main.rs", "read file")
        .with_tool("Read")
        .assessed();
    assert_eq!(read.risk, RiskLevel::Low);
    assert!(guard.authorize(&ctx, &read).await.unwrap());

    // Medium risk needs a prompt, and there is none
    let write = PermissionRequest::new(Permission::Write, "/workspace/src/main.rs", "write file")
        .with_tool("Write")
        .assessed();
    assert_eq!(write.risk, RiskLevel::Medium);
    assert!(!guard.authorize(&ctx, &write).await.unwrap());

    // Sandbox rejections never reach the manager
    let secret = PermissionRequest::new(Permission::Read, "/workspace/secrets/key", "read file");
    assert!(matches!(
        guard.authorize(&ctx, &secret).await,
        Err(GuardError::SandboxDenied { .. })
    ));

    let log = manager.get_audit_log().await;
    assert_eq!(log.len(), 2);
    assert!(log.iter().all(|e| e.mode == PermissionMode::AutoApprove));
    assert_eq!(
        log.iter().map(|e| e.granted).collect::<Vec<_>>(),
        vec![true, false]
    );
}

#[tokio::test]
async fn test_explicit_grant_overrides_missing_handler() {
    let manager = PermissionManager::without_handler(PermissionMode::AutoApprove);
    let ctx = CheckContext::default();
    let req = PermissionRequest::new(Permission::Execute, "cargo", "execute cargo build")
        .assessed();
    assert_eq!(req.risk, RiskLevel::Medium);

    assert!(!manager.check(&ctx, &req).await.unwrap());
    manager.grant(Permission::Execute).await;
    assert!(manager.check(&ctx, &req).await.unwrap());
    manager.revoke_all().await;
    assert!(!manager.check(&ctx, &req).await.unwrap());

    assert_eq!(manager.audit_len().await, 3);
}

#[test]
fn test_risk_examples() {
    assert_eq!(assess_risk("rm -rf /", "/"), RiskLevel::High);
    assert_eq!(assess_risk("write file", "/tmp/x"), RiskLevel::Medium);
    assert_eq!(assess_risk("read file", "/tmp/x"), RiskLevel::Low);
    assert_eq!(assess_risk("sudo x", "y"), RiskLevel::High);
}
