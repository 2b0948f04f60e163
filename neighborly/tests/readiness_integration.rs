//! Integration tests for the map provider readiness monitor.
//!
//! These tests drive the monitor through its public API on tokio's paused
//! clock, with a scripted SDK that changes over simulated time:
//! - budget timeouts land on exact simulated instants
//! - staged loading (script → namespace → module → APIs)
//! - manual module load when auto-load is disabled
//! - configuration file values flowing into the monitor
//!
//! Run with: `cargo test --test readiness_integration`

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use neighborly::config::ConfigFile;
use neighborly::readiness::{
    describe_problems, DiagnosticFlags, ProviderProblem, ProviderStatus, ReadinessConfig,
    ReadinessMonitor, SdkCapability, SdkProbe, StatusTransition,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// SDK whose load stages appear at fixed poll numbers.
///
/// A stage set to `u32::MAX` never appears.
struct StagedSdk {
    polls: AtomicU32,
    script_at: u32,
    namespace_at: u32,
    module_at: u32,
    apis_at: u32,
    /// Module only appears after a manual load call.
    needs_manual_load: bool,
    manual_loads: AtomicUsize,
}

impl StagedSdk {
    fn new(script_at: u32, namespace_at: u32, module_at: u32, apis_at: u32) -> Self {
        Self {
            polls: AtomicU32::new(0),
            script_at,
            namespace_at,
            module_at,
            apis_at,
            needs_manual_load: false,
            manual_loads: AtomicUsize::new(0),
        }
    }

    fn never() -> Self {
        Self::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX)
    }

    fn poll(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

impl SdkProbe for StagedSdk {
    fn has_script_tag(&self) -> bool {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        poll >= self.script_at
    }

    fn has_namespace(&self) -> bool {
        self.poll() >= self.namespace_at
    }

    fn has_module(&self) -> bool {
        if self.needs_manual_load && self.manual_loads.load(Ordering::SeqCst) == 0 {
            return false;
        }
        self.poll() >= self.module_at
    }

    fn has_capability(&self, _capability: SdkCapability) -> bool {
        self.poll() >= self.apis_at
    }

    fn invoke_manual_load(&self) -> bool {
        self.manual_loads.fetch_add(1, Ordering::SeqCst);
        true
    }
}

fn collect(rx: &mut tokio::sync::broadcast::Receiver<StatusTransition>) -> Vec<StatusTransition> {
    let mut out = Vec::new();
    while let Ok(transition) = rx.try_recv() {
        out.push(transition);
    }
    out
}

fn statuses(transitions: &[StatusTransition]) -> Vec<ProviderStatus> {
    transitions.iter().map(|t| t.to).collect()
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_staged_load_reports_every_stage_in_order() {
    let sdk = Arc::new(StagedSdk::new(3, 5, 7, 9));
    let monitor = ReadinessMonitor::new(Arc::clone(&sdk), ReadinessConfig::default());
    let mut rx = monitor.subscribe();

    let started = Instant::now();
    let final_status = monitor.start().wait().await;

    assert_eq!(final_status, Some(ProviderStatus::Ready));
    // Poll 9 runs after eight intervals
    assert_eq!(started.elapsed(), Duration::from_millis(800));

    let transitions = collect(&mut rx);
    assert_eq!(
        statuses(&transitions),
        vec![
            ProviderStatus::ScriptMissing,
            ProviderStatus::NamespaceMissing,
            ProviderStatus::ModuleMissing,
            ProviderStatus::ApisIncomplete,
            ProviderStatus::Ready,
        ]
    );
    let attempts: Vec<u32> = transitions.iter().map(|t| t.attempt).collect();
    assert_eq!(attempts, vec![1, 3, 5, 7, 9]);

    // Chain is contiguous
    for pair in transitions.windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
    }
}

#[tokio::test(start_paused = true)]
async fn test_script_never_appears_times_out_at_script_budget() {
    let sdk = Arc::new(StagedSdk::never());
    let config = ReadinessConfig::default()
        .with_poll_interval(Duration::from_millis(250))
        .with_max_script_attempts(8);
    let monitor = ReadinessMonitor::new(Arc::clone(&sdk), config);
    let mut rx = monitor.subscribe();

    let started = Instant::now();
    assert_eq!(
        monitor.start().wait().await,
        Some(ProviderStatus::TimedOut)
    );
    assert_eq!(started.elapsed(), config.script_timeout());

    let transitions = collect(&mut rx);
    assert_eq!(transitions.iter().filter(|t| t.is_terminal()).count(), 1);
    assert_eq!(transitions.last().map(|t| t.to), Some(ProviderStatus::TimedOut));
}

#[tokio::test(start_paused = true)]
async fn test_manual_load_unblocks_module() {
    let mut sdk = StagedSdk::new(1, 1, 1, 1);
    sdk.needs_manual_load = true;
    let sdk = Arc::new(sdk);

    let monitor = ReadinessMonitor::new(Arc::clone(&sdk), ReadinessConfig::default());
    let mut rx = monitor.subscribe();

    assert_eq!(monitor.start().wait().await, Some(ProviderStatus::Ready));
    assert_eq!(sdk.manual_loads.load(Ordering::SeqCst), 1);
    assert_eq!(
        statuses(&collect(&mut rx)),
        vec![ProviderStatus::ModuleMissing, ProviderStatus::Ready]
    );
}

#[tokio::test(start_paused = true)]
async fn test_watch_status_tracks_latest() {
    let sdk = Arc::new(StagedSdk::new(1, 1, 1, 4));
    let monitor = ReadinessMonitor::new(sdk, ReadinessConfig::default());
    let mut status = monitor.watch_status();
    assert_eq!(*status.borrow(), ProviderStatus::Unstarted);

    let handle = monitor.start();
    status
        .wait_for(|s| *s == ProviderStatus::ApisIncomplete)
        .await
        .unwrap();
    status.wait_for(|s| s.is_terminal()).await.unwrap();

    assert_eq!(handle.status(), ProviderStatus::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_config_file_values_drive_monitor() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.ini");
    std::fs::write(
        &path,
        "[provider]\npoll_interval_ms = 40\nmax_script_attempts = 5\n",
    )
    .unwrap();

    let config = ConfigFile::load_from(&path).unwrap();
    let monitor = ReadinessMonitor::new(Arc::new(StagedSdk::never()), config.readiness_config())
        .with_api_key(config.provider.api_key.clone());

    let started = Instant::now();
    assert_eq!(
        monitor.start().wait().await,
        Some(ProviderStatus::TimedOut)
    );
    assert_eq!(started.elapsed(), Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_mid_stage_freezes_status() {
    let sdk = Arc::new(StagedSdk::new(1, 1, u32::MAX, u32::MAX));
    let monitor = ReadinessMonitor::new(Arc::clone(&sdk), ReadinessConfig::default());
    let mut rx = monitor.subscribe();
    let handle = monitor.start();

    tokio::time::sleep(Duration::from_millis(1_050)).await;
    handle.cancel();
    let polls_at_cancel = sdk.poll();

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(sdk.poll(), polls_at_cancel);
    assert_eq!(handle.status(), ProviderStatus::ModuleMissing);
    assert!(collect(&mut rx).iter().all(|t| !t.is_terminal()));

    handle.cancel();
    assert_eq!(handle.wait().await, None);
}

#[test]
fn test_diagnostics_for_stalled_sdk() {
    let sdk = StagedSdk::new(1, 1, u32::MAX, u32::MAX);
    let flags = DiagnosticFlags::capture(&sdk, Some("short"), false);
    assert_eq!(
        describe_problems(&flags),
        vec![
            ProviderProblem::ApiKeyTooShort { length: 5 },
            ProviderProblem::Offline,
            ProviderProblem::ModuleMissing,
        ]
    );
}
