//! Async driver for the readiness state machine.
//!
//! # Lifecycle
//!
//! ```text
//! ReadinessMonitor::new ──► subscribe / watch_status ──► start ──► MonitorHandle
//!                                                                   ├─ status()
//!                                                                   ├─ cancel()
//!                                                                   └─ wait() → final status
//! ```
//!
//! The poll task runs the first poll immediately and then one poll per
//! interval until the machine reaches a terminal status or the handle is
//! cancelled. Only changes are emitted, and a cancelled task emits nothing.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::diagnostics::{describe_problems, DiagnosticFlags};
use super::machine::{Action, Observation, ReadinessConfig, ReadinessMachine};
use super::probe::SdkProbe;
use super::status::{ProviderStatus, StatusTransition};

/// Capacity of the transition broadcast. A full run emits at most six.
const TRANSITION_CHANNEL_CAPACITY: usize = 16;

/// Log a "still waiting" line every this many polls (3 s at 100 ms).
const PROGRESS_LOG_EVERY: u32 = 30;

/// Watches an externally loaded mapping SDK until it is usable.
///
/// # Example
///
/// ```ignore
/// let monitor = ReadinessMonitor::new(Arc::new(probe), ReadinessConfig::default())
///     .with_api_key(config.provider.api_key.clone());
/// let mut transitions = monitor.subscribe();
/// let handle = monitor.start();
///
/// while let Ok(transition) = transitions.recv().await {
///     ui.show(transition.to.display_status());
/// }
/// ```
pub struct ReadinessMonitor<P: ?Sized> {
    probe: Arc<P>,
    config: ReadinessConfig,
    api_key: Option<String>,
    status_tx: watch::Sender<ProviderStatus>,
    transitions_tx: broadcast::Sender<StatusTransition>,
}

impl<P: SdkProbe + ?Sized + 'static> ReadinessMonitor<P> {
    pub fn new(probe: Arc<P>, config: ReadinessConfig) -> Self {
        let (status_tx, _) = watch::channel(ProviderStatus::Unstarted);
        let (transitions_tx, _) = broadcast::channel(TRANSITION_CHANNEL_CAPACITY);
        Self {
            probe,
            config,
            api_key: None,
            status_tx,
            transitions_tx,
        }
    }

    /// API key used for the diagnostics logged on timeout.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Receive every status transition.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusTransition> {
        self.transitions_tx.subscribe()
    }

    /// Receive the latest status.
    pub fn watch_status(&self) -> watch::Receiver<ProviderStatus> {
        self.status_tx.subscribe()
    }

    pub fn status(&self) -> ProviderStatus {
        *self.status_tx.borrow()
    }

    pub fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    /// Spawn the poll task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn start(self) -> MonitorHandle {
        let cancellation = CancellationToken::new();
        let status_rx = self.status_tx.subscribe();
        let transitions_tx = self.transitions_tx.clone();

        tracing::debug!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            max_script_attempts = self.config.max_script_attempts,
            max_capability_attempts = self.config.max_capability_attempts,
            "Starting map provider readiness monitor"
        );

        let task = tokio::spawn(run_poll_loop(self, cancellation.clone()));

        MonitorHandle {
            cancellation,
            status_rx,
            transitions_tx,
            task: Some(task),
        }
    }
}

/// Handle to a running readiness monitor.
///
/// Dropping the handle cancels the monitor.
#[derive(Debug)]
pub struct MonitorHandle {
    cancellation: CancellationToken,
    status_rx: watch::Receiver<ProviderStatus>,
    transitions_tx: broadcast::Sender<StatusTransition>,
    task: Option<JoinHandle<Option<ProviderStatus>>>,
}

impl MonitorHandle {
    /// Stop polling. No further transitions are emitted.
    ///
    /// Calling this more than once, or after a terminal status, does nothing.
    pub fn cancel(&self) {
        if !self.cancellation.is_cancelled() {
            tracing::debug!(status = %self.status(), "Readiness monitor cancelled");
            self.cancellation.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn status(&self) -> ProviderStatus {
        *self.status_rx.borrow()
    }

    /// Receive transitions emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusTransition> {
        self.transitions_tx.subscribe()
    }

    pub fn watch_status(&self) -> watch::Receiver<ProviderStatus> {
        self.status_rx.clone()
    }

    /// Wait for the poll task to end.
    ///
    /// Returns the terminal status, or `None` if the monitor was cancelled
    /// first.
    pub async fn wait(mut self) -> Option<ProviderStatus> {
        let task = self.task.take()?;
        task.await.ok().flatten()
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}

async fn run_poll_loop<P: SdkProbe + ?Sized>(
    monitor: ReadinessMonitor<P>,
    cancellation: CancellationToken,
) -> Option<ProviderStatus> {
    let ReadinessMonitor {
        probe,
        config,
        api_key,
        status_tx,
        transitions_tx,
    } = monitor;
    let mut machine = ReadinessMachine::new(config);

    loop {
        if cancellation.is_cancelled() {
            return None;
        }

        let from = machine.status();
        let observation = Observation::capture(&*probe);
        let (next, action) = machine.advance(observation);
        machine = next;

        if action == Action::LoadModuleAndPollAgain {
            // No SDK side effects once cancelled
            if cancellation.is_cancelled() {
                return None;
            }
            let invoked = probe.invoke_manual_load();
            tracing::debug!(
                attempt = machine.polls(),
                invoked,
                "Maps module missing, manual load requested"
            );
        }

        let to = machine.status();
        if to != from {
            // A cancel that raced this poll wins
            if cancellation.is_cancelled() {
                return None;
            }
            status_tx.send_replace(to);
            // No receivers is fine
            let _ = transitions_tx.send(StatusTransition {
                from,
                to,
                attempt: machine.polls(),
            });
            tracing::debug!(
                from = %from,
                to = %to,
                attempt = machine.polls(),
                "Map provider status changed"
            );
        }

        if action == Action::Stop {
            log_terminal(&machine, &*probe, api_key.as_deref());
            return Some(to);
        }

        if machine.polls() % PROGRESS_LOG_EVERY == 0 {
            tracing::info!(
                status = %to,
                attempt = machine.polls(),
                attempts_used = machine.attempts_used(),
                "Still waiting for map provider"
            );
        }

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => return None,
            _ = tokio::time::sleep(config.poll_interval) => {}
        }
    }
}

fn log_terminal<P: SdkProbe + ?Sized>(
    machine: &ReadinessMachine,
    probe: &P,
    api_key: Option<&str>,
) {
    match machine.status() {
        ProviderStatus::Ready => {
            tracing::info!(attempt = machine.polls(), "Map provider ready");
        }
        status => {
            let flags = DiagnosticFlags::capture(probe, api_key, probe.is_online());
            let problems: Vec<String> = describe_problems(&flags)
                .iter()
                .map(ToString::to_string)
                .collect();
            let missing: Vec<&str> = if flags.module {
                probe
                    .missing_capabilities()
                    .iter()
                    .map(|capability| capability.as_str())
                    .collect()
            } else {
                Vec::new()
            };
            tracing::warn!(
                status = %status,
                attempt = machine.polls(),
                problems = ?problems,
                missing_capabilities = ?missing,
                "Map provider failed to become ready"
            );
        }
    }
}
