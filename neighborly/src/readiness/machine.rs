//! Readiness state machine.
//!
//! The machine is a plain value. [`ReadinessMachine::advance`] takes one
//! [`Observation`] of the SDK and returns the next machine together with the
//! [`Action`] the driver should take. It never sleeps or touches the probe,
//! so every budget edge case is testable without a runtime.
//!
//! # Budget accounting
//!
//! Each poll that finds its stage incomplete spends one attempt of the
//! stage's budget. A poll that finds the budget already spent times out.
//! With the first poll at t=0 and one poll every interval, a script that
//! never appears therefore times out at exactly
//! `max_script_attempts × poll_interval`.

use std::time::Duration;

use super::probe::SdkProbe;
use super::status::ProviderStatus;

/// Default time between polls (100 ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default script-presence budget (10 s at the default interval).
pub const DEFAULT_MAX_SCRIPT_ATTEMPTS: u32 = 100;

/// Default capability budget (20 s at the default interval).
pub const DEFAULT_MAX_CAPABILITY_ATTEMPTS: u32 = 200;

/// Polling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessConfig {
    pub poll_interval: Duration,
    /// Polls allowed while no script evidence exists.
    pub max_script_attempts: u32,
    /// Polls allowed after script evidence, across all later stages.
    pub max_capability_attempts: u32,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_script_attempts: DEFAULT_MAX_SCRIPT_ATTEMPTS,
            max_capability_attempts: DEFAULT_MAX_CAPABILITY_ATTEMPTS,
        }
    }
}

impl ReadinessConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_script_attempts(mut self, attempts: u32) -> Self {
        self.max_script_attempts = attempts;
        self
    }

    pub fn with_max_capability_attempts(mut self, attempts: u32) -> Self {
        self.max_capability_attempts = attempts;
        self
    }

    /// How long a missing script is waited for.
    pub fn script_timeout(&self) -> Duration {
        self.poll_interval * self.max_script_attempts
    }

    /// How long the later stages are waited for once the script is seen.
    pub fn capability_timeout(&self) -> Duration {
        self.poll_interval * self.max_capability_attempts
    }
}

/// One snapshot of the SDK, taken at the start of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Observation {
    pub script_tag: bool,
    pub namespace: bool,
    pub module: bool,
    pub required_apis: bool,
}

impl Observation {
    /// Snapshot the probe. Deeper checks are skipped once a shallower one
    /// fails.
    pub fn capture<P: SdkProbe + ?Sized>(probe: &P) -> Self {
        let script_tag = probe.has_script_tag();
        let namespace = probe.has_namespace();
        let module = namespace && probe.has_module();
        let required_apis = module && probe.has_required_apis();
        Self {
            script_tag,
            namespace,
            module,
            required_apis,
        }
    }

    /// Observation of a fully loaded SDK.
    pub fn ready() -> Self {
        Self {
            script_tag: true,
            namespace: true,
            module: true,
            required_apis: true,
        }
    }
}

/// What the driver should do after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Poll again after the interval.
    PollAgain,
    /// Invoke the manual module load, then poll again after the interval.
    LoadModuleAndPollAgain,
    /// Terminal state reached; stop polling.
    Stop,
}

/// Which budget the machine is spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No script tag or namespace seen yet.
    AwaitingScript { attempts: u32 },
    /// Script evidence seen; waiting for namespace, module and APIs.
    AwaitingCapabilities { attempts: u32 },
    Finished,
}

/// Pure readiness state machine.
///
/// # Example
///
/// ```
/// use neighborly::readiness::{Action, Observation, ProviderStatus, ReadinessConfig, ReadinessMachine};
///
/// let machine = ReadinessMachine::new(ReadinessConfig::default());
/// let (machine, action) = machine.advance(Observation::ready());
///
/// assert_eq!(machine.status(), ProviderStatus::Ready);
/// assert_eq!(action, Action::Stop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessMachine {
    config: ReadinessConfig,
    phase: Phase,
    status: ProviderStatus,
    polls: u32,
}

impl ReadinessMachine {
    pub fn new(config: ReadinessConfig) -> Self {
        Self {
            config,
            phase: Phase::AwaitingScript { attempts: 0 },
            status: ProviderStatus::Unstarted,
            polls: 0,
        }
    }

    pub fn status(&self) -> ProviderStatus {
        self.status
    }

    /// Number of observations applied so far.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    /// Attempts spent from the current phase's budget.
    pub fn attempts_used(&self) -> u32 {
        match self.phase {
            Phase::AwaitingScript { attempts } | Phase::AwaitingCapabilities { attempts } => {
                attempts
            }
            Phase::Finished => 0,
        }
    }

    /// Apply one observation.
    ///
    /// A finished machine ignores observations and keeps returning
    /// [`Action::Stop`].
    pub fn advance(mut self, observation: Observation) -> (Self, Action) {
        if let Phase::Finished = self.phase {
            return (self, Action::Stop);
        }
        self.polls += 1;

        // Script evidence latches: once seen, the script budget is done
        if let Phase::AwaitingScript { .. } = self.phase {
            if observation.script_tag || observation.namespace {
                self.phase = Phase::AwaitingCapabilities { attempts: 0 };
            }
        }

        match self.phase {
            Phase::AwaitingScript { attempts } => {
                if attempts >= self.config.max_script_attempts {
                    return self.finish(ProviderStatus::TimedOut);
                }
                self.phase = Phase::AwaitingScript {
                    attempts: attempts + 1,
                };
                self.status = ProviderStatus::ScriptMissing;
                (self, Action::PollAgain)
            }
            Phase::AwaitingCapabilities { attempts } => {
                let stage = Self::classify(&observation);
                if stage == ProviderStatus::Ready {
                    return self.finish(ProviderStatus::Ready);
                }
                if attempts >= self.config.max_capability_attempts {
                    return self.finish(ProviderStatus::TimedOut);
                }
                self.phase = Phase::AwaitingCapabilities {
                    attempts: attempts + 1,
                };
                self.status = stage;
                let action = if stage == ProviderStatus::ModuleMissing {
                    Action::LoadModuleAndPollAgain
                } else {
                    Action::PollAgain
                };
                (self, action)
            }
            Phase::Finished => (self, Action::Stop),
        }
    }

    fn finish(mut self, status: ProviderStatus) -> (Self, Action) {
        self.phase = Phase::Finished;
        self.status = status;
        (self, Action::Stop)
    }

    /// Stage reached by an observation once script evidence exists.
    fn classify(observation: &Observation) -> ProviderStatus {
        if !observation.namespace {
            ProviderStatus::NamespaceMissing
        } else if !observation.module {
            ProviderStatus::ModuleMissing
        } else if !observation.required_apis {
            ProviderStatus::ApisIncomplete
        } else {
            ProviderStatus::Ready
        }
    }
}
