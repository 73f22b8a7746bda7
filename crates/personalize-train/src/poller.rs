//! Waiting for asynchronous resources to reach a terminal status
//!
//! Import jobs, solution versions and campaigns are created in the
//! background by the service. [`wait_for_terminal`] polls a caller-supplied
//! status function on a fixed interval until the resource settles, the wall
//! clock budget runs out, or the operator cancels.

use crate::error::{Result, TrainError};
use crate::names::ResourceKind;
use crate::status::{ResourceStatus, StatusReport};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default delay between status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Default wall-clock budget for one resource (3 hours)
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(3 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

/// How a wait ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    Succeeded(String),
    Failed {
        arn: String,
        reason: String,
    },
    TimedOut {
        arn: String,
        last_status: Option<ResourceStatus>,
    },
    Cancelled {
        arn: String,
    },
}

impl WaitOutcome {
    /// Turn every non-success outcome into the matching error
    pub fn into_result(self, kind: ResourceKind, policy: &PollPolicy) -> Result<String> {
        match self {
            WaitOutcome::Succeeded(arn) => Ok(arn),
            WaitOutcome::Failed { arn, reason } => {
                Err(TrainError::ResourceFailed { kind, arn, reason })
            },
            WaitOutcome::TimedOut { arn, last_status } => Err(TrainError::WaitTimedOut {
                kind,
                arn,
                last_status: last_status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "never observed".to_string()),
                waited_secs: policy.timeout.as_secs(),
            }),
            WaitOutcome::Cancelled { arn } => Err(TrainError::WaitCancelled { kind, arn }),
        }
    }
}

fn failure_reason(report: StatusReport) -> String {
    match report.status {
        ResourceStatus::DeletePending | ResourceStatus::DeleteInProgress => {
            format!("resource is being deleted ({})", report.status)
        },
        ResourceStatus::CreateStopped => report
            .failure_reason
            .unwrap_or_else(|| "training was stopped before completing".to_string()),
        _ => report
            .failure_reason
            .unwrap_or_else(|| "no failure reason reported".to_string()),
    }
}

/// Poll `fetch_status` until the resource reaches a terminal status
///
/// The deadline is checked before every fetch, and the function returns as
/// soon as a terminal status is observed. Errors from `fetch_status`
/// propagate unchanged.
pub async fn wait_for_terminal<F, Fut>(
    kind: ResourceKind,
    arn: &str,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut fetch_status: F,
) -> Result<WaitOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<StatusReport>>,
{
    let deadline = Instant::now() + policy.timeout;
    let mut last_status = None;
    let mut polls = 0u32;

    loop {
        if cancel.is_cancelled() {
            warn!(kind = %kind, arn = %arn, "Wait cancelled");
            return Ok(WaitOutcome::Cancelled {
                arn: arn.to_string(),
            });
        }

        if Instant::now() >= deadline {
            warn!(
                kind = %kind,
                arn = %arn,
                polls,
                timeout_secs = policy.timeout.as_secs(),
                "Gave up waiting for terminal status"
            );
            return Ok(WaitOutcome::TimedOut {
                arn: arn.to_string(),
                last_status,
            });
        }

        let report = fetch_status().await?;
        polls += 1;
        info!(kind = %kind, arn = %arn, status = %report.status, "{}: {}", kind, report.status);

        if report.status == ResourceStatus::Active {
            return Ok(WaitOutcome::Succeeded(arn.to_string()));
        }

        if report.status.is_failure() {
            return Ok(WaitOutcome::Failed {
                arn: arn.to_string(),
                reason: failure_reason(report),
            });
        }

        last_status = Some(report.status);

        // Never sleep past the deadline
        let pause = policy
            .interval
            .min(deadline.saturating_duration_since(Instant::now()));
        debug!(pause_secs = pause.as_secs(), "Sleeping before next status check");

        tokio::select! {
            _ = cancel.cancelled() => {},
            _ = sleep(pause) => {},
        }
    }
}
