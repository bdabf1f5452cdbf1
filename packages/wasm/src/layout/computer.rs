//! Layout computer: remote first, local fallback.
//!
//! ```text
//! Idle → RequestingRemote → RemoteSucceeded ─────────────→ Positioned
//!                         ↘ RemoteFailed → LocalFallback ↗
//! ```
//!
//! Without a transport the computer goes straight to `LocalFallback`. Every
//! remote failure (transport error, bad status, malformed body, timeout) is
//! logged and recovered locally; nothing is surfaced to the caller.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use futures::future::{self, Either};
use log::{info, warn};

use super::local::{compute_local_layout, LocalLayoutConfig};
use super::remote::{adopt_response, AdoptedLayout, LayoutTransport, RemoteLayoutRequest};
use crate::cluster::ClusterData;
use crate::config::DEFAULT_REMOTE_TIMEOUT_MS;
use crate::error::LayoutError;
use crate::issue::{Issue, IssueIndex};
use crate::lifecycle::Scheduler;

/// Progress of the current layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPhase {
    #[default]
    Idle,
    RequestingRemote,
    RemoteSucceeded,
    RemoteFailed,
    LocalFallback,
    Positioned,
}

/// Why the local layout was used.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// No layout endpoint is configured.
    RemoteDisabled,
    /// The remote attempt failed.
    RemoteFailed(LayoutError),
}

/// Which strategy produced the positions. Diagnostics only.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutStrategy {
    Remote {
        /// Round trip measured locally.
        elapsed_ms: f64,
        /// Compute time reported by the server, if any.
        compute_time_ms: Option<f64>,
    },
    Local {
        reason: FallbackReason,
    },
}

impl LayoutStrategy {
    pub fn is_remote(&self) -> bool {
        matches!(self, LayoutStrategy::Remote { .. })
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutStrategy::Remote { elapsed_ms, .. } => write!(f, "remote ({elapsed_ms:.0} ms)"),
            LayoutStrategy::Local {
                reason: FallbackReason::RemoteDisabled,
            } => write!(f, "local (remote disabled)"),
            LayoutStrategy::Local {
                reason: FallbackReason::RemoteFailed(err),
            } => write!(f, "local ({err})"),
        }
    }
}

/// Positioned clusters and nodes plus the strategy that placed them.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    pub data: ClusterData,
    pub strategy: LayoutStrategy,
    /// Issues synthesized for remote nodes missing from the input set.
    pub stubs: Vec<Issue>,
}

/// Computes positions for one clustering result.
pub struct LayoutComputer {
    scheduler: Rc<dyn Scheduler>,
    transport: Option<Rc<dyn LayoutTransport>>,
    timeout: Duration,
    local: LocalLayoutConfig,
    phase: Cell<LayoutPhase>,
}

impl LayoutComputer {
    /// A computer that only uses the local layout.
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            transport: None,
            timeout: Duration::from_millis(DEFAULT_REMOTE_TIMEOUT_MS),
            local: LocalLayoutConfig::default(),
            phase: Cell::new(LayoutPhase::Idle),
        }
    }

    /// Try `transport` before falling back.
    pub fn with_transport(mut self, transport: Rc<dyn LayoutTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase.get()
    }

    /// Position `data` inside a `width` x `height` viewport.
    ///
    /// Dropping the returned future cancels the remote request, if any.
    pub async fn layout(
        &self,
        data: &ClusterData,
        issues: &IssueIndex,
        width: f64,
        height: f64,
    ) -> LayoutOutcome {
        let reason = match &self.transport {
            None => FallbackReason::RemoteDisabled,
            Some(transport) => {
                self.phase.set(LayoutPhase::RequestingRemote);
                let started = self.scheduler.now_ms();
                match self.request_remote(transport.as_ref(), issues, width, height).await {
                    Ok(adopted) => {
                        self.phase.set(LayoutPhase::RemoteSucceeded);
                        let elapsed_ms = self.scheduler.now_ms() - started;
                        let outcome = LayoutOutcome {
                            data: adopted.data,
                            strategy: LayoutStrategy::Remote {
                                elapsed_ms,
                                compute_time_ms: adopted.compute_time_ms,
                            },
                            stubs: adopted.stubs,
                        };
                        info!(
                            "remote layout adopted: {} nodes in {} clusters, {}",
                            outcome.data.nodes.len(),
                            outcome.data.clusters.len(),
                            outcome.strategy
                        );
                        self.phase.set(LayoutPhase::Positioned);
                        return outcome;
                    }
                    Err(err) => {
                        self.phase.set(LayoutPhase::RemoteFailed);
                        warn!("remote layout unavailable, using local layout: {err}");
                        FallbackReason::RemoteFailed(err)
                    }
                }
            }
        };

        self.phase.set(LayoutPhase::LocalFallback);
        let positioned = compute_local_layout(data, width, height, &self.local);
        self.phase.set(LayoutPhase::Positioned);
        LayoutOutcome {
            data: positioned,
            strategy: LayoutStrategy::Local { reason },
            stubs: Vec::new(),
        }
    }

    /// One remote attempt raced against the timeout.
    async fn request_remote(
        &self,
        transport: &dyn LayoutTransport,
        issues: &IssueIndex,
        width: f64,
        height: f64,
    ) -> Result<AdoptedLayout, LayoutError> {
        let request =
            RemoteLayoutRequest::from_issues(issues.iter().map(|i| i.as_ref()), width, height);
        let response = transport.send(&request);
        let deadline = self.scheduler.sleep(self.timeout);

        // The loser is dropped, which cancels it.
        match future::select(response, deadline).await {
            Either::Left((response, _)) => adopt_response(response?, issues),
            Either::Right(((), _)) => Err(LayoutError::Timeout(self.timeout)),
        }
    }
}
