//! Router state management
//!
//! Tracks the committed route and every navigation in progress. A navigation
//! only gets a sequence number once its guards pass and it is handed to the
//! host, so vetoed attempts never affect ordering.

use crate::route::RouteInfo;
use serde::{Deserialize, Serialize};

/// What the router is doing right now, across all navigations in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouterPhase {
    /// No navigation pending.
    #[default]
    Idle,
    /// Guards are running.
    Resolving,
    /// A host adapter call is in flight.
    Transitioning,
}

/// Which adapter success may commit when navigations overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// A success commits unless a navigation dispatched after it has already
    /// committed; such stale successes report
    /// [`NavigationResult::Superseded`](crate::NavigationResult::Superseded).
    #[default]
    LatestIssued,
    /// Every success commits, so the last callback to fire wins.
    LatestCompleted,
}

/// Router state
#[derive(Debug, Default)]
pub struct RouterState {
    /// Committed route, `None` before the first navigation
    current: Option<RouteInfo>,
    /// Sequence number of the last dispatched navigation
    dispatched: u64,
    /// Sequence number of the committed route
    committed: u64,
    /// Navigations running guards
    resolving: usize,
    /// Navigations waiting on the host
    in_flight: usize,
}

impl RouterState {
    /// Create a new router state
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number of the last dispatched navigation
    pub fn navigation_id(&self) -> u64 {
        self.dispatched
    }

    /// A navigation started running guards
    pub fn begin_resolving(&mut self) {
        self.resolving += 1;
    }

    /// A navigation was vetoed before reaching the host
    pub fn end_resolving(&mut self) {
        self.resolving = self.resolving.saturating_sub(1);
    }

    /// A navigation passed its guards and is handed to the host.
    ///
    /// Returns its sequence number.
    pub fn dispatch(&mut self) -> u64 {
        self.resolving = self.resolving.saturating_sub(1);
        self.in_flight += 1;
        self.dispatched += 1;
        self.dispatched
    }

    /// The host rejected a dispatched navigation; it never commits.
    pub fn fail(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// The host performed navigation `nav_id`.
    ///
    /// Commits `route` and returns the route it replaces, or hands `route`
    /// back if `policy` says a newer committed navigation wins.
    pub fn complete(
        &mut self,
        nav_id: u64,
        route: RouteInfo,
        policy: CommitPolicy,
    ) -> Result<Option<RouteInfo>, RouteInfo> {
        self.in_flight = self.in_flight.saturating_sub(1);
        if policy == CommitPolicy::LatestIssued && nav_id < self.committed {
            return Err(route);
        }
        self.committed = self.committed.max(nav_id);
        Ok(self.current.replace(route))
    }

    /// Sequence number of the committed route (0 before any commit)
    pub fn committed_id(&self) -> u64 {
        self.committed
    }

    /// Current phase: `Transitioning` while any host call is pending,
    /// otherwise `Resolving` while any guards run.
    pub fn phase(&self) -> RouterPhase {
        if self.in_flight > 0 {
            RouterPhase::Transitioning
        } else if self.resolving > 0 {
            RouterPhase::Resolving
        } else {
            RouterPhase::Idle
        }
    }

    /// Get the committed route
    pub fn current(&self) -> Option<&RouteInfo> {
        self.current.as_ref()
    }
}
