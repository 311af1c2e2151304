//! Event Broadcasting
//!
//! Gates snapshot delivery on host-boundary liveness and swallows
//! delivery failures. A missed event never propagates anywhere: the
//! host can always poll [`QueryService`](crate::QueryService) instead.

use crate::bridge::HostBridge;
use crate::snapshot::VpnSnapshot;
use std::sync::Arc;
use tracing::debug;

/// Liveness-checked, failure-swallowing snapshot delivery.
#[derive(Clone)]
pub struct EventBroadcaster {
    bridge: Arc<dyn HostBridge>,
}

impl EventBroadcaster {
    /// Create a broadcaster over the given host boundary.
    pub fn new(bridge: Arc<dyn HostBridge>) -> Self {
        Self { bridge }
    }

    /// Deliver one snapshot to the host boundary.
    ///
    /// No-op when the boundary is not live at the moment of the check;
    /// liveness may still flip mid-delivery, in which case the failed
    /// push is logged and discarded. Never errors and never blocks.
    pub fn deliver(&self, snapshot: &VpnSnapshot) {
        if !self.bridge.is_live() {
            return;
        }
        if let Err(err) = self.bridge.push_status(snapshot) {
            debug!("status delivery dropped: {err}");
        }
    }
}
