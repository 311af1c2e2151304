//! Host Bridge
//!
//! Seam between this crate and the host runtime receiving status
//! events: a liveness check plus an at-most-once push primitive over
//! the host's own subscriber registry.
//!
//! [`ChannelBridge`] is the bundled in-process implementation:
//! subscribers hand over a bounded crossbeam sender and every push is a
//! non-blocking `try_send`. A full or disconnected channel drops that
//! snapshot — nothing is queued or retried, a missed event is
//! recoverable by polling [`QueryService`](crate::QueryService).

use crate::snapshot::VpnSnapshot;
use crossbeam_channel::{Sender, TrySendError};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::debug;

/// Handle identifying one registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

/// Delivery across the host boundary failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DeliveryError {
    #[error("host boundary is not live")]
    BoundaryGone,
    #[error("subscriber channel rejected the snapshot")]
    ChannelRejected,
}

/// Host runtime boundary: liveness, subscriber registry, event push.
pub trait HostBridge: Send + Sync {
    /// Is the host side currently able to receive events?
    ///
    /// Checked immediately before every push; may flip concurrently
    /// with an in-flight delivery.
    fn is_live(&self) -> bool;

    /// Register a subscriber channel; pushes are non-blocking sends.
    fn add_subscriber(&self, tx: Sender<VpnSnapshot>) -> ListenerId;

    /// Remove a subscriber. Unknown ids are ignored.
    fn remove_subscriber(&self, id: ListenerId);

    /// Push one snapshot to every current subscriber.
    ///
    /// At most once per subscriber; individual send failures are
    /// swallowed. Errors only when the boundary as a whole is down or
    /// every send was rejected.
    fn push_status(&self, snapshot: &VpnSnapshot) -> Result<(), DeliveryError>;
}

/// In-process bridge over bounded crossbeam channels.
pub struct ChannelBridge {
    live: AtomicBool,
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(ListenerId, Sender<VpnSnapshot>)>>,
}

impl ChannelBridge {
    /// Create a live bridge with no subscribers.
    pub fn new() -> Self {
        Self {
            live: AtomicBool::new(true),
            next_id: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Flip boundary liveness. A dead bridge silently drops pushes.
    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::Relaxed);
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|subs| subs.len()).unwrap_or(0)
    }
}

impl Default for ChannelBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBridge for ChannelBridge {
    fn is_live(&self) -> bool {
        self.live.load(Ordering::Relaxed)
    }

    fn add_subscriber(&self, tx: Sender<VpnSnapshot>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push((id, tx));
        }
        id
    }

    fn remove_subscriber(&self, id: ListenerId) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|(sub_id, _)| *sub_id != id);
        }
    }

    fn push_status(&self, snapshot: &VpnSnapshot) -> Result<(), DeliveryError> {
        // Liveness may have flipped since the caller's own check.
        if !self.is_live() {
            return Err(DeliveryError::BoundaryGone);
        }

        let Ok(subs) = self.subscribers.lock() else {
            return Err(DeliveryError::BoundaryGone);
        };
        if subs.is_empty() {
            return Ok(());
        }

        let mut delivered = 0usize;
        for (id, tx) in subs.iter() {
            match tx.try_send(snapshot.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    debug!("{id} channel full, snapshot dropped");
                }
                Err(TrySendError::Disconnected(_)) => {
                    debug!("{id} channel disconnected, snapshot dropped");
                }
            }
        }

        if delivered == 0 {
            Err(DeliveryError::ChannelRejected)
        } else {
            Ok(())
        }
    }
}
