//! Listener Controller
//!
//! The host-facing facade. One controller owns one
//! [`RegistrationState`] and wires the observer, builder, broadcaster
//! and query service over a connectivity backend and a host bridge.
//!
//! # Usage
//!
//! ```rust,ignore
//! let listener = VpnListener::new(connectivity, bridge.clone(), Platform::Android);
//! listener.initialize();
//!
//! let (tx, rx) = crossbeam_channel::bounded(16);
//! let subscription = listener.subscribe(tx); // current state arrives immediately
//!
//! for snapshot in rx.iter() {
//!     println!("{}", serde_json::to_string(&snapshot)?);
//! }
//!
//! subscription.remove();
//! listener.teardown();
//! ```

use crate::bridge::{HostBridge, ListenerId};
use crate::broadcast::EventBroadcaster;
use crate::builder::SnapshotBuilder;
use crate::connectivity::Connectivity;
use crate::observer::{NetworkObserver, RegistrationState};
use crate::query::QueryService;
use crate::snapshot::{Platform, VpnSnapshot};
use crossbeam_channel::Sender;
use std::sync::Arc;
use tracing::info;

/// Live subscription to status changes.
///
/// Dropping the handle without calling [`remove`](Self::remove) leaves
/// the subscriber registered at the bridge; pushes to its disconnected
/// channel are then dropped harmlessly, but `remove` is the tidy path.
pub struct Subscription {
    bridge: Arc<dyn HostBridge>,
    state: Arc<RegistrationState>,
    id: ListenerId,
}

impl Subscription {
    /// Deregister the subscriber and clear the listener flag.
    pub fn remove(self) {
        self.bridge.remove_subscriber(self.id);
        self.state.set_has_listeners(false);
    }
}

/// VPN status listener: one-shot queries plus a live change feed.
pub struct VpnListener {
    state: Arc<RegistrationState>,
    observer: NetworkObserver,
    broadcaster: EventBroadcaster,
    builder: SnapshotBuilder,
    query: QueryService,
    bridge: Arc<dyn HostBridge>,
}

impl VpnListener {
    /// Wire a controller over a connectivity backend and host bridge.
    ///
    /// No watches are installed yet; call [`initialize`](Self::initialize).
    pub fn new(
        connectivity: Arc<dyn Connectivity>,
        bridge: Arc<dyn HostBridge>,
        platform: Platform,
    ) -> Self {
        let state = Arc::new(RegistrationState::new());
        let builder = SnapshotBuilder::new(connectivity.clone(), platform);
        let broadcaster = EventBroadcaster::new(bridge.clone());
        let observer = NetworkObserver::new(
            connectivity.clone(),
            state.clone(),
            builder.clone(),
            broadcaster.clone(),
        );
        let query = QueryService::new(connectivity, platform);

        Self {
            state,
            observer,
            broadcaster,
            builder,
            query,
            bridge,
        }
    }

    /// Install the connectivity watches. Idempotent; never fails.
    pub fn initialize(&self) {
        self.observer.initialize();
    }

    /// Remove the connectivity watches. Idempotent; never fails, even
    /// if `initialize` never ran or only partially succeeded.
    pub fn teardown(&self) {
        self.observer.teardown();
    }

    /// Is a VPN-capable network currently up?
    pub fn is_vpn_active(&self) -> bool {
        self.query.is_vpn_active()
    }

    /// Fresh snapshot of the current VPN state.
    pub fn vpn_info(&self) -> VpnSnapshot {
        self.query.vpn_info()
    }

    /// Subscribe to status changes.
    ///
    /// Registers the channel at the host bridge, marks the listener
    /// flag, and synchronously delivers one freshly built snapshot so
    /// the subscriber sees current state rather than only future
    /// changes. Subscribing does not install watches and unsubscribing
    /// does not remove them; the watch lifecycle belongs to
    /// `initialize`/`teardown` alone, which keeps re-subscription
    /// cheap.
    pub fn subscribe(&self, tx: Sender<VpnSnapshot>) -> Subscription {
        let id = self.bridge.add_subscriber(tx);
        self.state.set_has_listeners(true);
        info!("status subscriber added ({id})");

        self.broadcaster.deliver(&self.builder.build());

        Subscription {
            bridge: self.bridge.clone(),
            state: self.state.clone(),
            id,
        }
    }

    /// Registration flags, for host introspection.
    pub fn registration_state(&self) -> &RegistrationState {
        &self.state
    }
}
