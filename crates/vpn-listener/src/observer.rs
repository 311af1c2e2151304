//! Network Observation
//!
//! Manages the two change-notification watches (any default-network
//! change, VPN-filtered) and turns every notification into one
//! rebuild+deliver cycle. Registration is idempotent and failures are
//! swallowed: a refused watch leaves its flag false and the host may
//! simply call `initialize` again.

use crate::broadcast::EventBroadcaster;
use crate::builder::SnapshotBuilder;
use crate::connectivity::{ChangeHandler, Connectivity};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registration flags for one controller instance.
///
/// All flags start false and are mutated only by the controller's
/// lifecycle methods (`initialize`, `teardown`, `subscribe`,
/// `Subscription::remove`). Atomics because the notification thread
/// reads `has_listeners` concurrently with lifecycle calls from the
/// host control thread; ordering is relaxed, these are coarse flags.
pub struct RegistrationState {
    default_registered: AtomicBool,
    vpn_only_registered: AtomicBool,
    has_listeners: AtomicBool,
}

impl RegistrationState {
    /// All flags false.
    pub fn new() -> Self {
        Self {
            default_registered: AtomicBool::new(false),
            vpn_only_registered: AtomicBool::new(false),
            has_listeners: AtomicBool::new(false),
        }
    }

    /// Is the default-network watch installed?
    pub fn default_registered(&self) -> bool {
        self.default_registered.load(Ordering::Relaxed)
    }

    /// Is the VPN-filtered watch installed?
    pub fn vpn_only_registered(&self) -> bool {
        self.vpn_only_registered.load(Ordering::Relaxed)
    }

    /// Has the host announced at least one active subscriber?
    ///
    /// Coarse informational gate only — the boundary's own registry
    /// decides who actually receives a delivery.
    pub fn has_listeners(&self) -> bool {
        self.has_listeners.load(Ordering::Relaxed)
    }

    pub(crate) fn set_default_registered(&self, value: bool) {
        self.default_registered.store(value, Ordering::Relaxed);
    }

    pub(crate) fn set_vpn_only_registered(&self, value: bool) {
        self.vpn_only_registered.store(value, Ordering::Relaxed);
    }

    pub(crate) fn set_has_listeners(&self, value: bool) {
        self.has_listeners.store(value, Ordering::Relaxed);
    }
}

impl Default for RegistrationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs and removes connectivity watches; reacts to notifications.
pub struct NetworkObserver {
    connectivity: Arc<dyn Connectivity>,
    state: Arc<RegistrationState>,
    /// One handler shared by both watches. Unregistration is keyed by
    /// this handler's identity, so a backend deduplicating by identity
    /// may refuse the second removal; that refusal is swallowed.
    handler: ChangeHandler,
}

impl NetworkObserver {
    /// Create an observer whose notifications rebuild and deliver.
    pub fn new(
        connectivity: Arc<dyn Connectivity>,
        state: Arc<RegistrationState>,
        builder: SnapshotBuilder,
        broadcaster: EventBroadcaster,
    ) -> Self {
        let handler: ChangeHandler = Arc::new(move |event| {
            // All four event kinds get the identical treatment.
            debug!("connectivity change: {event:?}");
            broadcaster.deliver(&builder.build());
        });

        Self {
            connectivity,
            state,
            handler,
        }
    }

    /// Install both watches, independently and idempotently.
    ///
    /// Partial success is a valid steady state: each watch is guarded
    /// by its own flag and a refusal leaves that flag false without
    /// touching the other. Calling with both flags already set is a
    /// no-op. Never propagates an error.
    pub fn initialize(&self) {
        if !self.state.default_registered() {
            match self
                .connectivity
                .register_default_watch(self.handler.clone())
            {
                Ok(()) => {
                    self.state.set_default_registered(true);
                    info!("default-network watch registered");
                }
                Err(err) => warn!("default-network watch refused: {err}"),
            }
        }

        if !self.state.vpn_only_registered() {
            match self.connectivity.register_vpn_watch(self.handler.clone()) {
                Ok(()) => {
                    self.state.set_vpn_only_registered(true);
                    info!("vpn-filtered watch registered");
                }
                Err(err) => warn!("vpn-filtered watch refused: {err}"),
            }
        }
    }

    /// Remove whichever watches are installed.
    ///
    /// Idempotent and infallible: with both flags false this does
    /// nothing, and removal failures are logged and swallowed (the
    /// flag then stays set, so a later call attempts again). Effective
    /// for future events only — an in-flight rebuild+deliver is not
    /// cancelled.
    pub fn teardown(&self) {
        if self.state.default_registered() {
            match self.connectivity.unregister_watch(&self.handler) {
                Ok(()) => {
                    self.state.set_default_registered(false);
                    info!("default-network watch removed");
                }
                Err(err) => debug!("default-network watch removal failed: {err}"),
            }
        }

        if self.state.vpn_only_registered() {
            match self.connectivity.unregister_watch(&self.handler) {
                Ok(()) => {
                    self.state.set_vpn_only_registered(false);
                    info!("vpn-filtered watch removed");
                }
                Err(err) => debug!("vpn-filtered watch removal failed: {err}"),
            }
        }
    }
}
