//! Simulated Connectivity Backend
//!
//! In-memory [`Connectivity`] implementation standing in for a real OS
//! connectivity subsystem. Tests and the demo binary script it: add or
//! remove networks, rewrite link properties or capabilities, and every
//! mutation fires the matching change notifications to registered
//! watches, on the mutating caller's thread.
//!
//! Watch dispatch deduplicates by handler identity, the way an OS
//! deduplicates a callback object registered through several requests:
//! a handler behind both the default and the VPN-filtered watch is
//! invoked once per event, not once per watch.

use crate::connectivity::{
    ChangeEvent, ChangeHandler, Connectivity, LinkProperties, NetworkCapabilities, NetworkId,
    RegistrationError, Transport, UnregistrationError,
};
use std::sync::{Arc, Mutex};

enum WatchKind {
    /// Fires on every network change
    Default,
    /// Fires only for networks exposing VPN transport
    VpnOnly,
}

struct Watch {
    kind: WatchKind,
    handler: ChangeHandler,
}

struct SimNetwork {
    id: NetworkId,
    capabilities: NetworkCapabilities,
    link: Option<LinkProperties>,
}

#[derive(Default)]
struct SimState {
    networks: Vec<SimNetwork>,
    watches: Vec<Watch>,
    next_id: u64,
    refuse_watches: bool,
}

/// Programmable in-memory connectivity subsystem.
pub struct SimConnectivity {
    inner: Mutex<SimState>,
}

impl SimConnectivity {
    /// Empty backend: no networks, no watches.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SimState::default()),
        }
    }

    /// Make subsequent watch registrations fail (or succeed again).
    pub fn refuse_watches(&self, refuse: bool) {
        self.lock().refuse_watches = refuse;
    }

    /// Number of currently installed watch registrations.
    pub fn watch_count(&self) -> usize {
        self.lock().watches.len()
    }

    /// Bring up a network and notify watchers it became available.
    pub fn add_network(
        &self,
        capabilities: NetworkCapabilities,
        link: Option<LinkProperties>,
    ) -> NetworkId {
        let (id, handlers) = {
            let mut state = self.lock();
            state.next_id += 1;
            let id = NetworkId(state.next_id);
            let handlers = matching_handlers(&state, &capabilities);
            state.networks.push(SimNetwork {
                id,
                capabilities,
                link,
            });
            (id, handlers)
        };
        fire(handlers, ChangeEvent::Available(id));
        id
    }

    /// Take a network down and notify watchers it was lost.
    pub fn remove_network(&self, id: NetworkId) {
        let handlers = {
            let mut state = self.lock();
            let Some(pos) = state.networks.iter().position(|n| n.id == id) else {
                return;
            };
            let removed = state.networks.remove(pos);
            matching_handlers(&state, &removed.capabilities)
        };
        fire(handlers, ChangeEvent::Lost(id));
    }

    /// Rewrite a network's link properties and notify watchers.
    pub fn set_link_properties(&self, id: NetworkId, link: LinkProperties) {
        let handlers = {
            let mut state = self.lock();
            let Some(network) = state.networks.iter().position(|n| n.id == id) else {
                return;
            };
            state.networks[network].link = Some(link);
            let caps = state.networks[network].capabilities.clone();
            matching_handlers(&state, &caps)
        };
        fire(handlers, ChangeEvent::LinkPropertiesChanged(id));
    }

    /// Rewrite a network's capability set and notify watchers.
    ///
    /// VPN-filtered watches match against the new capabilities.
    pub fn set_capabilities(&self, id: NetworkId, capabilities: NetworkCapabilities) {
        let handlers = {
            let mut state = self.lock();
            let Some(network) = state.networks.iter().position(|n| n.id == id) else {
                return;
            };
            state.networks[network].capabilities = capabilities.clone();
            matching_handlers(&state, &capabilities)
        };
        fire(handlers, ChangeEvent::CapabilitiesChanged(id));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimState> {
        // Handlers are never invoked under this lock, so poisoning only
        // happens if scripting code itself panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn register(&self, kind: WatchKind, handler: ChangeHandler) -> Result<(), RegistrationError> {
        let mut state = self.lock();
        if state.refuse_watches {
            return Err(RegistrationError::Refused(
                "watch registration disabled".to_string(),
            ));
        }
        state.watches.push(Watch { kind, handler });
        Ok(())
    }
}

impl Default for SimConnectivity {
    fn default() -> Self {
        Self::new()
    }
}

/// Handlers to notify for a change on a network with these
/// capabilities, deduplicated by handler identity.
fn matching_handlers(state: &SimState, capabilities: &NetworkCapabilities) -> Vec<ChangeHandler> {
    let is_vpn = capabilities.has_transport(Transport::Vpn);
    let mut handlers: Vec<ChangeHandler> = Vec::new();
    for watch in &state.watches {
        let matches = match watch.kind {
            WatchKind::Default => true,
            WatchKind::VpnOnly => is_vpn,
        };
        if matches && !handlers.iter().any(|h| Arc::ptr_eq(h, &watch.handler)) {
            handlers.push(watch.handler.clone());
        }
    }
    handlers
}

/// Invoke handlers outside the state lock; handlers may re-enter the
/// backend to rebuild a snapshot.
fn fire(handlers: Vec<ChangeHandler>, event: ChangeEvent) {
    for handler in handlers {
        handler(event);
    }
}

impl Connectivity for SimConnectivity {
    fn networks(&self) -> Vec<NetworkId> {
        self.lock().networks.iter().map(|n| n.id).collect()
    }

    fn capabilities(&self, network: NetworkId) -> Option<NetworkCapabilities> {
        self.lock()
            .networks
            .iter()
            .find(|n| n.id == network)
            .map(|n| n.capabilities.clone())
    }

    fn link_properties(&self, network: NetworkId) -> Option<LinkProperties> {
        self.lock()
            .networks
            .iter()
            .find(|n| n.id == network)
            .and_then(|n| n.link.clone())
    }

    fn register_default_watch(&self, handler: ChangeHandler) -> Result<(), RegistrationError> {
        self.register(WatchKind::Default, handler)
    }

    fn register_vpn_watch(&self, handler: ChangeHandler) -> Result<(), RegistrationError> {
        self.register(WatchKind::VpnOnly, handler)
    }

    fn unregister_watch(&self, handler: &ChangeHandler) -> Result<(), UnregistrationError> {
        let mut state = self.lock();
        let Some(pos) = state
            .watches
            .iter()
            .position(|w| Arc::ptr_eq(&w.handler, handler))
        else {
            return Err(UnregistrationError::NotRegistered);
        };
        state.watches.remove(pos);
        Ok(())
    }
}
