//! Connectivity Seam
//!
//! Trait and value types describing the OS connectivity subsystem this
//! crate observes: network enumeration, per-network capability and
//! link-property queries, and change-notification watches.
//!
//! The crate never talks to an OS directly; platform integrations
//! implement [`Connectivity`] and the core stays platform-free. The
//! bundled [`SimConnectivity`](crate::SimConnectivity) backend
//! implements the same trait for tests and demos.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

/// Opaque identifier for one OS-known network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(pub u64);

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Network({})", self.0)
    }
}

/// Transport a network rides on, as the OS reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Wifi,
    Cellular,
    Ethernet,
    /// Virtual/tunnel interface
    Vpn,
}

/// Capability set attached to a network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkCapabilities {
    /// Transports this network exposes
    pub transports: Vec<Transport>,
}

impl NetworkCapabilities {
    /// Capability set containing the given transports.
    pub fn with_transports(transports: &[Transport]) -> Self {
        Self {
            transports: transports.to_vec(),
        }
    }

    /// Does this network expose the given transport?
    pub fn has_transport(&self, transport: Transport) -> bool {
        self.transports.contains(&transport)
    }
}

/// One address assigned to a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAddress {
    /// The address itself
    pub address: IpAddr,
    /// Prefix length of the subnet
    pub prefix_len: u8,
}

/// One route table entry attached to a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// Next hop, when the route has one
    pub gateway: Option<IpAddr>,
    /// Is this the catch-all route?
    pub is_default: bool,
}

/// Interface-level descriptive record tied to a network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkProperties {
    /// Interface name, verbatim
    pub interface_name: Option<String>,
    /// Assigned addresses, in OS-reported order
    pub link_addresses: Vec<LinkAddress>,
    /// DNS servers, in OS-reported order
    pub dns_servers: Vec<IpAddr>,
    /// Route table
    pub routes: Vec<RouteInfo>,
}

/// A connectivity change the OS notified us about.
///
/// All four kinds currently trigger the identical rebuild+deliver
/// action; the variant is kept so per-kind handling stays possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A network came up
    Available(NetworkId),
    /// A network went away
    Lost(NetworkId),
    /// A network's capability set changed
    CapabilitiesChanged(NetworkId),
    /// A network's link properties changed
    LinkPropertiesChanged(NetworkId),
}

impl ChangeEvent {
    /// Network the event concerns.
    pub fn network(&self) -> NetworkId {
        match *self {
            Self::Available(id)
            | Self::Lost(id)
            | Self::CapabilitiesChanged(id)
            | Self::LinkPropertiesChanged(id) => id,
        }
    }
}

/// Shared change-notification handler.
///
/// Both watches installed by the observer share one handler instance;
/// unregistration is keyed by `Arc` identity, so a backend that
/// deduplicates registrations by handler identity behaves acceptably
/// (see the teardown notes in [`NetworkObserver`](crate::NetworkObserver)).
pub type ChangeHandler = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

/// The backend refused to install a watch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistrationError {
    #[error("connectivity backend refused the watch: {0}")]
    Refused(String),
}

/// The backend refused to remove a watch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UnregistrationError {
    #[error("no such watch registered")]
    NotRegistered,
}

/// OS connectivity subsystem, as seen by this crate.
///
/// Query methods are read-only and define no failure mode: a network
/// the backend no longer knows answers `None`, and callers degrade to
/// empty/inactive results rather than erroring.
pub trait Connectivity: Send + Sync {
    /// All currently known networks, in backend-defined order.
    ///
    /// The order is not guaranteed stable between calls.
    fn networks(&self) -> Vec<NetworkId>;

    /// Capability set of one network, if still known.
    fn capabilities(&self, network: NetworkId) -> Option<NetworkCapabilities>;

    /// Link properties of one network, if still known.
    fn link_properties(&self, network: NetworkId) -> Option<LinkProperties>;

    /// Install a watch firing on any default-network change.
    fn register_default_watch(&self, handler: ChangeHandler) -> Result<(), RegistrationError>;

    /// Install a watch filtered to networks exposing VPN transport.
    fn register_vpn_watch(&self, handler: ChangeHandler) -> Result<(), RegistrationError>;

    /// Remove one previously installed watch with this handler identity.
    fn unregister_watch(&self, handler: &ChangeHandler) -> Result<(), UnregistrationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_capabilities_transport_check() {
        let caps = NetworkCapabilities::with_transports(&[Transport::Wifi, Transport::Vpn]);
        assert!(caps.has_transport(Transport::Vpn));
        assert!(caps.has_transport(Transport::Wifi));
        assert!(!caps.has_transport(Transport::Cellular));

        let bare = NetworkCapabilities::default();
        assert!(!bare.has_transport(Transport::Vpn));
    }

    #[test]
    fn test_change_event_network() {
        let id = NetworkId(7);
        assert_eq!(ChangeEvent::Available(id).network(), id);
        assert_eq!(ChangeEvent::Lost(id).network(), id);
        assert_eq!(ChangeEvent::CapabilitiesChanged(id).network(), id);
        assert_eq!(ChangeEvent::LinkPropertiesChanged(id).network(), id);
    }

    #[test]
    fn test_link_properties_default_is_empty() {
        let lp = LinkProperties::default();
        assert!(lp.interface_name.is_none());
        assert!(lp.link_addresses.is_empty());
        assert!(lp.dns_servers.is_empty());
        assert!(lp.routes.is_empty());
    }

    #[test]
    fn test_route_info_shapes() {
        let default_route = RouteInfo {
            gateway: Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))),
            is_default: true,
        };
        let link_local = RouteInfo {
            gateway: None,
            is_default: false,
        };
        assert!(default_route.is_default);
        assert!(link_local.gateway.is_none());
    }
}
