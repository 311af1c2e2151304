//! Snapshot Builder
//!
//! Derives a normalized [`VpnSnapshot`] from the raw network state the
//! connectivity backend reports. Read-only: the builder queries, never
//! subscribes and never mutates.
//!
//! # Selection
//!
//! The first enumerated network exposing VPN transport is the one
//! described; enumeration order is backend-defined and deliberately not
//! second-guessed here. At most one network is ever considered, even
//! when several qualify.

use crate::connectivity::{Connectivity, NetworkId, Transport};
use crate::snapshot::{now_ms, Platform, VpnSnapshot, VpnType};
use crate::classify::infer_type;
use std::sync::Arc;

/// Builds fresh snapshots from current backend state.
#[derive(Clone)]
pub struct SnapshotBuilder {
    connectivity: Arc<dyn Connectivity>,
    platform: Platform,
}

impl SnapshotBuilder {
    /// Create a builder over the given backend.
    pub fn new(connectivity: Arc<dyn Connectivity>, platform: Platform) -> Self {
        Self {
            connectivity,
            platform,
        }
    }

    /// First known network exposing VPN transport, if any.
    pub(crate) fn current_vpn_network(&self) -> Option<NetworkId> {
        self.connectivity.networks().into_iter().find(|&id| {
            self.connectivity
                .capabilities(id)
                .is_some_and(|caps| caps.has_transport(Transport::Vpn))
        })
    }

    /// Build a snapshot of the current VPN state.
    ///
    /// Never fails: a backend with no VPN network yields an inactive
    /// snapshot, and a VPN network with missing link properties yields
    /// an active snapshot with absent fields and `Unknown` type.
    pub fn build(&self) -> VpnSnapshot {
        let Some(network) = self.current_vpn_network() else {
            return VpnSnapshot::inactive(self.platform);
        };

        let link = self.connectivity.link_properties(network).unwrap_or_default();

        let interface_name = link.interface_name;
        let local_address = link
            .link_addresses
            .first()
            .map(|addr| addr.address.to_string());
        let dns = link
            .dns_servers
            .iter()
            .map(|server| server.to_string())
            .collect();
        let remote_address = link
            .routes
            .iter()
            .find(|route| route.is_default)
            .and_then(|route| route.gateway)
            .map(|gateway| gateway.to_string());

        let vpn_type = infer_type(interface_name.as_deref());
        debug_assert_ne!(vpn_type, VpnType::None);

        VpnSnapshot {
            active: true,
            vpn_type,
            interface_name,
            local_address,
            remote_address,
            dns,
            timestamp_ms: now_ms(),
            platform: self.platform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::{LinkAddress, LinkProperties, NetworkCapabilities, RouteInfo};
    use crate::sim::SimConnectivity;
    use std::net::{IpAddr, Ipv4Addr};

    fn addr(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(a, b, c, d))
    }

    fn tun0_link() -> LinkProperties {
        LinkProperties {
            interface_name: Some("tun0".to_string()),
            link_addresses: vec![LinkAddress {
                address: addr(10, 0, 0, 2),
                prefix_len: 24,
            }],
            dns_servers: vec![addr(8, 8, 8, 8)],
            routes: vec![RouteInfo {
                gateway: Some(addr(10, 0, 0, 1)),
                is_default: true,
            }],
        }
    }

    #[test]
    fn test_no_vpn_network() {
        let sim = Arc::new(SimConnectivity::new());
        sim.add_network(
            NetworkCapabilities::with_transports(&[Transport::Wifi]),
            Some(LinkProperties {
                interface_name: Some("wlan0".to_string()),
                ..LinkProperties::default()
            }),
        );

        let builder = SnapshotBuilder::new(sim, Platform::Android);
        let snap = builder.build();

        assert!(!snap.active);
        assert_eq!(snap.vpn_type, VpnType::None);
        assert!(snap.interface_name.is_none());
        assert!(snap.local_address.is_none());
        assert!(snap.remote_address.is_none());
        assert!(snap.dns.is_empty());
    }

    #[test]
    fn test_openvpn_network() {
        let sim = Arc::new(SimConnectivity::new());
        sim.add_network(
            NetworkCapabilities::with_transports(&[Transport::Vpn]),
            Some(tun0_link()),
        );

        let builder = SnapshotBuilder::new(sim, Platform::Android);
        let snap = builder.build();

        assert!(snap.active);
        assert_eq!(snap.vpn_type, VpnType::Openvpn);
        assert_eq!(snap.interface_name.as_deref(), Some("tun0"));
        assert_eq!(snap.local_address.as_deref(), Some("10.0.0.2"));
        assert_eq!(snap.remote_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(snap.dns, vec!["8.8.8.8".to_string()]);
        assert_eq!(snap.platform, Platform::Android);
    }

    #[test]
    fn test_only_first_link_address_kept() {
        let sim = Arc::new(SimConnectivity::new());
        let mut link = tun0_link();
        link.link_addresses.push(LinkAddress {
            address: addr(10, 0, 0, 3),
            prefix_len: 24,
        });
        sim.add_network(
            NetworkCapabilities::with_transports(&[Transport::Vpn]),
            Some(link),
        );

        let snap = SnapshotBuilder::new(sim, Platform::Android).build();
        assert_eq!(snap.local_address.as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn test_no_default_route_means_no_remote() {
        let sim = Arc::new(SimConnectivity::new());
        let mut link = tun0_link();
        link.routes = vec![RouteInfo {
            gateway: Some(addr(10, 0, 0, 1)),
            is_default: false,
        }];
        sim.add_network(
            NetworkCapabilities::with_transports(&[Transport::Vpn]),
            Some(link),
        );

        let snap = SnapshotBuilder::new(sim, Platform::Android).build();
        assert!(snap.active);
        assert!(snap.remote_address.is_none());
    }

    #[test]
    fn test_missing_link_properties_degrade() {
        let sim = Arc::new(SimConnectivity::new());
        sim.add_network(NetworkCapabilities::with_transports(&[Transport::Vpn]), None);

        let snap = SnapshotBuilder::new(sim, Platform::Android).build();

        // Active but undescribable: classification failure is not inactivity.
        assert!(snap.active);
        assert_eq!(snap.vpn_type, VpnType::Unknown);
        assert!(snap.interface_name.is_none());
        assert!(snap.dns.is_empty());
    }

    #[test]
    fn test_first_vpn_network_wins() {
        let sim = Arc::new(SimConnectivity::new());
        sim.add_network(
            NetworkCapabilities::with_transports(&[Transport::Wifi]),
            None,
        );
        sim.add_network(
            NetworkCapabilities::with_transports(&[Transport::Vpn]),
            Some(tun0_link()),
        );
        let mut second = tun0_link();
        second.interface_name = Some("wg0".to_string());
        sim.add_network(
            NetworkCapabilities::with_transports(&[Transport::Vpn]),
            Some(second),
        );

        let snap = SnapshotBuilder::new(sim, Platform::Android).build();
        assert_eq!(snap.interface_name.as_deref(), Some("tun0"));
        assert_eq!(snap.vpn_type, VpnType::Openvpn);
    }

    #[test]
    fn test_dns_order_preserved() {
        let sim = Arc::new(SimConnectivity::new());
        let mut link = tun0_link();
        link.dns_servers = vec![addr(9, 9, 9, 9), addr(1, 1, 1, 1), addr(8, 8, 4, 4)];
        sim.add_network(
            NetworkCapabilities::with_transports(&[Transport::Vpn]),
            Some(link),
        );

        let snap = SnapshotBuilder::new(sim, Platform::Android).build();
        assert_eq!(
            snap.dns,
            vec![
                "9.9.9.9".to_string(),
                "1.1.1.1".to_string(),
                "8.8.4.4".to_string()
            ]
        );
    }
}
