//! On-Demand Queries
//!
//! Synchronous accessors a host can call at any time, independent of
//! watch registration or subscriber presence. Both bypass the
//! observer/broadcaster path entirely.

use crate::builder::SnapshotBuilder;
use crate::connectivity::{Connectivity, Transport};
use crate::snapshot::{Platform, VpnSnapshot};
use std::sync::Arc;

/// Synchronous status queries.
#[derive(Clone)]
pub struct QueryService {
    connectivity: Arc<dyn Connectivity>,
    builder: SnapshotBuilder,
}

impl QueryService {
    /// Create a query service over the given backend.
    pub fn new(connectivity: Arc<dyn Connectivity>, platform: Platform) -> Self {
        let builder = SnapshotBuilder::new(connectivity.clone(), platform);
        Self {
            connectivity,
            builder,
        }
    }

    /// Is any known network a VPN?
    ///
    /// Existence check only: short-circuits on the first VPN-capable
    /// network, cheaper than building a full snapshot. No networks at
    /// all means `false`.
    pub fn is_vpn_active(&self) -> bool {
        self.connectivity.networks().into_iter().any(|id| {
            self.connectivity
                .capabilities(id)
                .is_some_and(|caps| caps.has_transport(Transport::Vpn))
        })
    }

    /// Full snapshot of the current VPN state.
    pub fn vpn_info(&self) -> VpnSnapshot {
        self.builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::NetworkCapabilities;
    use crate::sim::SimConnectivity;
    use crate::snapshot::VpnType;

    #[test]
    fn test_no_networks_is_inactive() {
        let sim = Arc::new(SimConnectivity::new());
        let query = QueryService::new(sim, Platform::Android);

        assert!(!query.is_vpn_active());
        assert!(!query.vpn_info().active);
    }

    #[test]
    fn test_vpn_network_is_active() {
        let sim = Arc::new(SimConnectivity::new());
        sim.add_network(
            NetworkCapabilities::with_transports(&[Transport::Wifi]),
            None,
        );
        sim.add_network(NetworkCapabilities::with_transports(&[Transport::Vpn]), None);

        let query = QueryService::new(sim, Platform::Android);
        assert!(query.is_vpn_active());

        let snap = query.vpn_info();
        assert!(snap.active);
        assert_eq!(snap.vpn_type, VpnType::Unknown);
    }

    #[test]
    fn test_active_flag_matches_snapshot() {
        let sim = Arc::new(SimConnectivity::new());
        let query = QueryService::new(sim.clone(), Platform::Android);
        assert_eq!(query.is_vpn_active(), query.vpn_info().active);

        sim.add_network(NetworkCapabilities::with_transports(&[Transport::Vpn]), None);
        assert_eq!(query.is_vpn_active(), query.vpn_info().active);
    }
}
