//! VPN Status Snapshot
//!
//! Value types describing a point-in-time view of VPN connectivity.
//! A snapshot is built fresh on every query and every change event,
//! is never mutated after construction, and is never cached by this
//! crate. The serde shape matches the wire contract consumed by hosts:
//! camelCase field names, lowercase enum values, absent optional fields
//! omitted entirely.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Tunnel technology inferred from the interface name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VpnType {
    /// No VPN is active
    None,
    /// IPsec tunnel
    Ipsec,
    /// IKEv2 tunnel
    Ikev2,
    /// OpenVPN (tun/tap) tunnel
    Openvpn,
    /// WireGuard tunnel
    Wireguard,
    /// L2TP (ppp) tunnel
    L2tp,
    /// PPTP tunnel
    Pptp,
    /// VPN is active but the technology could not be inferred
    Unknown,
}

impl fmt::Display for VpnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Ipsec => "ipsec",
            Self::Ikev2 => "ikev2",
            Self::Openvpn => "openvpn",
            Self::Wireguard => "wireguard",
            Self::L2tp => "l2tp",
            Self::Pptp => "pptp",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// OS integration the snapshot was produced by. Constant per backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

/// Point-in-time VPN status record.
///
/// Invariant: `active == false` exactly when `vpn_type == VpnType::None`.
/// An active snapshot may still carry `VpnType::Unknown` — classification
/// failure does not imply the tunnel is down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnSnapshot {
    /// Is a VPN-capable network currently up?
    pub active: bool,
    /// Inferred tunnel technology
    #[serde(rename = "type")]
    pub vpn_type: VpnType,
    /// Raw interface name as the OS reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
    /// Address of the first link address entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_address: Option<String>,
    /// Gateway of the default route, when one is flagged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<String>,
    /// DNS servers in OS-reported order; may be empty
    pub dns: Vec<String>,
    /// Wall clock at construction, milliseconds since epoch
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
    /// Which OS integration produced this snapshot
    pub platform: Platform,
}

impl VpnSnapshot {
    /// Snapshot describing "no VPN active" for the given platform.
    pub fn inactive(platform: Platform) -> Self {
        Self {
            active: false,
            vpn_type: VpnType::None,
            interface_name: None,
            local_address: None,
            remote_address: None,
            dns: Vec::new(),
            timestamp_ms: now_ms(),
            platform,
        }
    }
}

/// Wall clock in milliseconds since the Unix epoch.
///
/// A clock before the epoch degrades to 0 rather than failing; queries
/// in this crate define no failure mode.
pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
