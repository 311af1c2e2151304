//! Tunnel Type Classification
//!
//! Pure interface-name heuristic: case-insensitive prefix match,
//! first match wins, fixed priority order. No side effects and no
//! failure mode — anything unrecognized is `Unknown`.

use crate::snapshot::VpnType;

// Probe order is fixed; earlier entries win.
const PREFIXES: &[(&str, VpnType)] = &[
    ("wg", VpnType::Wireguard),
    ("tun", VpnType::Openvpn),
    ("tap", VpnType::Openvpn),
    ("ppp", VpnType::L2tp),
    ("ipsec", VpnType::Ipsec),
    ("ike", VpnType::Ikev2),
];

/// Infer the tunnel technology from an interface name.
///
/// An absent name classifies as `Unknown`, not `None` — absence of a
/// name says nothing about whether the tunnel is up.
pub fn infer_type(interface_name: Option<&str>) -> VpnType {
    let Some(name) = interface_name else {
        return VpnType::Unknown;
    };
    let lower = name.to_ascii_lowercase();
    PREFIXES
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
        .map(|&(_, vpn_type)| vpn_type)
        .unwrap_or(VpnType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_prefixes() {
        assert_eq!(infer_type(Some("wg0")), VpnType::Wireguard);
        assert_eq!(infer_type(Some("tun0")), VpnType::Openvpn);
        assert_eq!(infer_type(Some("tap1")), VpnType::Openvpn);
        assert_eq!(infer_type(Some("ppp0")), VpnType::L2tp);
        assert_eq!(infer_type(Some("ipsec0")), VpnType::Ipsec);
        assert_eq!(infer_type(Some("ike0")), VpnType::Ikev2);
    }

    #[test]
    fn test_unrecognized_name() {
        assert_eq!(infer_type(Some("eth0")), VpnType::Unknown);
        assert_eq!(infer_type(Some("")), VpnType::Unknown);
    }

    #[test]
    fn test_absent_name() {
        assert_eq!(infer_type(None), VpnType::Unknown);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(infer_type(Some("WG-home")), VpnType::Wireguard);
        assert_eq!(infer_type(Some("TUN0")), VpnType::Openvpn);
        assert_eq!(infer_type(Some("IpSec-corp")), VpnType::Ipsec);
    }

    #[test]
    fn test_ipsec_wins_over_ike() {
        // Both rows start with "i"; the longer prefix has its own entry
        // and must not fall through to ikev2.
        assert_eq!(infer_type(Some("ipsec4")), VpnType::Ipsec);
        assert_eq!(infer_type(Some("ikev2-0")), VpnType::Ikev2);
    }
}
