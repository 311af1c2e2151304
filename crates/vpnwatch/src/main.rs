//! vpnwatch: VPN status watcher demo
//!
//! Wires the listener core to the simulated connectivity backend,
//! subscribes to the change feed and prints each snapshot as one JSON
//! line while a scripted VPN flaps up and down. Ctrl-C exits.

use anyhow::Result;
use crossbeam_channel::bounded;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use vpn_listener::{
    ChannelBridge, LinkAddress, LinkProperties, NetworkCapabilities, NetworkId, Platform,
    RouteInfo, SimConnectivity, Transport, VpnListener,
};

/// Link record for the scripted WireGuard tunnel.
fn wg0_link(dns_rotated: bool) -> LinkProperties {
    let dns = if dns_rotated {
        vec!["1.1.1.1".parse().unwrap(), "1.0.0.1".parse().unwrap()]
    } else {
        vec!["10.64.0.1".parse().unwrap()]
    };
    LinkProperties {
        interface_name: Some("wg0".to_string()),
        link_addresses: vec![LinkAddress {
            address: "10.64.0.2".parse().unwrap(),
            prefix_len: 32,
        }],
        dns_servers: dns,
        routes: vec![RouteInfo {
            gateway: Some("10.64.0.1".parse().unwrap()),
            is_default: true,
        }],
    }
}

/// One flap cycle: tunnel up, DNS churn, tunnel down.
fn flap(sim: &SimConnectivity, tunnel: &mut Option<NetworkId>, dns_rotated: &mut bool) {
    match tunnel.take() {
        None => {
            let id = sim.add_network(
                NetworkCapabilities::with_transports(&[Transport::Vpn]),
                Some(wg0_link(false)),
            );
            *dns_rotated = false;
            *tunnel = Some(id);
        }
        Some(id) if !*dns_rotated => {
            sim.set_link_properties(id, wg0_link(true));
            *dns_rotated = true;
            *tunnel = Some(id);
        }
        Some(id) => {
            sim.remove_network(id);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    info!("vpnwatch starting (simulated connectivity backend)");

    let sim = Arc::new(SimConnectivity::new());
    // The sim also carries the device's ordinary wifi network.
    sim.add_network(
        NetworkCapabilities::with_transports(&[Transport::Wifi]),
        Some(LinkProperties {
            interface_name: Some("wlan0".to_string()),
            ..LinkProperties::default()
        }),
    );

    let bridge = Arc::new(ChannelBridge::new());
    let listener = VpnListener::new(sim.clone(), bridge, Platform::Android);
    listener.initialize();

    info!(
        "one-shot query: vpn active = {}",
        listener.is_vpn_active()
    );

    let (tx, rx) = bounded(32);
    let subscription = listener.subscribe(tx);

    // Print the feed from a plain thread; the channel receiver blocks.
    let printer = std::thread::spawn(move || {
        for snapshot in rx.iter() {
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{line}"),
                Err(err) => tracing::warn!("snapshot not serializable: {err}"),
            }
        }
    });

    // Scripted VPN flap until ctrl-c.
    let mut tunnel: Option<NetworkId> = None;
    let mut dns_rotated = false;
    let mut ticker = tokio::time::interval(Duration::from_secs(2));
    loop {
        tokio::select! {
            _ = ticker.tick() => flap(&sim, &mut tunnel, &mut dns_rotated),
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("vpnwatch shutting down");
    subscription.remove();
    listener.teardown();
    printer
        .join()
        .map_err(|_| anyhow::anyhow!("printer thread panicked"))?;

    Ok(())
}
