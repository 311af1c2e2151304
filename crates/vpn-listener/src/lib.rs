//! vpn-listener - VPN Status Observation
//!
//! Answers one question for a host application: is a VPN tunnel
//! currently active on this device, and if so, what does it look like
//! (interface, addresses, DNS, tunnel technology)? Served both as a
//! one-shot query and as a live change feed.
//!
//! # Architecture
//!
//! ```text
//!  OS change event                         host control thread
//!        │                                        │
//!        ▼                                        ▼
//! ┌───────────────┐   ┌─────────────────┐   ┌──────────────┐
//! │ NetworkObserver│──▶│ SnapshotBuilder │◀──│ QueryService │
//! └───────┬───────┘   │ (TypeClassifier)│   └──────────────┘
//!         │           └─────────────────┘
//!         ▼
//! ┌────────────────┐   ┌────────────┐
//! │ EventBroadcaster│──▶│ HostBridge │──▶ subscriber channels
//! └────────────────┘   └────────────┘
//! ```
//!
//! # Design
//!
//! - **Snapshots are values**: built fresh per query or event, never
//!   mutated, never cached here.
//! - **Observation failures never surface**: refused watch
//!   registrations, failed unregistrations and failed deliveries are
//!   logged and swallowed; queries degrade to inactive/empty results.
//! - **Platform-free core**: the OS connectivity subsystem and the
//!   host runtime appear only as the [`Connectivity`] and
//!   [`HostBridge`] traits. [`SimConnectivity`] implements the former
//!   in memory for tests and demos.

mod bridge;
mod broadcast;
mod builder;
mod classify;
mod connectivity;
mod controller;
mod observer;
mod query;
mod sim;
mod snapshot;

pub use bridge::{ChannelBridge, DeliveryError, HostBridge, ListenerId};
pub use broadcast::EventBroadcaster;
pub use builder::SnapshotBuilder;
pub use classify::infer_type;
pub use connectivity::{
    ChangeEvent, ChangeHandler, Connectivity, LinkAddress, LinkProperties, NetworkCapabilities,
    NetworkId, RegistrationError, RouteInfo, Transport, UnregistrationError,
};
pub use controller::{Subscription, VpnListener};
pub use observer::{NetworkObserver, RegistrationState};
pub use query::QueryService;
pub use sim::SimConnectivity;
pub use snapshot::{Platform, VpnSnapshot, VpnType};
