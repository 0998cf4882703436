//! Contract between the router and the neighbor resolution subsystem.
//!
//! The router never touches the subsystem's state directly. It looks up link
//! layer addresses, hands over packets it can not deliver yet and is told
//! which packets to flush when an ARP reply resolves an address.

use crate::core::repr::{
    EthernetAddress,
    Ipv4Address,
};

/// A copy of a frame waiting for its next hop to resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueuedPacket {
    /// The complete Ethernet frame. Only its addresses are rewritten on flush.
    pub frame: Vec<u8>,
    /// Interface the frame leaves on once resolved.
    pub egress: String,
    /// Interface the frame arrived on.
    pub ingress: String,
}

/// Handle describing a pending resolution after a packet was queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pending {
    pub next_hop: Ipv4Address,
    /// Number of packets waiting on next_hop, including the one just queued.
    pub queued: usize,
}

/// A completed resolution, carrying the packets queued for it in order.
#[derive(Debug)]
pub struct Resolved {
    pub next_hop: Ipv4Address,
    pub eth_addr: EthernetAddress,
    pub packets: Vec<QueuedPacket>,
}

/// Neighbor resolution operations the router depends on.
///
/// Implementations are shared with background activity (retransmitting
/// requests, expiring entries) and synchronize internally, hence `&self`.
pub trait Resolver {
    /// Returns the cached link layer address for next_hop, if any.
    fn lookup(&self, next_hop: Ipv4Address) -> Option<EthernetAddress>;

    /// Queues a copy of frame for delivery once next_hop resolves.
    fn enqueue(&self, next_hop: Ipv4Address, frame: &[u8], egress: &str, ingress: &str)
        -> Pending;

    /// Records an observed binding, returning any packets that were waiting
    /// on it. The pending resolution is gone once returned.
    fn observe_reply(&self, eth_addr: EthernetAddress, ipv4_addr: Ipv4Address)
        -> Option<Resolved>;
}
