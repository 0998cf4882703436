//! Packet processing services for different network layers.
//!
//! The `service` module holds the per-frame decision logic of the router:
//! dispatching on Ethertype, answering ARP and ICMP echo requests addressed
//! to the router and forwarding everything else along the routing table.

pub mod arp;
pub mod ethernet;
pub mod icmpv4;
pub mod ipv4;

use crate::core::arp_cache::SharedArpCache;
use crate::core::dev::Transport;
use crate::core::interface::Interfaces;
use crate::core::neighbor::Resolver;
use crate::core::route::RoutingTable;
use crate::core::time::Env;
use crate::Result;

/// A router over a static set of interfaces and routes.
pub struct Router<N, T> {
    /// Interfaces owned by the router.
    pub interfaces: Interfaces,
    /// Static routes used for forwarding.
    pub routes: RoutingTable,
    /// Neighbor resolution for next hops.
    pub neighbors: N,
    /// Transport for sending raw Ethernet frames.
    pub transport: T,
}

impl<N, T> Router<N, T>
where
    N: Resolver,
    T: Transport,
{
    pub fn new(interfaces: Interfaces, routes: RoutingTable, neighbors: N, transport: T) -> Self {
        Router {
            interfaces,
            routes,
            neighbors,
            transport,
        }
    }

    /// Handles a frame received on the named interface.
    ///
    /// Errors describe why a frame was dropped. None of them leave any state
    /// behind; the caller decides whether to log them.
    pub fn handle_frame(&self, frame: &[u8], interface: &str) -> Result<()> {
        let result = ethernet::recv_frame(self, frame, interface);

        if let Err(ref err) = result {
            debug!(
                "Dropped frame of {} bytes received on {} with {:?}.",
                frame.len(),
                interface,
                err
            );
        }

        result
    }
}

impl<E, T> Router<SharedArpCache<E>, T>
where
    E: Env,
    T: Transport,
{
    /// Runs the periodic neighbor resolution work, broadcasting ARP requests
    /// for unresolved next hops that are due.
    pub fn tick(&self) {
        for request in self.neighbors.sweep() {
            if let Err(err) = arp::send_request(self, &request) {
                warn!(
                    "Failed to send ARP request for {} on {} with {:?}.",
                    request.target, request.interface, err
                );
            }
        }
    }
}
