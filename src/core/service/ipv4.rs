use crate::core::dev::Transport;
use crate::core::interface::Interface;
use crate::core::neighbor::Resolver;
use crate::core::repr::{
    ipv4_protocols,
    EthernetFrame,
    Ipv4Packet,
};
use crate::core::service::{
    icmpv4,
    Router,
};
use crate::{
    Error,
    Result,
};

/// Receives an IPv4 packet from an interface.
///
/// The header is validated and its checksum verified before anything else.
/// Packets addressed to one of the router's interfaces are delivered
/// locally, all others are forwarded.
pub fn recv_packet<N, T>(
    router: &Router<N, T>,
    interface: &Interface,
    eth_frame: &EthernetFrame<&[u8]>,
) -> Result<()>
where
    N: Resolver,
    T: Transport,
{
    let ipv4_packet = Ipv4Packet::try_new(eth_frame.payload())?;
    ipv4_packet.check_len()?;
    ipv4_packet.check_encoding()?;

    let dst_addr = ipv4_packet.dst_addr();

    if !router.interfaces.is_local(dst_addr) {
        return forward_packet(router, interface, eth_frame);
    }

    match ipv4_packet.protocol() {
        ipv4_protocols::ICMP => icmpv4::recv_packet(router, interface, eth_frame, &ipv4_packet),
        i => {
            debug!(
                "Ignoring IPv4 packet for {} with protocol {}.",
                dst_addr, i
            );
            Err(Error::Ignored)
        }
    }
}

/// Forwards a validated IPv4 packet towards its destination.
///
/// The forwarded copy has its TTL decremented and checksum refreshed. It is
/// sent right away if the next hop's Ethernet address is known, otherwise it
/// is queued with neighbor resolution.
pub fn forward_packet<N, T>(
    router: &Router<N, T>,
    ingress: &Interface,
    eth_frame: &EthernetFrame<&[u8]>,
) -> Result<()>
where
    N: Resolver,
    T: Transport,
{
    let mut eth_buffer = eth_frame.as_ref().to_vec();
    let mut fwd_frame = EthernetFrame::try_new(&mut eth_buffer[..])?;

    let dst_addr = {
        let mut ipv4_packet = Ipv4Packet::try_new(fwd_frame.payload_mut())?;

        let ttl = ipv4_packet.ttl();
        if ttl == 0 {
            debug!(
                "Ignoring IPv4 packet for {} with exhausted TTL.",
                ipv4_packet.dst_addr()
            );
            return Err(Error::Ignored);
        }

        ipv4_packet.set_ttl(ttl - 1);
        ipv4_packet.fill_checksum();
        ipv4_packet.dst_addr()
    };

    let route = router
        .routes
        .resolve(dst_addr)
        .ok_or(Error::NoRoute(dst_addr))?;
    let egress = router.interfaces.get(&route.interface)?;
    let next_hop = route.next_hop(dst_addr);

    match router.neighbors.lookup(next_hop) {
        Some(eth_addr) => {
            debug!(
                "Forwarding IPv4 packet for {} via {} ({}) on {}.",
                dst_addr, next_hop, eth_addr, egress.name
            );
            fwd_frame.set_dst_addr(eth_addr);
            fwd_frame.set_src_addr(egress.ethernet_addr);
            router.transport.transmit(fwd_frame.as_ref(), &egress.name);
        }
        None => {
            let pending =
                router
                    .neighbors
                    .enqueue(next_hop, fwd_frame.as_ref(), &egress.name, &ingress.name);
            debug!(
                "Queued IPv4 packet for {} until {} resolves ({} waiting).",
                dst_addr, next_hop, pending.queued
            );
        }
    }

    Ok(())
}
