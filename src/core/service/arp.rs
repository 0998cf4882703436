use crate::core::arp_cache::ArpRequest;
use crate::core::dev::Transport;
use crate::core::interface::Interface;
use crate::core::neighbor::{
    Resolved,
    Resolver,
};
use crate::core::repr::{
    eth_types,
    Arp,
    ArpOp,
    EthernetAddress,
    EthernetFrame,
};
use crate::core::service::{
    ethernet,
    Router,
};
use crate::{
    Error,
    Result,
};

/// Sends an ARP packet via an interface.
pub fn send_packet<N, T>(
    router: &Router<N, T>,
    interface: &Interface,
    arp_repr: &Arp,
    dst_addr: EthernetAddress,
) -> Result<()>
where
    N: Resolver,
    T: Transport,
{
    ethernet::send_frame(
        router,
        interface,
        dst_addr,
        eth_types::ARP,
        arp_repr.buffer_len(),
        |payload| arp_repr.serialize(payload),
    )
}

/// Broadcasts an ARP request for an unresolved address.
pub fn send_request<N, T>(router: &Router<N, T>, request: &ArpRequest) -> Result<()>
where
    N: Resolver,
    T: Transport,
{
    let interface = router.interfaces.get(&request.interface)?;

    let arp_repr = Arp {
        op: ArpOp::Request,
        source_hw_addr: interface.ethernet_addr,
        source_proto_addr: interface.ipv4_addr,
        target_hw_addr: EthernetAddress::new([0; 6]),
        target_proto_addr: request.target,
    };

    debug!(
        "Sending ARP request for {} on {}.",
        request.target, interface.name
    );
    send_packet(router, interface, &arp_repr, EthernetAddress::BROADCAST)
}

/// Receives an ARP packet from an interface.
///
/// Requests for the interface's address are answered. Replies are handed to
/// neighbor resolution and flush any packets waiting on the sender.
pub fn recv_packet<N, T>(
    router: &Router<N, T>,
    interface: &Interface,
    eth_frame: &EthernetFrame<&[u8]>,
) -> Result<()>
where
    N: Resolver,
    T: Transport,
{
    let arp_repr = Arp::deserialize(eth_frame.payload())?;

    match arp_repr.op {
        ArpOp::Request => {
            if arp_repr.target_proto_addr != interface.ipv4_addr {
                debug!(
                    "Ignoring ARP request for {} on {}.",
                    arp_repr.target_proto_addr, interface.name
                );
                return Err(Error::Ignored);
            }

            let arp_reply = Arp {
                op: ArpOp::Reply,
                source_hw_addr: interface.ethernet_addr,
                source_proto_addr: interface.ipv4_addr,
                target_hw_addr: arp_repr.source_hw_addr,
                target_proto_addr: arp_repr.source_proto_addr,
            };

            debug!(
                "Sending ARP reply to {}/{}.",
                arp_reply.target_proto_addr, arp_reply.target_hw_addr
            );

            send_packet(router, interface, &arp_reply, eth_frame.src_addr())
        }
        ArpOp::Reply => {
            debug!(
                "Received ARP reply, {} is at {}.",
                arp_repr.source_proto_addr, arp_repr.source_hw_addr
            );

            if let Some(resolved) = router
                .neighbors
                .observe_reply(arp_repr.source_hw_addr, arp_repr.source_proto_addr)
            {
                flush(router, resolved);
            }

            Ok(())
        }
    }
}

/// Sends the packets that were waiting on a resolved address, in the order
/// they were queued.
fn flush<N, T>(router: &Router<N, T>, resolved: Resolved)
where
    N: Resolver,
    T: Transport,
{
    debug!(
        "Flushing {} packet(s) queued for {}.",
        resolved.packets.len(),
        resolved.next_hop
    );

    for mut packet in resolved.packets {
        let egress = match router.interfaces.get(&packet.egress) {
            Ok(egress) => egress,
            Err(err) => {
                warn!("Dropping queued packet for {} with {:?}.", resolved.next_hop, err);
                continue;
            }
        };

        match EthernetFrame::try_new(&mut packet.frame[..]) {
            Ok(mut eth_frame) => {
                eth_frame.set_dst_addr(resolved.eth_addr);
                eth_frame.set_src_addr(egress.ethernet_addr);
            }
            Err(err) => {
                warn!("Dropping queued packet for {} with {:?}.", resolved.next_hop, err);
                continue;
            }
        }

        router.transport.transmit(&packet.frame, &egress.name);
    }
}
