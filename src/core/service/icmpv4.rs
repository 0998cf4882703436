use crate::core::dev::Transport;
use crate::core::interface::Interface;
use crate::core::neighbor::Resolver;
use crate::core::repr::{
    eth_types,
    EthernetFrame,
    Icmpv4Packet,
    Icmpv4Repr,
    Ipv4Packet,
};
use crate::core::service::{
    ethernet,
    Router,
};
use crate::{
    Error,
    Result,
};

/// Receives an ICMP packet addressed to the router.
///
/// Echo requests are answered on the receiving interface, other messages are
/// dropped.
pub fn recv_packet<N, T>(
    router: &Router<N, T>,
    interface: &Interface,
    eth_frame: &EthernetFrame<&[u8]>,
    ipv4_packet: &Ipv4Packet<&[u8]>,
) -> Result<()>
where
    N: Resolver,
    T: Transport,
{
    let icmp_packet = Icmpv4Packet::try_new(ipv4_packet.payload())?;
    icmp_packet.check_encoding()?;

    let (id, seq) = match Icmpv4Repr::deserialize(&icmp_packet) {
        Ok(Icmpv4Repr::EchoRequest { id, seq }) => (id, seq),
        _ => {
            debug!(
                "Ignoring ICMP message with type {} and code {}.",
                icmp_packet.type_of(),
                icmp_packet.code()
            );
            return Err(Error::Ignored);
        }
    };

    let (src_addr, dst_addr) = (ipv4_packet.src_addr(), ipv4_packet.dst_addr());
    let ipv4_packet_len = ipv4_packet.packet_len() as usize;

    debug!("Got a ping from {}; Sending response...", src_addr);

    ethernet::send_frame(
        router,
        interface,
        eth_frame.src_addr(),
        eth_types::IPV4,
        ipv4_packet_len,
        |payload| {
            payload.copy_from_slice(&ipv4_packet.as_ref()[.. ipv4_packet_len]);

            let mut reply_packet = Ipv4Packet::try_new(payload)?;
            reply_packet.set_src_addr(dst_addr);
            reply_packet.set_dst_addr(src_addr);
            reply_packet.fill_checksum();

            let mut icmp_reply = Icmpv4Packet::try_new(reply_packet.payload_mut())?;
            Icmpv4Repr::EchoReply { id, seq }.serialize(&mut icmp_reply);
            Ok(())
        },
    )
}
