use crate::core::dev::Transport;
use crate::core::interface::Interface;
use crate::core::neighbor::Resolver;
use crate::core::repr::{
    eth_types,
    EthernetAddress,
    EthernetFrame,
};
use crate::core::service::{
    arp,
    ipv4,
    Router,
};
use crate::{
    Error,
    Result,
};

/// Builds and sends an Ethernet frame via an interface.
///
/// The source address is set to that of the interface, f fills in the payload.
pub fn send_frame<N, T, F>(
    router: &Router<N, T>,
    interface: &Interface,
    dst_addr: EthernetAddress,
    payload_type: u16,
    payload_len: usize,
    f: F,
) -> Result<()>
where
    N: Resolver,
    T: Transport,
    F: FnOnce(&mut [u8]) -> Result<()>,
{
    let mut eth_buffer = vec![0; EthernetFrame::<&[u8]>::buffer_len(payload_len)];

    {
        let mut eth_frame = EthernetFrame::try_new(&mut eth_buffer[..])?;
        eth_frame.set_dst_addr(dst_addr);
        eth_frame.set_src_addr(interface.ethernet_addr);
        eth_frame.set_payload_type(payload_type);
        f(eth_frame.payload_mut())?;
    }

    router.transport.transmit(&eth_buffer, &interface.name);
    Ok(())
}

/// Receives an Ethernet frame from an interface.
///
/// The frame is classified by Ethertype and handed to the ARP or IPv4 layer.
pub fn recv_frame<N, T>(router: &Router<N, T>, eth_buffer: &[u8], interface: &str) -> Result<()>
where
    N: Resolver,
    T: Transport,
{
    let eth_frame = EthernetFrame::try_new(eth_buffer)?;
    let interface = router.interfaces.get(interface)?;

    match eth_frame.payload_type() {
        eth_types::ARP => arp::recv_packet(router, interface, &eth_frame),
        eth_types::IPV4 => ipv4::recv_packet(router, interface, &eth_frame),
        i => {
            debug!("Ignoring ethernet frame with type {:#06X}.", i);
            Err(Error::Ignored)
        }
    }
}
