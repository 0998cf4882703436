#[macro_use]
extern crate assert_matches;
#[macro_use]
extern crate lazy_static;
extern crate srouter;

mod context;

use context::*;
use srouter::core::repr::{
    eth_types,
    ipv4_protocols,
    EthernetFrame,
    Icmpv4Packet,
    Icmpv4Repr,
    Ipv4Address,
    Ipv4Packet,
};
use srouter::Error;

/// Checks a transmitted frame is an echo reply from src_addr to HOST and
/// returns its ICMP data.
fn check_echo_reply(frame: &[u8], src_addr: Ipv4Address, id: u16, seq: u16) -> Vec<u8> {
    let eth_frame = EthernetFrame::try_new(frame).unwrap();
    assert_eq!(eth_frame.dst_addr(), *HOST_MAC);
    assert_eq!(eth_frame.src_addr(), *ETH0_MAC);
    assert_eq!(eth_frame.payload_type(), eth_types::IPV4);

    let ipv4_packet = Ipv4Packet::try_new(eth_frame.payload()).unwrap();
    assert_matches!(ipv4_packet.check_len(), Ok(()));
    assert_matches!(ipv4_packet.check_encoding(), Ok(()));
    assert_eq!(ipv4_packet.src_addr(), src_addr);
    assert_eq!(ipv4_packet.dst_addr(), *HOST_IPV4);
    assert_eq!(ipv4_packet.protocol(), ipv4_protocols::ICMP);
    assert_eq!(ipv4_packet.ttl(), 64);

    let icmp_packet = Icmpv4Packet::try_new(ipv4_packet.payload()).unwrap();
    assert_matches!(icmp_packet.check_encoding(), Ok(()));
    assert_eq!(icmp_packet.code(), 0);
    assert_matches!(
        Icmpv4Repr::deserialize(&icmp_packet),
        Ok(Icmpv4Repr::EchoReply { id: i, seq: s }) => {
            assert_eq!(i, id);
            assert_eq!(s, seq);
        }
    );

    icmp_packet.payload().to_vec()
}

#[test]
fn ping_router() {
    let context = context();

    let frame = ping_frame(*ETH0_IPV4, 0x1234, 7, b"abcdefgh");
    assert_matches!(context.router.handle_frame(&frame, "eth0"), Ok(()));

    let sent = context.router.transport.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].interface, "eth0");
    assert_eq!(sent[0].frame.len(), frame.len());
    assert_eq!(
        check_echo_reply(&sent[0].frame, *ETH0_IPV4, 0x1234, 7),
        b"abcdefgh"
    );
}

#[test]
fn ping_other_interface_answered_on_ingress() {
    let context = context();

    let frame = ping_frame(*ETH1_IPV4, 1, 1, b"xyz");
    assert_matches!(context.router.handle_frame(&frame, "eth0"), Ok(()));

    let sent = context.router.transport.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].interface, "eth0");
    assert_eq!(check_echo_reply(&sent[0].frame, *ETH1_IPV4, 1, 1), b"xyz");
}

#[test]
fn ping_with_padding_is_trimmed() {
    let context = context();

    let mut frame = ping_frame(*ETH0_IPV4, 9, 3, b"ab");
    let unpadded_len = frame.len();
    frame.extend_from_slice(&[0; 16]);

    assert_matches!(context.router.handle_frame(&frame, "eth0"), Ok(()));

    let sent = context.router.transport.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].frame.len(), unpadded_len);
    assert_eq!(check_echo_reply(&sent[0].frame, *ETH0_IPV4, 9, 3), b"ab");
}

#[test]
fn ping_with_bad_icmp_checksum_is_dropped() {
    let context = context();

    let mut frame = ping_frame(*ETH0_IPV4, 1, 1, b"abcd");
    let last = frame.len() - 1;
    frame[last] ^= 0xFF;

    assert_matches!(
        context.router.handle_frame(&frame, "eth0"),
        Err(Error::Checksum)
    );
    assert!(context.router.transport.take().is_empty());
}

#[test]
fn icmp_other_than_echo_request_is_ignored() {
    let context = context();

    let mut icmp = echo_request(1, 1, b"abcd");
    {
        let mut packet = Icmpv4Packet::try_new(&mut icmp[..]).unwrap();
        Icmpv4Repr::EchoReply { id: 1, seq: 1 }.serialize(&mut packet);
    }
    let frame = ipv4_frame(
        *ETH0_MAC,
        *HOST_MAC,
        *HOST_IPV4,
        *ETH0_IPV4,
        64,
        ipv4_protocols::ICMP,
        &icmp,
    );

    assert_matches!(
        context.router.handle_frame(&frame, "eth0"),
        Err(Error::Ignored)
    );
    assert!(context.router.transport.take().is_empty());
}

#[test]
fn udp_to_router_is_ignored() {
    let context = context();

    let frame = transit_frame(*ETH0_IPV4, 64, b"not for forwarding");
    assert_matches!(
        context.router.handle_frame(&frame, "eth0"),
        Err(Error::Ignored)
    );
    assert!(context.router.transport.take().is_empty());
    assert_eq!(context.router.neighbors.pending(*ETH0_IPV4), 0);
}
