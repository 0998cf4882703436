//! Shared fixtures: a two interface router with a mock transport and clock,
//! plus builders for the frames the tests feed it.

#![allow(dead_code)]

use srouter::core::arp_cache::{
    ArpCache,
    SharedArpCache,
};
use srouter::core::dev::MockTransport;
use srouter::core::interface::Interfaces;
use srouter::core::repr::{
    eth_types,
    ipv4_protocols,
    Arp,
    ArpOp,
    EthernetAddress,
    EthernetFrame,
    Icmpv4Packet,
    Icmpv4Repr,
    Ipv4Address,
    Ipv4Packet,
};
use srouter::core::route::RoutingTable;
use srouter::core::service::Router;
use srouter::core::time::MockEnv;

lazy_static! {
    pub static ref ETH0_IPV4: Ipv4Address = Ipv4Address::new([10, 0, 0, 1]);

    pub static ref ETH0_MAC: EthernetAddress = EthernetAddress::new([0x02, 0, 0, 0, 0, 0x01]);

    pub static ref ETH1_IPV4: Ipv4Address = Ipv4Address::new([192, 168, 1, 1]);

    pub static ref ETH1_MAC: EthernetAddress = EthernetAddress::new([0x02, 0, 0, 0, 0, 0x02]);

    /// A host on the eth0 subnet.
    pub static ref HOST_IPV4: Ipv4Address = Ipv4Address::new([10, 0, 0, 5]);

    pub static ref HOST_MAC: EthernetAddress = EthernetAddress::new([0x02, 0, 0, 0, 0, 0x05]);

    /// A host behind eth1 the router has no ARP entry for.
    pub static ref REMOTE_IPV4: Ipv4Address = Ipv4Address::new([203, 0, 113, 9]);

    pub static ref REMOTE_MAC: EthernetAddress = EthernetAddress::new([0x02, 0, 0, 0, 0, 0x09]);

    /// Gateway for 172.16.0.0/16, reachable via eth1.
    pub static ref GATEWAY_IPV4: Ipv4Address = Ipv4Address::new([192, 168, 1, 254]);
}

pub const INTERFACES: &str = "\
    eth0 10.0.0.1 02:00:00:00:00:01\n\
    eth1 192.168.1.1 02:00:00:00:00:02\n";

pub const ROUTES: &str = "\
    10.0.0.0 0.0.0.0 255.255.255.0 eth0\n\
    192.168.1.0 0.0.0.0 255.255.255.0 eth1\n\
    203.0.113.0 0.0.0.0 255.255.255.0 eth1\n\
    172.16.0.0 192.168.1.254 255.255.0.0 eth1\n";

pub type TestRouter = Router<SharedArpCache<MockEnv>, MockTransport>;

pub struct Context {
    pub router: TestRouter,
    pub env: MockEnv,
}

pub fn context() -> Context {
    let env = MockEnv::new();
    let router = Router::new(
        INTERFACES.parse::<Interfaces>().unwrap(),
        ROUTES.parse::<RoutingTable>().unwrap(),
        SharedArpCache::new(ArpCache::new(15, env.clone())),
        MockTransport::new(),
    );

    Context { router, env }
}

/// Builds an Ethernet frame around an ARP message.
pub fn arp_frame(eth_dst: EthernetAddress, arp: &Arp) -> Vec<u8> {
    let mut buffer = vec![0; EthernetFrame::<&[u8]>::buffer_len(arp.buffer_len())];
    {
        let mut frame = EthernetFrame::try_new(&mut buffer[..]).unwrap();
        frame.set_dst_addr(eth_dst);
        frame.set_src_addr(arp.source_hw_addr);
        frame.set_payload_type(eth_types::ARP);
        arp.serialize(frame.payload_mut()).unwrap();
    }
    buffer
}

pub fn arp_request(
    source_hw_addr: EthernetAddress,
    source_proto_addr: Ipv4Address,
    target_proto_addr: Ipv4Address,
) -> Vec<u8> {
    arp_frame(
        EthernetAddress::BROADCAST,
        &Arp {
            op: ArpOp::Request,
            source_hw_addr,
            source_proto_addr,
            target_hw_addr: EthernetAddress::new([0; 6]),
            target_proto_addr,
        },
    )
}

pub fn arp_reply(
    source_hw_addr: EthernetAddress,
    source_proto_addr: Ipv4Address,
    target_hw_addr: EthernetAddress,
    target_proto_addr: Ipv4Address,
) -> Vec<u8> {
    arp_frame(
        target_hw_addr,
        &Arp {
            op: ArpOp::Reply,
            source_hw_addr,
            source_proto_addr,
            target_hw_addr,
            target_proto_addr,
        },
    )
}

/// Builds an Ethernet frame carrying an IPv4 packet with a valid checksum.
pub fn ipv4_frame(
    eth_dst: EthernetAddress,
    eth_src: EthernetAddress,
    src_addr: Ipv4Address,
    dst_addr: Ipv4Address,
    ttl: u8,
    protocol: u8,
    payload: &[u8],
) -> Vec<u8> {
    let packet_len = Ipv4Packet::<&[u8]>::HEADER_LEN + payload.len();
    let mut buffer = vec![0; EthernetFrame::<&[u8]>::buffer_len(packet_len)];
    {
        let mut frame = EthernetFrame::try_new(&mut buffer[..]).unwrap();
        frame.set_dst_addr(eth_dst);
        frame.set_src_addr(eth_src);
        frame.set_payload_type(eth_types::IPV4);

        let ipv4_buffer = frame.payload_mut();
        ipv4_buffer[0] = 0x45;
        ipv4_buffer[2] = (packet_len >> 8) as u8;
        ipv4_buffer[3] = packet_len as u8;
        ipv4_buffer[4] = 0x1C;
        ipv4_buffer[5] = 0x46;
        ipv4_buffer[6] = 0x40;
        ipv4_buffer[9] = protocol;
        ipv4_buffer[20 ..].copy_from_slice(payload);

        let mut packet = Ipv4Packet::try_new(ipv4_buffer).unwrap();
        packet.set_ttl(ttl);
        packet.set_src_addr(src_addr);
        packet.set_dst_addr(dst_addr);
        packet.fill_checksum();
    }
    buffer
}

/// Builds an ICMP echo request with a valid checksum.
pub fn echo_request(id: u16, seq: u16, data: &[u8]) -> Vec<u8> {
    let mut buffer = vec![0; Icmpv4Packet::<&[u8]>::buffer_len(data.len())];
    {
        let mut packet = Icmpv4Packet::try_new(&mut buffer[..]).unwrap();
        packet.payload_mut().copy_from_slice(data);
        Icmpv4Repr::EchoRequest { id, seq }.serialize(&mut packet);
    }
    buffer
}

/// A ping from HOST to dst_addr as received on eth0.
pub fn ping_frame(dst_addr: Ipv4Address, id: u16, seq: u16, data: &[u8]) -> Vec<u8> {
    ipv4_frame(
        *ETH0_MAC,
        *HOST_MAC,
        *HOST_IPV4,
        dst_addr,
        64,
        ipv4_protocols::ICMP,
        &echo_request(id, seq, data),
    )
}

/// A UDP packet from HOST to dst_addr as received on eth0. Only the IP layer
/// matters to the router.
pub fn transit_frame(dst_addr: Ipv4Address, ttl: u8, data: &[u8]) -> Vec<u8> {
    ipv4_frame(
        *ETH0_MAC,
        *HOST_MAC,
        *HOST_IPV4,
        dst_addr,
        ttl,
        ipv4_protocols::UDP,
        data,
    )
}
