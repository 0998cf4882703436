//! Serialization and deserialization of network packets.
//!
//! The `repr` module provides views and representations for the Ethernet,
//! ARP, IPv4 and ICMP headers the router parses and builds. Byte order
//! conversions happen here and nowhere else.

pub mod arp;
pub mod ethernet;
pub mod icmpv4;
pub mod ipv4;

pub use self::arp::{
    hw_types as arp_hw_types,
    proto_types as arp_proto_types,
    Arp,
    Op as ArpOp,
};
pub use self::ethernet::{
    eth_types,
    Address as EthernetAddress,
    Frame as EthernetFrame,
};
pub use self::icmpv4::{
    types as icmpv4_types,
    Packet as Icmpv4Packet,
    Repr as Icmpv4Repr,
};
pub use self::ipv4::{
    protocols as ipv4_protocols,
    Address as Ipv4Address,
    Packet as Ipv4Packet,
};
