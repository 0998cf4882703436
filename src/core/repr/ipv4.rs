use std::fmt::{
    Display,
    Formatter,
    Result as FmtResult,
};
use std::result::Result as StdResult;
use std::str::FromStr;

use byteorder::{
    ByteOrder,
    NetworkEndian,
};

use crate::core::check::{
    checksum_without_field,
    verify_checksum,
};
use crate::{
    Error,
    Result,
};

/// [IPv4 address](https://en.wikipedia.org/wiki/IPv4) in network byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address([u8; 4]);

impl Address {
    pub const UNSPECIFIED: Address = Address([0; 4]);

    /// Creates an IPv4 address from a network byte order buffer.
    pub fn new(addr: [u8; 4]) -> Address {
        Address(addr)
    }

    /// Tries to create an IPv4 address from a network byte order slice.
    pub fn try_new(addr: &[u8]) -> Result<Address> {
        if addr.len() != 4 {
            return Err(Error::Exhausted);
        }

        let mut _addr: [u8; 4] = [0; 4];
        _addr.copy_from_slice(addr);
        Ok(Address(_addr))
    }

    /// Returns a reference to the network byte order representation of the
    /// address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the address as a host order integer.
    pub fn as_u32(&self) -> u32 {
        NetworkEndian::read_u32(&self.0)
    }

    /// Creates an address from a host order integer.
    pub fn from_u32(addr: u32) -> Address {
        let mut bytes = [0; 4];
        NetworkEndian::write_u32(&mut bytes, addr);
        Address(bytes)
    }

    /// Applies a subnet mask to the address.
    pub fn mask(&self, mask: Address) -> Address {
        Address::from_u32(self.as_u32() & mask.as_u32())
    }

    /// Returns the number of set bits, i.e. the prefix length if the address
    /// is a subnet mask.
    pub fn prefix_len(&self) -> u32 {
        self.as_u32().count_ones()
    }

    pub fn is_unspecified(&self) -> bool {
        self.0 == [0; 4]
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}.{}.{}.{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl FromStr for Address {
    type Err = ();

    /// Parses an IPv4 address from an A.B.C.D style string.
    fn from_str(addr: &str) -> StdResult<Address, Self::Err> {
        let bytes = addr
            .split('.')
            .map(|token| token.parse::<u8>())
            .collect::<StdResult<Vec<_>, _>>()
            .map_err(|_| ())?;

        if bytes.len() != 4 {
            return Err(());
        }

        let mut ipv4: [u8; 4] = [0; 4];
        ipv4.copy_from_slice(&bytes);

        Ok(Address::new(ipv4))
    }
}

/// [https://en.wikipedia.org/wiki/List_of_IP_protocol_numbers](https://en.wikipedia.org/wiki/List_of_IP_protocol_numbers)
pub mod protocols {
    pub const ICMP: u8 = 1;

    pub const TCP: u8 = 6;

    pub const UDP: u8 = 17;
}

/// [https://en.wikipedia.org/wiki/IPv4#Header](https://en.wikipedia.org/wiki/IPv4#Header)
mod fields {
    use std::ops::{
        Range,
        RangeFrom,
    };

    pub const VERSION_AND_IHL: usize = 0;

    pub const TOTAL_LEN: Range<usize> = 2 .. 4;

    pub const TTL: usize = 8;

    pub const PROTOCOL: usize = 9;

    pub const CHECKSUM: Range<usize> = 10 .. 12;

    pub const SRC_ADDR: Range<usize> = 12 .. 16;

    pub const DST_ADDR: Range<usize> = 16 .. 20;

    pub const PAYLOAD: RangeFrom<usize> = 20 ..;
}

/// View of a byte buffer as an IPv4 packet without options.
#[derive(Debug)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for Packet<T> {
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}

impl<T: AsRef<[u8]>> Packet<T> {
    pub const HEADER_LEN: usize = 20;

    /// Tries to create an IPv4 packet view over a byte buffer.
    ///
    /// Fails without reading any field if the buffer can not hold a header.
    pub fn try_new(buffer: T) -> Result<Packet<T>> {
        if buffer.as_ref().len() < Self::HEADER_LEN {
            Err(Error::Exhausted)
        } else {
            Ok(Packet { buffer })
        }
    }

    /// Checks the fixed header fields this router relies on: IPv4, no options
    /// and a total length that fits in the buffer.
    pub fn check_len(&self) -> Result<()> {
        if self.ip_version() != 4 || self.header_len() as usize != Self::HEADER_LEN {
            return Err(Error::Malformed);
        }

        let packet_len = self.packet_len() as usize;
        if packet_len < Self::HEADER_LEN {
            Err(Error::Malformed)
        } else if packet_len > self.buffer.as_ref().len() {
            Err(Error::Exhausted)
        } else {
            Ok(())
        }
    }

    /// Verifies the header checksum over the 20 byte header.
    pub fn check_encoding(&self) -> Result<()> {
        verify_checksum(
            &self.buffer.as_ref()[.. Self::HEADER_LEN],
            fields::CHECKSUM,
            self.header_checksum(),
        )
    }

    /// Calculates the header checksum.
    pub fn gen_header_checksum(&self) -> u16 {
        checksum_without_field(&self.buffer.as_ref()[.. Self::HEADER_LEN], fields::CHECKSUM)
    }

    pub fn ip_version(&self) -> u8 {
        self.buffer.as_ref()[fields::VERSION_AND_IHL] >> 4
    }

    /// Returns the header length in bytes.
    pub fn header_len(&self) -> u8 {
        (self.buffer.as_ref()[fields::VERSION_AND_IHL] & 0x0F) * 4
    }

    pub fn packet_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::TOTAL_LEN])
    }

    pub fn ttl(&self) -> u8 {
        self.buffer.as_ref()[fields::TTL]
    }

    pub fn protocol(&self) -> u8 {
        self.buffer.as_ref()[fields::PROTOCOL]
    }

    pub fn header_checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::CHECKSUM])
    }

    pub fn src_addr(&self) -> Address {
        let mut addr = [0; 4];
        addr.copy_from_slice(&self.buffer.as_ref()[fields::SRC_ADDR]);
        Address(addr)
    }

    pub fn dst_addr(&self) -> Address {
        let mut addr = [0; 4];
        addr.copy_from_slice(&self.buffer.as_ref()[fields::DST_ADDR]);
        Address(addr)
    }

    /// Returns the payload as delimited by the total length field, or
    /// everything after the header if the total length is inconsistent.
    pub fn payload(&self) -> &[u8] {
        let buffer = self.buffer.as_ref();
        let packet_len = self.packet_len() as usize;
        if packet_len >= Self::HEADER_LEN && packet_len <= buffer.len() {
            &buffer[Self::HEADER_LEN .. packet_len]
        } else {
            &buffer[fields::PAYLOAD]
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    pub fn set_ttl(&mut self, ttl: u8) {
        self.buffer.as_mut()[fields::TTL] = ttl;
    }

    pub fn set_header_checksum(&mut self, checksum: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[fields::CHECKSUM], checksum);
    }

    pub fn set_src_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::SRC_ADDR].copy_from_slice(addr.as_bytes());
    }

    pub fn set_dst_addr(&mut self, addr: Address) {
        self.buffer.as_mut()[fields::DST_ADDR].copy_from_slice(addr.as_bytes());
    }

    /// Recomputes and writes the header checksum.
    pub fn fill_checksum(&mut self) {
        let checksum = self.gen_header_checksum();
        self.set_header_checksum(checksum);
    }

    /// Returns a mutable view of the payload as delimited by the total length.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let packet_len = self.packet_len() as usize;
        let buffer = self.buffer.as_mut();
        if packet_len >= Self::HEADER_LEN && packet_len <= buffer.len() {
            &mut buffer[Self::HEADER_LEN .. packet_len]
        } else {
            &mut buffer[fields::PAYLOAD]
        }
    }
}
