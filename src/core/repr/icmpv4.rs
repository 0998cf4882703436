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

/// ICMP message types handled by the router.
pub mod types {
    pub const ECHO_REPLY: u8 = 0;

    pub const ECHO_REQUEST: u8 = 8;
}

/// Safe representation of an ICMP echo header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repr {
    EchoReply { id: u16, seq: u16 },
    EchoRequest { id: u16, seq: u16 },
}

impl Repr {
    /// Tries to deserialize a packet into an ICMP representation.
    ///
    /// Messages other than echo request/reply are ignored.
    pub fn deserialize<T>(packet: &Packet<T>) -> Result<Repr>
    where
        T: AsRef<[u8]>,
    {
        let header = packet.header();
        let id = NetworkEndian::read_u16(&header[0 .. 2]);
        let seq = NetworkEndian::read_u16(&header[2 .. 4]);

        match (packet.type_of(), packet.code()) {
            (types::ECHO_REPLY, 0) => Ok(Repr::EchoReply { id, seq }),
            (types::ECHO_REQUEST, 0) => Ok(Repr::EchoRequest { id, seq }),
            _ => Err(Error::Ignored),
        }
    }

    /// Serializes the ICMP header into a packet and fills in the checksum over
    /// the header and whatever payload the packet already carries.
    pub fn serialize<T>(&self, packet: &mut Packet<T>)
    where
        T: AsRef<[u8]> + AsMut<[u8]>,
    {
        let (type_of, id, seq) = match *self {
            Repr::EchoReply { id, seq } => (types::ECHO_REPLY, id, seq),
            Repr::EchoRequest { id, seq } => (types::ECHO_REQUEST, id, seq),
        };

        packet.set_type(type_of);
        packet.set_code(0);

        let mut header = [0; 4];
        NetworkEndian::write_u16(&mut header[0 .. 2], id);
        NetworkEndian::write_u16(&mut header[2 .. 4], seq);
        packet.set_header(header);

        packet.fill_checksum();
    }
}

/// [https://en.wikipedia.org/wiki/Internet_Control_Message_Protocol](https://en.wikipedia.org/wiki/Internet_Control_Message_Protocol)
mod fields {
    use std::ops::{
        Range,
        RangeFrom,
    };

    pub const TYPE: usize = 0;

    pub const CODE: usize = 1;

    pub const CHECKSUM: Range<usize> = 2 .. 4;

    pub const HEADER: Range<usize> = 4 .. 8;

    pub const PAYLOAD: RangeFrom<usize> = 8 ..;
}

/// View of a byte buffer as an ICMP packet.
///
/// The buffer must span exactly the ICMP header and payload, i.e. the IP
/// payload, since the checksum covers all of it.
#[derive(Debug)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Packet<T> {
    pub const HEADER_LEN: usize = 8;

    /// Tries to create an ICMP packet view over a byte buffer.
    pub fn try_new(buffer: T) -> Result<Packet<T>> {
        if buffer.as_ref().len() < Self::HEADER_LEN {
            Err(Error::Exhausted)
        } else {
            Ok(Packet { buffer })
        }
    }

    /// Returns the length of an ICMP packet with the specified payload size.
    pub fn buffer_len(payload_len: usize) -> usize {
        Self::HEADER_LEN + payload_len
    }

    /// Verifies the checksum over the header and payload.
    pub fn check_encoding(&self) -> Result<()> {
        verify_checksum(self.buffer.as_ref(), fields::CHECKSUM, self.checksum())
    }

    /// Calculates the packet checksum.
    pub fn gen_packet_checksum(&self) -> u16 {
        checksum_without_field(self.buffer.as_ref(), fields::CHECKSUM)
    }

    pub fn type_of(&self) -> u8 {
        self.buffer.as_ref()[fields::TYPE]
    }

    pub fn code(&self) -> u8 {
        self.buffer.as_ref()[fields::CODE]
    }

    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[fields::CHECKSUM])
    }

    pub fn header(&self) -> [u8; 4] {
        let mut header: [u8; 4] = [0; 4];
        header.copy_from_slice(&self.buffer.as_ref()[fields::HEADER]);
        header
    }

    pub fn payload(&self) -> &[u8] {
        &self.buffer.as_ref()[fields::PAYLOAD]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    pub fn set_type(&mut self, type_of: u8) {
        self.buffer.as_mut()[fields::TYPE] = type_of
    }

    pub fn set_code(&mut self, code: u8) {
        self.buffer.as_mut()[fields::CODE] = code;
    }

    pub fn set_checksum(&mut self, checksum: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[fields::CHECKSUM], checksum);
    }

    pub fn set_header(&mut self, header: [u8; 4]) {
        self.buffer.as_mut()[fields::HEADER].copy_from_slice(&header);
    }

    /// Recomputes and writes the packet checksum.
    pub fn fill_checksum(&mut self) {
        let checksum = self.gen_packet_checksum();
        self.set_checksum(checksum);
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_mut()[fields::PAYLOAD]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_buffer_too_small() {
        let buffer: [u8; 7] = [0; 7];
        assert_matches!(Packet::try_new(&buffer[..]), Err(Error::Exhausted));
    }

    #[test]
    fn test_packet_with_empty_payload() {
        let buffer: [u8; 8] = [0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00];
        let packet = Packet::try_new(&buffer[..]).unwrap();
        assert_eq!(packet.payload().len(), 0);
        assert_matches!(packet.check_encoding(), Ok(()));
    }

    #[test]
    fn test_packet_with_invalid_checksum() {
        let buffer: [u8; 9] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        let packet = Packet::try_new(&buffer[..]).unwrap();
        assert_matches!(packet.check_encoding(), Err(Error::Checksum));
    }

    #[test]
    fn test_packet_getters() {
        let buffer: [u8; 9] = [0x01, 0x02, 0xE9, 0xEF, 0x05, 0x06, 0x07, 0x08, 0x09];
        let packet = Packet::try_new(&buffer[..]).unwrap();
        assert_matches!(packet.check_encoding(), Ok(()));
        assert_eq!(packet.type_of(), 1);
        assert_eq!(packet.code(), 2);
        assert_eq!(packet.checksum(), 0xE9EF);
        assert_eq!(packet.header(), [0x05, 0x06, 0x07, 0x08]);
        assert_eq!(packet.payload(), [0x09]);
    }

    #[test]
    fn test_echo_round_trip() {
        let mut buffer: [u8; 12] = [0; 12];
        buffer[8 ..].copy_from_slice(b"ping");

        {
            let mut packet = Packet::try_new(&mut buffer[..]).unwrap();
            Repr::EchoRequest { id: 42, seq: 7 }.serialize(&mut packet);
        }

        let packet = Packet::try_new(&buffer[..]).unwrap();
        assert_matches!(packet.check_encoding(), Ok(()));
        assert_eq!(
            Repr::deserialize(&packet).unwrap(),
            Repr::EchoRequest { id: 42, seq: 7 }
        );
        assert_eq!(packet.payload(), b"ping");
    }

    #[test]
    fn test_deserialize_other_type() {
        let buffer: [u8; 8] = [0x03, 0x03, 0, 0, 0, 0, 0, 0];
        let packet = Packet::try_new(&buffer[..]).unwrap();
        assert_matches!(Repr::deserialize(&packet), Err(Error::Ignored));
    }
}
