use std::ops::Range;

use byteorder::{
    ByteOrder,
    NetworkEndian,
};

use crate::{
    Error,
    Result,
};

/// Calculates the Internet Checksum from [RFC1071](https://tools.ietf.org/html/rfc1071).
///
/// See [IPv4 header checksum](https://en.wikipedia.org/wiki/IPv4_header_checksum) for an example.
pub fn internet_checksum(buffer: &[u8]) -> u16 {
    let mut acc = 0 as u32;

    for word in buffer.chunks(2) {
        acc += match word.len() {
            2 => NetworkEndian::read_u16(word) as u32,
            // Odd trailing byte is padded with zero.
            _ => (word[0] as u32) << 8,
        };
    }

    while acc > 0xFFFF {
        acc = (acc & 0xFFFF) + (acc >> 16);
    }

    !acc as u16
}

/// Calculates the checksum of a buffer as if the checksum field were zero.
///
/// The buffer is left untouched; the field is zeroed in a working copy.
pub fn checksum_without_field(buffer: &[u8], field: Range<usize>) -> u16 {
    let mut scratch = buffer.to_vec();
    for byte in &mut scratch[field] {
        *byte = 0;
    }
    internet_checksum(&scratch)
}

/// Verifies that the checksum of buffer, with the checksum field zeroed,
/// matches the stored value.
pub fn verify_checksum(buffer: &[u8], field: Range<usize>, stored: u16) -> Result<()> {
    if field.end > buffer.len() {
        return Err(Error::Exhausted);
    }

    if checksum_without_field(buffer, field) == stored {
        Ok(())
    } else {
        Err(Error::Checksum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [u8; 20] = [
        0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 0xc0, 0xa8, 0x00,
        0x01, 0xc0, 0xa8, 0x00, 0xc7,
    ];

    #[test]
    fn test_internet_checksum() {
        assert_eq!(0xB861, internet_checksum(&HEADER));
    }

    #[test]
    fn test_internet_checksum_odd_length() {
        assert_eq!(!0x0100 as u16, internet_checksum(&[0x01]));
        assert_eq!(!0x0302 as u16, internet_checksum(&[0x01, 0x02, 0x02]));
    }

    #[test]
    fn test_checksum_ignores_stored_field() {
        let mut header = HEADER;
        header[10] = 0xB8;
        header[11] = 0x61;
        assert_eq!(0xB861, checksum_without_field(&header, 10 .. 12));
        // Working copy only.
        assert_eq!(header[10], 0xB8);
    }

    #[test]
    fn test_verify_checksum() {
        let mut header = HEADER;
        header[10] = 0xB8;
        header[11] = 0x61;
        assert_matches!(verify_checksum(&header, 10 .. 12, 0xB861), Ok(()));
        assert_matches!(
            verify_checksum(&header, 10 .. 12, 0xB862),
            Err(Error::Checksum)
        );

        header[0] = 0x46;
        assert_matches!(
            verify_checksum(&header, 10 .. 12, 0xB861),
            Err(Error::Checksum)
        );
    }

    #[test]
    fn test_verify_checksum_field_out_of_bounds() {
        assert_matches!(verify_checksum(&[0; 4], 4 .. 6, 0), Err(Error::Exhausted));
    }
}
