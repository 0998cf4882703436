pub const IFF_TAP: libc::c_short = 0x0002;

pub const IFF_NO_PI: libc::c_short = 0x1000;

pub const TUNSETIFF: libc::c_ulong = 0x400454CA;

#[allow(non_camel_case_types)]
#[repr(C)]
#[derive(Clone, Copy, Debug)]
/// [https://linux.die.net/man/7/netdevice](https://linux.die.net/man/7/netdevice)
pub struct c_ifreq {
    pub ifr_name: [libc::c_char; libc::IF_NAMESIZE],
    pub ifr_flags: libc::c_short,
    // Pads the union in struct ifreq to its full size.
    _pad: [u8; 22],
}

impl c_ifreq {
    /// Returns None if the name does not fit, leaving room for the NUL.
    pub fn with_name(ifr_name: &str) -> Option<c_ifreq> {
        if ifr_name.len() >= libc::IF_NAMESIZE {
            return None;
        }

        let mut ifreq = c_ifreq {
            ifr_name: [0; libc::IF_NAMESIZE],
            ifr_flags: 0,
            _pad: [0; 22],
        };

        for (i, c) in ifr_name.as_bytes().iter().enumerate() {
            ifreq.ifr_name[i] = *c as libc::c_char;
        }

        Some(ifreq)
    }
}
