use std::io::{
    Error as IoError,
    ErrorKind,
};

use crate::core::dev::Transport;
use crate::core::interface::Interfaces;
use crate::linux::libc as _libc;
use crate::{
    Error,
    Result,
};

/// [TAP interface](https://www.kernel.org/doc/Documentation/networking/tuntap.txt)
/// for sending and receiving raw ethernet frames.
#[derive(Debug)]
pub struct Tap {
    name: String,
    tapfd: libc::c_int,
}

impl Tap {
    /// Largest frame read from or written to a TAP.
    pub const MAX_FRAME_LEN: usize = 1518;

    /// Creates or binds to an existing, non-blocking TAP interface.
    pub fn new(ifr_name: &str) -> Result<Tap> {
        let mut ifreq = _libc::c_ifreq::with_name(ifr_name)
            .ok_or_else(|| Error::Config(format!("TAP name {} is too long", ifr_name)))?;
        ifreq.ifr_flags = _libc::IFF_TAP | _libc::IFF_NO_PI;

        unsafe {
            let tapfd = libc::open(
                "/dev/net/tun\0".as_ptr() as *const libc::c_char,
                libc::O_RDWR | libc::O_NONBLOCK,
            );

            if tapfd < 0 {
                return Err(Error::IO(IoError::last_os_error()));
            }

            if libc::ioctl(tapfd, _libc::TUNSETIFF as _, &mut ifreq as *mut _libc::c_ifreq) == -1 {
                let err = IoError::last_os_error();
                libc::close(tapfd);
                return Err(Error::IO(err));
            }

            Ok(Tap {
                name: ifr_name.to_string(),
                tapfd,
            })
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes a frame to the TAP.
    pub fn send(&self, buffer: &[u8]) -> Result<()> {
        let wrote = unsafe {
            libc::write(
                self.tapfd,
                buffer.as_ptr() as *const libc::c_void,
                buffer.len(),
            )
        };

        if wrote < 0 {
            Err(Error::IO(IoError::last_os_error()))
        } else {
            Ok(())
        }
    }

    /// Reads a frame from the TAP, returning its size. Fails with
    /// Error::Exhausted when no frame is waiting.
    pub fn recv(&self, buffer: &mut [u8]) -> Result<usize> {
        let read = unsafe {
            libc::read(
                self.tapfd,
                buffer.as_mut_ptr() as *mut libc::c_void,
                buffer.len(),
            )
        };

        if read < 0 {
            let err = IoError::last_os_error();
            if err.kind() == ErrorKind::WouldBlock {
                Err(Error::Exhausted)
            } else {
                Err(Error::IO(err))
            }
        } else {
            Ok(read as usize)
        }
    }
}

impl Drop for Tap {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.tapfd);
        }
    }
}

/// One TAP per router interface, named after the interface.
#[derive(Debug)]
pub struct Taps {
    taps: Vec<Tap>,
}

impl Taps {
    /// Opens a TAP for every interface in the table.
    pub fn open(interfaces: &Interfaces) -> Result<Taps> {
        let taps = interfaces
            .iter()
            .map(|interface| Tap::new(&interface.name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Taps { taps })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tap> {
        self.taps.iter()
    }
}

impl Transport for Taps {
    fn transmit(&self, frame: &[u8], interface: &str) {
        match self.taps.iter().find(|tap| tap.name() == interface) {
            Some(tap) => {
                if let Err(err) = tap.send(frame) {
                    warn!("Sending frame on {} failed with {:?}.", interface, err);
                }
            }
            None => warn!("No TAP for interface {}.", interface),
        }
    }
}
