#[cfg(test)]
#[macro_use]
extern crate assert_matches;
extern crate byteorder;
extern crate libc;
#[macro_use]
extern crate log;

pub mod core;

#[cfg(target_os = "linux")]
pub mod linux;

use crate::core::repr::Ipv4Address;

#[derive(Debug)]
pub enum Error {
    /// Indicates an error where a buffer, device, etc. is full or empty.
    Exhausted,
    /// Indicates an error where a packet or frame is malformed.
    Malformed,
    /// Indicates an error where a checksum is invalid.
    Checksum,
    /// Indicates a packet or frame the router does not act upon.
    Ignored,
    /// Indicates an error where no route matches the destination.
    NoRoute(Ipv4Address),
    /// Indicates an interface name missing from the interface table.
    UnknownInterface(String),
    /// Indicates an invalid line in a configuration file.
    Config(String),
    /// Indicates a generic IO error.
    IO(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IO(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
