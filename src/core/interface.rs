//! The set of named interfaces the router owns.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::core::repr::{
    EthernetAddress,
    Ipv4Address,
};
use crate::{
    Error,
    Result,
};

/// A router interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub ipv4_addr: Ipv4Address,
    pub ethernet_addr: EthernetAddress,
}

/// Static interface table.
#[derive(Clone, Debug, Default)]
pub struct Interfaces {
    interfaces: Vec<Interface>,
}

impl Interfaces {
    pub fn new(interfaces: Vec<Interface>) -> Interfaces {
        Interfaces { interfaces }
    }

    /// Loads an interface table from a file. See `from_str(...)` for the format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Interfaces> {
        fs::read_to_string(path)?.parse()
    }

    /// Looks up an interface by name.
    pub fn get(&self, name: &str) -> Result<&Interface> {
        self.interfaces
            .iter()
            .find(|interface| interface.name == name)
            .ok_or_else(|| Error::UnknownInterface(name.to_string()))
    }

    /// Checks if an address is assigned to any of the interfaces.
    pub fn is_local(&self, addr: Ipv4Address) -> bool {
        self.interfaces
            .iter()
            .any(|interface| interface.ipv4_addr == addr)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.iter()
    }
}

impl FromStr for Interfaces {
    type Err = Error;

    /// Parses one `name ipv4 mac` interface per line. Blank lines and `#`
    /// comments are skipped.
    fn from_str(table: &str) -> Result<Interfaces> {
        let mut interfaces: Vec<Interface> = Vec::new();

        for (i, line) in table.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let invalid =
                || Error::Config(format!("Invalid interface on line {}: {}", i + 1, line));

            let tokens: Vec<_> = line.split_whitespace().collect();
            if tokens.len() != 3 || interfaces.iter().any(|other| other.name == tokens[0]) {
                return Err(invalid());
            }

            interfaces.push(Interface {
                name: tokens[0].to_string(),
                ipv4_addr: tokens[1].parse().map_err(|_| invalid())?,
                ethernet_addr: tokens[2].parse().map_err(|_| invalid())?,
            });
        }

        Ok(Interfaces::new(interfaces))
    }
}
