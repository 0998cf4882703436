//! Static routing table with longest prefix match lookups.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::core::repr::Ipv4Address;
use crate::{
    Error,
    Result,
};

/// A single static route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub destination: Ipv4Address,
    pub gateway: Ipv4Address,
    pub mask: Ipv4Address,
    /// Name of the egress interface.
    pub interface: String,
}

impl Route {
    /// Checks if an address falls within the route's network.
    pub fn matches(&self, addr: Ipv4Address) -> bool {
        addr.mask(self.mask) == self.destination.mask(self.mask)
    }

    /// Returns the address to resolve a link layer address for when sending
    /// a packet to addr along this route.
    ///
    /// Routes without a gateway are directly connected.
    pub fn next_hop(&self, addr: Ipv4Address) -> Ipv4Address {
        if self.gateway.is_unspecified() {
            addr
        } else {
            self.gateway
        }
    }
}

/// An immutable collection of routes.
#[derive(Clone, Debug, Default)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

impl RoutingTable {
    pub fn new(routes: Vec<Route>) -> RoutingTable {
        RoutingTable { routes }
    }

    /// Loads a routing table from a file. See `from_str(...)` for the format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<RoutingTable> {
        fs::read_to_string(path)?.parse()
    }

    /// Finds the most specific route for an address.
    ///
    /// Among routes with equally long prefixes the one listed first wins.
    pub fn resolve(&self, addr: Ipv4Address) -> Option<&Route> {
        let mut best: Option<&Route> = None;

        for route in self.routes.iter().filter(|route| route.matches(addr)) {
            match best {
                Some(other) if other.mask.prefix_len() >= route.mask.prefix_len() => {}
                _ => best = Some(route),
            }
        }

        best
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromStr for RoutingTable {
    type Err = Error;

    /// Parses one `destination gateway mask interface` route per line. Blank
    /// lines and `#` comments are skipped.
    fn from_str(table: &str) -> Result<RoutingTable> {
        let mut routes = Vec::new();

        for (i, line) in table.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let invalid = || Error::Config(format!("Invalid route on line {}: {}", i + 1, line));

            let tokens: Vec<_> = line.split_whitespace().collect();
            if tokens.len() != 4 {
                return Err(invalid());
            }

            routes.push(Route {
                destination: tokens[0].parse().map_err(|_| invalid())?,
                gateway: tokens[1].parse().map_err(|_| invalid())?,
                mask: tokens[2].parse().map_err(|_| invalid())?,
                interface: tokens[3].to_string(),
            });
        }

        Ok(RoutingTable::new(routes))
    }
}
