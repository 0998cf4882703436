use std::collections::HashMap;
use std::sync::{
    Mutex,
    MutexGuard,
};
use std::time::{
    Duration,
    Instant,
};

use crate::core::neighbor::{
    Pending,
    QueuedPacket,
    Resolved,
    Resolver,
};
use crate::core::repr::{
    EthernetAddress,
    Ipv4Address,
};
use crate::core::time::{
    Env,
    SystemEnv,
};

/// Seconds an address mapping stays in the cache.
pub const DEFAULT_EXPIRATION_SECS: u64 = 15;

/// Interval between ARP requests for an unresolved address.
pub const REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// ARP requests sent for an address before its queued packets are dropped.
pub const MAX_REQUESTS: u32 = 5;

struct Entry {
    eth_addr: EthernetAddress,
    in_cache_since: Instant,
}

struct Request {
    ipv4_addr: Ipv4Address,
    /// Interface requests are broadcast on, taken from the first packet.
    interface: String,
    sent: Option<Instant>,
    times_sent: u32,
    packets: Vec<QueuedPacket>,
}

/// An ARP request that should be broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArpRequest {
    pub target: Ipv4Address,
    pub interface: String,
}

/// Maintains an expiring set of IPv4 -> ethernet address mappings and the
/// packets waiting for unresolved addresses.
pub struct ArpCache<T = SystemEnv>
where
    T: Env,
{
    entries: HashMap<Ipv4Address, Entry>,
    requests: Vec<Request>,
    expiration: Duration,
    in_cache_since_min: Instant,
    time_env: T,
}

impl<T: Env> ArpCache<T> {
    /// Creates an ARP cache where ethernet address mappings expire after
    /// expiration_in_secs seconds.
    pub fn new(expiration_in_secs: u64, time_env: T) -> ArpCache<T> {
        ArpCache {
            entries: HashMap::new(),
            requests: Vec::new(),
            expiration: Duration::from_secs(expiration_in_secs),
            in_cache_since_min: time_env.now_instant(),
            time_env,
        }
    }

    /// Lookup the ethernet address for an IPv4 address.
    pub fn eth_addr_for_ip(&mut self, ipv4_addr: Ipv4Address) -> Option<EthernetAddress> {
        self.expire_eth_addr();
        self.entries.get(&ipv4_addr).map(|entry| entry.eth_addr)
    }

    /// Create or update the ethernet address mapping for an IPv4 address.
    ///
    /// Returns the pending request for the address, if any, removing it.
    pub fn set_eth_addr_for_ip(
        &mut self,
        ipv4_addr: Ipv4Address,
        eth_addr: EthernetAddress,
    ) -> Option<Resolved> {
        self.expire_eth_addr();

        let in_cache_since = self.time_env.now_instant();

        if self.entries.is_empty() {
            self.in_cache_since_min = in_cache_since;
        }

        self.entries.insert(
            ipv4_addr,
            Entry {
                eth_addr,
                in_cache_since,
            },
        );

        let i = self
            .requests
            .iter()
            .position(|request| request.ipv4_addr == ipv4_addr)?;

        Some(Resolved {
            next_hop: ipv4_addr,
            eth_addr,
            packets: self.requests.remove(i).packets,
        })
    }

    /// Queues a packet until ipv4_addr resolves, creating a request for the
    /// address if none is pending.
    pub fn queue_packet(&mut self, ipv4_addr: Ipv4Address, packet: QueuedPacket) -> Pending {
        let queued = match self
            .requests
            .iter_mut()
            .find(|request| request.ipv4_addr == ipv4_addr)
        {
            Some(request) => {
                request.packets.push(packet);
                request.packets.len()
            }
            None => {
                self.requests.push(Request {
                    ipv4_addr,
                    interface: packet.egress.clone(),
                    sent: None,
                    times_sent: 0,
                    packets: vec![packet],
                });
                1
            }
        };

        Pending {
            next_hop: ipv4_addr,
            queued,
        }
    }

    /// Returns the number of packets waiting on ipv4_addr.
    pub fn pending(&self, ipv4_addr: Ipv4Address) -> usize {
        self.requests
            .iter()
            .find(|request| request.ipv4_addr == ipv4_addr)
            .map_or(0, |request| request.packets.len())
    }

    /// Returns the ARP requests that are due, dropping requests that went
    /// unanswered too many times along with their packets.
    pub fn sweep(&mut self) -> Vec<ArpRequest> {
        let now = self.time_env.now_instant();
        let mut due = Vec::new();

        self.requests.retain(|request| match request.sent {
            Some(sent) if now.duration_since(sent) < REQUEST_INTERVAL => true,
            _ if request.times_sent >= MAX_REQUESTS => {
                warn!(
                    "No ARP reply from {} after {} requests, dropping {} packet(s).",
                    request.ipv4_addr,
                    request.times_sent,
                    request.packets.len()
                );
                false
            }
            _ => true,
        });

        for request in self.requests.iter_mut() {
            let is_due = match request.sent {
                Some(sent) => now.duration_since(sent) >= REQUEST_INTERVAL,
                None => true,
            };

            if is_due {
                request.sent = Some(now);
                request.times_sent += 1;
                due.push(ArpRequest {
                    target: request.ipv4_addr,
                    interface: request.interface.clone(),
                });
            }
        }

        due
    }

    /// Purge Ethernet address entries translations that have expired.
    fn expire_eth_addr(&mut self) {
        let now = self.time_env.now_instant();

        if now > self.in_cache_since_min + self.expiration {
            // Purge expired entries...
            let expiration = self.expiration;
            self.entries
                .retain(|_, entry| now.duration_since(entry.in_cache_since) <= expiration);

            // Update timestamp of the oldest entry...
            let in_cache_since = self.entries.values().map(|entry| entry.in_cache_since);
            self.in_cache_since_min = match in_cache_since.min() {
                Some(in_cache_since) => in_cache_since,
                None => now,
            }
        }
    }
}

/// An ArpCache guarded by a mutex, shared between the packet path and the
/// periodic sweep.
pub struct SharedArpCache<T = SystemEnv>
where
    T: Env,
{
    cache: Mutex<ArpCache<T>>,
}

impl<T: Env> SharedArpCache<T> {
    pub fn new(cache: ArpCache<T>) -> SharedArpCache<T> {
        SharedArpCache {
            cache: Mutex::new(cache),
        }
    }

    /// See `ArpCache::sweep(...)`.
    pub fn sweep(&self) -> Vec<ArpRequest> {
        self.lock().sweep()
    }

    /// See `ArpCache::pending(...)`.
    pub fn pending(&self, ipv4_addr: Ipv4Address) -> usize {
        self.lock().pending(ipv4_addr)
    }

    fn lock(&self) -> MutexGuard<ArpCache<T>> {
        // A panic elsewhere does not leave the cache inconsistent.
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(err) => err.into_inner(),
        }
    }
}

impl<T: Env> Resolver for SharedArpCache<T> {
    fn lookup(&self, next_hop: Ipv4Address) -> Option<EthernetAddress> {
        self.lock().eth_addr_for_ip(next_hop)
    }

    fn enqueue(
        &self,
        next_hop: Ipv4Address,
        frame: &[u8],
        egress: &str,
        ingress: &str,
    ) -> Pending {
        self.lock().queue_packet(
            next_hop,
            QueuedPacket {
                frame: frame.to_vec(),
                egress: egress.to_string(),
                ingress: ingress.to_string(),
            },
        )
    }

    fn observe_reply(
        &self,
        eth_addr: EthernetAddress,
        ipv4_addr: Ipv4Address,
    ) -> Option<Resolved> {
        self.lock().set_eth_addr_for_ip(ipv4_addr, eth_addr)
    }
}
