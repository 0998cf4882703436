extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate srouter;

use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{
    App,
    Arg,
};

use srouter::core::arp_cache::{
    ArpCache,
    SharedArpCache,
    DEFAULT_EXPIRATION_SECS,
};
use srouter::core::interface::Interfaces;
use srouter::core::route::RoutingTable;
use srouter::core::service::Router;
use srouter::core::time::SystemEnv;
use srouter::linux::{
    Tap,
    Taps,
};
use srouter::Error;

lazy_static! {
    /// How often pending ARP requests are swept.
    static ref TICK: Duration = Duration::from_secs(1);

    /// How long to back off when no TAP has a frame waiting.
    static ref IDLE: Duration = Duration::from_millis(1);
}

/// Routes frames between TAP interfaces. Bring the TAPs up and assign them to
/// hosts/namespaces, then ping through the router.
fn main() {
    env_logger::init();

    let matches = App::new("router")
        .about("Static IPv4 router over TAP interfaces")
        .arg(
            Arg::with_name("interfaces")
                .long("interfaces")
                .value_name("FILE")
                .help("Interface table, one 'name ipv4 mac' per line")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("rtable")
                .long("rtable")
                .value_name("FILE")
                .help("Routing table, one 'destination gateway mask interface' per line")
                .required(true)
                .takes_value(true),
        )
        .get_matches();

    let interfaces = match Interfaces::from_file(matches.value_of("interfaces").unwrap()) {
        Ok(interfaces) => interfaces,
        Err(err) => {
            eprintln!("Loading interfaces failed with {:?}.", err);
            process::exit(1);
        }
    };

    let routes = match RoutingTable::from_file(matches.value_of("rtable").unwrap()) {
        Ok(routes) => routes,
        Err(err) => {
            eprintln!("Loading routing table failed with {:?}.", err);
            process::exit(1);
        }
    };

    let taps = match Taps::open(&interfaces) {
        Ok(taps) => taps,
        Err(err) => {
            eprintln!("Opening TAP interfaces failed with {:?}.", err);
            process::exit(1);
        }
    };

    for interface in interfaces.iter() {
        info!(
            "Interface {}: (MAC = {}, IPv4 = {})",
            interface.name, interface.ethernet_addr, interface.ipv4_addr
        );
    }
    for route in routes.iter() {
        info!(
            "Route {}/{} via {} on {}",
            route.destination, route.mask, route.gateway, route.interface
        );
    }

    let neighbors = SharedArpCache::new(ArpCache::new(DEFAULT_EXPIRATION_SECS, SystemEnv::new()));
    let router = Arc::new(Router::new(interfaces, routes, neighbors, taps));

    {
        let router = router.clone();
        thread::spawn(move || loop {
            thread::sleep(*TICK);
            router.tick();
        });
    }

    let mut buffer = vec![0; Tap::MAX_FRAME_LEN];

    loop {
        let mut idle = true;

        for tap in router.transport.iter() {
            match tap.recv(&mut buffer) {
                Ok(buffer_len) => {
                    idle = false;
                    // Drops are logged by the router.
                    let _ = router.handle_frame(&buffer[.. buffer_len], tap.name());
                }
                Err(Error::Exhausted) => {}
                Err(err) => warn!("Reading from {} failed with {:?}.", tap.name(), err),
            }
        }

        if idle {
            thread::sleep(*IDLE);
        }
    }
}
