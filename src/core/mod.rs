//! Core, platform independent routing code.

pub mod arp_cache;
pub mod check;
pub mod dev;
pub mod interface;
pub mod neighbor;
pub mod repr;
pub mod route;
pub mod service;
pub mod time;
