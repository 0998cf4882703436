//! Linux specific transport.

mod libc;
pub mod tap;

pub use self::tap::{
    Tap,
    Taps,
};
