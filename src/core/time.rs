//! Abstractions for providing the current time.

use std::fmt::Debug;
use std::sync::{
    Arc,
    Mutex,
};
use std::time::{
    Duration,
    Instant,
};

/// An environment that provides the current time.
pub trait Env: Clone + Debug {
    /// Returns an instance corresponding to "now".
    fn now_instant(&self) -> Instant;
}

/// An environment that provides system based time.
#[derive(Clone, Debug, Default)]
pub struct SystemEnv;

impl SystemEnv {
    pub fn new() -> SystemEnv {
        SystemEnv {}
    }
}

impl Env for SystemEnv {
    fn now_instant(&self) -> Instant {
        Instant::now()
    }
}

/// An environment that provides a configurable time.
///
/// Clones share the same clock so a test can advance the time seen by a
/// component it has handed a clone to.
#[derive(Clone, Debug)]
pub struct MockEnv {
    now: Arc<Mutex<Instant>>,
}

impl MockEnv {
    pub fn new() -> MockEnv {
        MockEnv {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, duration: Duration) {
        let mut now = match self.now.lock() {
            Ok(now) => now,
            Err(err) => err.into_inner(),
        };
        *now += duration;
    }
}

impl Default for MockEnv {
    fn default() -> MockEnv {
        MockEnv::new()
    }
}

impl Env for MockEnv {
    fn now_instant(&self) -> Instant {
        match self.now.lock() {
            Ok(now) => *now,
            Err(err) => *err.into_inner(),
        }
    }
}
