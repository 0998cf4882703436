use std::sync::Mutex;

/// Outbound side of the link layer, addressed by interface name.
///
/// Transmission is fire-and-forget: failures are the transport's to report.
pub trait Transport {
    /// Sends a complete Ethernet frame out of the named interface.
    fn transmit(&self, frame: &[u8], interface: &str);
}

/// A frame captured by a MockTransport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transmitted {
    pub interface: String,
    pub frame: Vec<u8>,
}

/// A Transport that records frames instead of sending them.
#[derive(Debug, Default)]
pub struct MockTransport {
    sent: Mutex<Vec<Transmitted>>,
}

impl MockTransport {
    pub fn new() -> MockTransport {
        MockTransport::default()
    }

    /// Removes and returns every frame transmitted so far, oldest first.
    pub fn take(&self) -> Vec<Transmitted> {
        let mut sent = match self.sent.lock() {
            Ok(sent) => sent,
            Err(err) => err.into_inner(),
        };
        sent.drain(..).collect()
    }
}

impl Transport for MockTransport {
    fn transmit(&self, frame: &[u8], interface: &str) {
        let mut sent = match self.sent.lock() {
            Ok(sent) => sent,
            Err(err) => err.into_inner(),
        };
        sent.push(Transmitted {
            interface: interface.to_string(),
            frame: frame.to_vec(),
        });
    }
}
