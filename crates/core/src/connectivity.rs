//! Device connectivity signals

use std::sync::atomic::{AtomicBool, Ordering};

use crate::sync::ports::ConnectivityOracle;

/// Oracle for hosts without a connectivity signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl ConnectivityOracle for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Connectivity flag the host flips from its own network observer.
#[derive(Debug)]
pub struct ConnectivityFlag {
    online: AtomicBool,
}

impl ConnectivityFlag {
    pub fn new(online: bool) -> Self {
        Self { online: AtomicBool::new(online) }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityOracle for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }
}
