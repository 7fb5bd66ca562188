//! Connectivity oracle: single-writer, multi-reader availability flag.
//!
//! A background poller probes the network on its own interval and writes an
//! atomic flag; the pipeline only ever reads it through
//! `ConnectivityReader`. The reader tolerates the value changing between
//! reads; no stronger atomicity is needed.

use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Shared connectivity cell. Clone handles are cheap; `set` is reserved for
/// the poller (or tests).
#[derive(Clone, Default)]
pub struct ConnectivityFlag {
    available: Arc<AtomicBool>,
}

impl ConnectivityFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    pub fn reader(&self) -> ConnectivityReader {
        ConnectivityReader {
            available: Arc::clone(&self.available),
        }
    }
}

/// Read-only view of the connectivity flag.
#[derive(Clone)]
pub struct ConnectivityReader {
    available: Arc<AtomicBool>,
}

impl ConnectivityReader {
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

/// Probe for "is a remote inference path usable right now?". Must answer
/// within a short bound and must map every failure to `false`, never an
/// error.
pub trait ConnectivityProbe: Send {
    fn check(&mut self) -> bool;
}

/// TCP reachability probe: a connect within the timeout counts as online.
pub struct TcpProbe {
    addr: SocketAddr,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(addr: SocketAddr, timeout: Duration) -> Self {
        Self { addr, timeout }
    }
}

impl ConnectivityProbe for TcpProbe {
    fn check(&mut self) -> bool {
        TcpStream::connect_timeout(&self.addr, self.timeout).is_ok()
    }
}

/// Spawn the poller thread: re-probe every `interval`, write the flag, log
/// transitions. Runs for the life of the process.
pub fn spawn_poller(
    mut probe: Box<dyn ConnectivityProbe>,
    flag: ConnectivityFlag,
    interval: Duration,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut last = None;
        loop {
            let available = probe.check();
            if last != Some(available) {
                log::info!(
                    "connectivity changed: {}",
                    if available { "online" } else { "offline" }
                );
                last = Some(available);
            }
            flag.set(available);
            std::thread::sleep(interval);
        }
    })
}
