//! Bridge configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Default bind address for the listener.
pub const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 65432);

/// Default ceiling on the single request read, in bytes.
///
/// The protocol has no length framing; requests larger than this truncate.
pub const DEFAULT_READ_CEILING: usize = 4096;

/// Default deadline a session handler waits for its response.
pub const DEFAULT_RESPONSE_DEADLINE: Duration = Duration::from_secs(10);

/// Default delay before the first pump tick.
pub const DEFAULT_TICK_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Default interval between pump ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for a [`crate::service::BridgeService`].
///
/// The defaults suit a local host add-on deployment: localhost:65432, a
/// 4 KiB read ceiling, a 10 second response deadline and a 1 s / 100 ms
/// tick cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Address the listener binds. Use port 0 to let the OS pick.
    pub bind_addr: SocketAddr,
    /// Maximum bytes read from a connection in the single receive.
    pub read_ceiling: usize,
    /// How long a session handler waits for the pump's response.
    pub response_deadline: Duration,
    /// Delay before the first tick after registration.
    pub tick_initial_delay: Duration,
    /// Interval the tick callback asks to be rescheduled at.
    pub tick_interval: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
            read_ceiling: DEFAULT_READ_CEILING,
            response_deadline: DEFAULT_RESPONSE_DEADLINE,
            tick_initial_delay: DEFAULT_TICK_INITIAL_DELAY,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl BridgeConfig {
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_read_ceiling(mut self, bytes: usize) -> Self {
        self.read_ceiling = bytes;
        self
    }

    pub fn with_response_deadline(mut self, deadline: Duration) -> Self {
        self.response_deadline = deadline;
        self
    }

    pub fn with_tick_initial_delay(mut self, delay: Duration) -> Self {
        self.tick_initial_delay = delay;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}
