use std::time::Duration;

use crate::spec::virtual_machine::Capabilities;

/// Settings for a debug session, fixed once the server is bound.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Socket read timeout of the packet loop.
    ///
    /// A thread that is parked but can't take the reader because another
    /// thread holds it re-checks its suspend count this often.
    pub poll_interval: Duration,
    /// How long to wait for the debugger's handshake after accepting the
    /// connection, `None` to wait forever.
    pub handshake_timeout: Option<Duration>,
    /// Send VM_START with the ALL policy and park the starting thread until
    /// the debugger resumes it. Otherwise VM_START goes out with NONE.
    pub suspend_on_start: bool,
    /// Returned verbatim by `VirtualMachine.CapabilitiesNew`.
    pub capabilities: Capabilities,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            handshake_timeout: Some(Duration::from_secs(10)),
            suspend_on_start: true,
            capabilities: Capabilities::default(),
        }
    }
}

impl ServerConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_handshake_timeout(mut self, handshake_timeout: Option<Duration>) -> Self {
        self.handshake_timeout = handshake_timeout;
        self
    }

    pub fn with_suspend_on_start(mut self, suspend_on_start: bool) -> Self {
        self.suspend_on_start = suspend_on_start;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}
