use std::time::Duration;

/// Port the Kasa local protocol listens on.
pub const DEFAULT_PORT: u16 = 9999;
/// Per-command deadline covering connect, write and read.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Runtime configuration describing how to reach a Kasa bulb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KasaConfig {
    /// Host name or IP, optionally with `:port`.
    pub address: String,
    /// Deadline applied to every command.
    pub command_timeout: Duration,
}

impl KasaConfig {
    /// Construct a configuration for the given address with the default timeout.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Override the per-command timeout.
    pub fn with_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }

    /// Address in `host:port` form, appending [`DEFAULT_PORT`] when absent.
    pub fn socket_address(&self) -> String {
        let address = self.address.trim();
        if address.rsplit_once(':').is_some_and(|(_, port)| port.parse::<u16>().is_ok()) {
            address.to_string()
        } else {
            format!("{address}:{DEFAULT_PORT}")
        }
    }
}
