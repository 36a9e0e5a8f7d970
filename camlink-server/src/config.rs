use crate::hub::{DEFAULT_MAX_PEERS, HubSettings};
use clap::Parser;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_HEARTBEAT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_COMMAND_BUFFER: usize = 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "camlink-server", version, about = "WebRTC matchmaking and signaling relay")]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket listener binds to.
    #[arg(long, env = "CAMLINK_BIND", default_value = "0.0.0.0:3001")]
    pub bind: SocketAddr,

    /// Close sockets that stay silent this long. 0 disables the check.
    #[arg(long, env = "CAMLINK_HEARTBEAT_TIMEOUT_SECS", default_value_t = DEFAULT_HEARTBEAT_TIMEOUT_SECS)]
    pub heartbeat_timeout_secs: u64,

    #[arg(long, env = "CAMLINK_MAX_PEERS", default_value_t = DEFAULT_MAX_PEERS)]
    pub max_peers: usize,

    /// Capacity of the hub command channel.
    #[arg(long, env = "CAMLINK_COMMAND_BUFFER", default_value_t = DEFAULT_COMMAND_BUFFER)]
    pub command_buffer: usize,

    /// Requeue the remaining peer server-side when its partner leaves.
    #[arg(long, env = "CAMLINK_AUTO_REQUEUE")]
    pub auto_requeue: bool,

    /// Fallback log filter when RUST_LOG is unset.
    #[arg(long, env = "CAMLINK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn heartbeat_timeout(&self) -> Option<Duration> {
        (self.heartbeat_timeout_secs > 0).then(|| Duration::from_secs(self.heartbeat_timeout_secs))
    }

    pub fn hub_settings(&self) -> HubSettings {
        HubSettings {
            max_peers: self.max_peers,
            auto_requeue: self.auto_requeue,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            heartbeat_timeout_secs: DEFAULT_HEARTBEAT_TIMEOUT_SECS,
            max_peers: DEFAULT_MAX_PEERS,
            command_buffer: DEFAULT_COMMAND_BUFFER,
            auto_requeue: false,
            log_level: "info".to_string(),
        }
    }
}
