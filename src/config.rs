use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub device: DeviceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_server_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_server_port() -> u16 {
    3002
}

/// SNMP agent and the interface whose counters are polled.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_device_address")]
    pub address: String,
    #[serde(default = "default_snmp_port")]
    pub port: u16,
    #[serde(default = "default_community")]
    pub community: String,
    /// ifIndex of the tracked interface.
    #[serde(default = "default_interface_index")]
    pub interface_index: u32,
    /// Per-attempt wait for the agent's reply.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Extra attempts after the first one times out.
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: default_device_address(),
            port: default_snmp_port(),
            community: default_community(),
            interface_index: default_interface_index(),
            timeout_ms: default_timeout_ms(),
            retries: default_retries(),
        }
    }
}

impl DeviceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_device_address() -> String {
    "192.168.90.2".into()
}

fn default_snmp_port() -> u16 {
    161
}

fn default_community() -> String {
    "public".into()
}

fn default_interface_index() -> u32 {
    4
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_retries() -> u32 {
    1
}

/// Environment variables that override the device section.
pub const ENV_DEVICE_ADDRESS: &str = "MIKROTIK_IP";
pub const ENV_COMMUNITY: &str = "SNMP_COMMUNITY";
pub const ENV_INTERFACE_INDEX: &str = "INTERFACE_INDEX";

impl AppConfig {
    /// Loads `CONFIG_FILE` (default `config.toml`), then applies environment overrides.
    /// A missing default file means built-in defaults; a missing explicit file is an error.
    pub fn load() -> anyhow::Result<Self> {
        let explicit = std::env::var("CONFIG_FILE").ok();
        let path = explicit.clone().unwrap_or_else(|| "config.toml".into());
        let s = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path, "config file not found; using defaults");
                String::new()
            }
            Err(e) => return Err(anyhow::anyhow!("reading config file {}: {}", path, e)),
        };
        let mut config: AppConfig = toml::from_str(&s)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests). No environment overrides.
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup(ENV_DEVICE_ADDRESS) {
            self.device.address = address;
        }
        if let Some(community) = lookup(ENV_COMMUNITY) {
            self.device.community = community;
        }
        if let Some(index) = lookup(ENV_INTERFACE_INDEX) {
            self.device.interface_index = index.trim().parse().map_err(|e| {
                anyhow::anyhow!(
                    "{} must be an unsigned integer, got {:?}: {}",
                    ENV_INTERFACE_INDEX,
                    index,
                    e
                )
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.device.address.trim().is_empty(),
            "device.address must be non-empty"
        );
        anyhow::ensure!(
            self.device.port > 0,
            "device.port must be between 1 and 65535, got {}",
            self.device.port
        );
        anyhow::ensure!(
            !self.device.community.is_empty(),
            "device.community must be non-empty"
        );
        anyhow::ensure!(
            self.device.interface_index > 0,
            "device.interface_index must be > 0, got {}",
            self.device.interface_index
        );
        anyhow::ensure!(
            self.device.timeout_ms > 0,
            "device.timeout_ms must be > 0, got {}",
            self.device.timeout_ms
        );
        Ok(())
    }
}
