use std::path::PathBuf;

use tracing::trace;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Path of the durable host registry file
    #[serde(default = "crate::util::get_registry_path")]
    pub registry_path: PathBuf,

    /// Directory under which per-day log folders are created
    #[serde(default = "crate::util::get_log_dir")]
    pub log_dir: PathBuf,

    /// Seconds between probes of the same host
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Per-probe timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_path: crate::util::get_registry_path(),
            log_dir: crate::util::get_log_dir(),
            interval: default_interval(),
            timeout: default_timeout(),
        }
    }
}

fn default_interval() -> u64 {
    2
}

fn default_timeout() -> u64 {
    3
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
