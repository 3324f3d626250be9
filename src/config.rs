//! Configuration management for netcfg

use crate::backend::BackendId;
use crate::error::{NetcfgError, NetcfgResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main netcfg configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetcfgConfig {
    /// Output locations for each backend
    #[serde(default)]
    pub paths: ConfigPaths,
    /// Which backends run by default
    #[serde(default)]
    pub backends: BackendSettings,
    /// Live reconciliation commands
    #[serde(default)]
    pub reconcile: ReconcileSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPaths {
    /// interfaces.d directory
    #[serde(default = "default_interfaces_dir")]
    pub interfaces_dir: PathBuf,
    /// dhcpcd configuration file
    #[serde(default = "default_dhcpcd_conf")]
    pub dhcpcd_conf: PathBuf,
    /// netplan YAML file
    #[serde(default = "default_netplan_file")]
    pub netplan_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_enabled_backends")]
    pub enabled: Vec<BackendId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileSettings {
    /// Primary restart command
    #[serde(default = "default_primary")]
    pub primary: Vec<String>,
    /// Trial step of the declarative fallback
    #[serde(default = "default_trial")]
    pub trial: Vec<String>,
    /// Commit step of the declarative fallback
    #[serde(default = "default_commit")]
    pub commit: Vec<String>,
}

fn default_interfaces_dir() -> PathBuf {
    PathBuf::from("/etc/network/interfaces.d")
}

fn default_dhcpcd_conf() -> PathBuf {
    PathBuf::from("/etc/dhcpcd.conf")
}

fn default_netplan_file() -> PathBuf {
    PathBuf::from("/etc/netplan/01-netcfg.yaml")
}

fn default_enabled_backends() -> Vec<BackendId> {
    BackendId::ALL.to_vec()
}

fn args(cmd: &[&str]) -> Vec<String> {
    cmd.iter().map(|s| s.to_string()).collect()
}

fn default_primary() -> Vec<String> {
    args(&["service", "networking", "restart"])
}

fn default_trial() -> Vec<String> {
    args(&["netplan", "try"])
}

fn default_commit() -> Vec<String> {
    args(&["netplan", "apply"])
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self {
            interfaces_dir: default_interfaces_dir(),
            dhcpcd_conf: default_dhcpcd_conf(),
            netplan_file: default_netplan_file(),
        }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self { enabled: default_enabled_backends() }
    }
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            trial: default_trial(),
            commit: default_commit(),
        }
    }
}

impl NetcfgConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> NetcfgResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| NetcfgError::ConfigError(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> NetcfgResult<Self> {
        toml::from_str(content)
            .map_err(|e| NetcfgError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> NetcfgResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| NetcfgError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| NetcfgError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Ensure all output directories exist
    pub fn ensure_directories(&self) -> NetcfgResult<()> {
        let parents = [
            Some(self.paths.interfaces_dir.as_path()),
            self.paths.dhcpcd_conf.parent(),
            self.paths.netplan_file.parent(),
        ];
        for dir in parents.into_iter().flatten() {
            std::fs::create_dir_all(dir)
                .map_err(|e| NetcfgError::ConfigError(format!("Failed to create directory {:?}: {}", dir, e)))?;
        }
        Ok(())
    }
}
