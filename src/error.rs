//! Error types for netcfg

use crate::backend::BackendId;
use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetcfgError {
    /// Same (interface, vlanid) pair declared twice
    #[error("Can't have same VLAN ID {vlanid} on interface {interface}")]
    DuplicateVlan { interface: String, vlanid: u16 },

    /// A VLAN intent also declares bridge ports
    #[error("VLAN {vlanid} in \"{interface}\" cannot have bridged interfaces")]
    VlanCannotBridge { interface: String, vlanid: u16 },

    /// A port is claimed by two different bridge owners
    #[error("Interface \"{port}\" is bridged in \"{first}\" and \"{second}\"")]
    PortDoubleBridged { port: String, first: String, second: String },

    /// Two distinct VLANs resolve to the same OS interface name
    #[error("Interface name \"{ifname}\" is produced by both \"{first}\" and \"{second}\"")]
    IfnameCollision { ifname: String, first: String, second: String },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// One or more backends failed to persist their configuration
    #[error("{}", BackendFailureList(.0))]
    BackendFailures(Vec<BackendFailure>),

    /// Both reconcile paths failed
    #[error("Failed to reconcile network service: {0}")]
    ReconcileFailure(Box<NetcfgError>),

    /// Command execution failed
    #[error("Command '{cmd}' failed{}: {stderr}", .code.map(|c| format!(" with code {}", c)).unwrap_or_default())]
    CommandFailed { cmd: String, code: Option<i32>, stderr: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A single backend's failure, as reported by the dispatcher
#[derive(Debug)]
pub struct BackendFailure {
    pub backend: BackendId,
    pub error: NetcfgError,
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "backend {} failed: {}", self.backend, self.error)
    }
}

struct BackendFailureList<'a>(&'a [BackendFailure]);

impl fmt::Display for BackendFailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} backend(s) failed", self.0.len())?;
        for failure in self.0 {
            write!(f, "; {}", failure)?;
        }
        Ok(())
    }
}

impl NetcfgError {
    /// True for errors raised before any backend was invoked
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            NetcfgError::DuplicateVlan { .. }
                | NetcfgError::VlanCannotBridge { .. }
                | NetcfgError::PortDoubleBridged { .. }
                | NetcfgError::IfnameCollision { .. }
                | NetcfgError::InvalidParameter(_)
        )
    }
}

impl From<serde_json::Error> for NetcfgError {
    fn from(error: serde_json::Error) -> Self {
        NetcfgError::ParseError(error.to_string())
    }
}

impl From<serde_yaml::Error> for NetcfgError {
    fn from(error: serde_yaml::Error) -> Self {
        NetcfgError::ParseError(error.to_string())
    }
}

pub type NetcfgResult<T> = Result<T, NetcfgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_messages_name_interfaces() {
        let err = NetcfgError::PortDoubleBridged {
            port: "eth1".to_string(),
            first: "br0".to_string(),
            second: "br1".to_string(),
        };
        assert_eq!(err.to_string(), "Interface \"eth1\" is bridged in \"br0\" and \"br1\"");
        assert!(err.is_validation());

        let err = NetcfgError::DuplicateVlan { interface: "eth0".to_string(), vlanid: 10 };
        assert!(err.to_string().contains("eth0"));
    }

    #[test]
    fn test_command_failed_message() {
        let err = NetcfgError::CommandFailed {
            cmd: "netplan apply".to_string(),
            code: Some(1),
            stderr: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Command 'netplan apply' failed with code 1: boom");

        let err = NetcfgError::CommandFailed {
            cmd: "netplan try".to_string(),
            code: None,
            stderr: "killed".to_string(),
        };
        assert_eq!(err.to_string(), "Command 'netplan try' failed: killed");
    }

    #[test]
    fn test_backend_failures_lists_every_backend() {
        let err = NetcfgError::BackendFailures(vec![
            BackendFailure {
                backend: BackendId::Netplan,
                error: NetcfgError::ConfigError("disk full".to_string()),
            },
            BackendFailure {
                backend: BackendId::Dhcpcd,
                error: NetcfgError::ConfigError("read-only".to_string()),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 backend(s) failed"));
        assert!(msg.contains("netplan"));
        assert!(msg.contains("dhcpcd"));
        assert!(!err.is_validation());
    }
}
