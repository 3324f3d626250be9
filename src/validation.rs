//! Intent validation
//!
//! Rejects conflicting or malformed intent sets before any backend runs.
//! Conflicts are checked per intent in input order and the first violation
//! aborts the whole operation.

use crate::error::{NetcfgError, NetcfgResult};
use crate::intent::InterfaceConfig;
use std::collections::HashSet;
use std::net::Ipv4Addr;

/// Maximum IPv4 prefix length
const MAX_PREFIX_LEN: u8 = 32;

/// Validate the full intent set
pub fn validate_intents(configs: &[InterfaceConfig]) -> NetcfgResult<()> {
    let mut vlans = HashSet::new();

    for config in configs {
        if let Some(vlanid) = config.vlanid {
            if !vlans.insert(config.natural_name()) {
                return Err(NetcfgError::DuplicateVlan {
                    interface: config.interface.clone(),
                    vlanid,
                });
            }
            if config.is_bridge() {
                return Err(NetcfgError::VlanCannotBridge {
                    interface: config.interface.clone(),
                    vlanid,
                });
            }
        }

        check_bridge_ports(config, configs)?;
        validate_fields(config)?;
    }

    Ok(())
}

/// A port may only be listed by bridges that share one owner
fn check_bridge_ports(config: &InterfaceConfig, all: &[InterfaceConfig]) -> NetcfgResult<()> {
    for port in config.ports() {
        let other = all
            .iter()
            .find(|c| c.interface != config.interface && c.ports().contains(port));

        if let Some(other) = other {
            return Err(NetcfgError::PortDoubleBridged {
                port: port.clone(),
                first: config.interface.clone(),
                second: other.interface.clone(),
            });
        }
    }
    Ok(())
}

/// Per-intent field checks
pub fn validate_fields(config: &InterfaceConfig) -> NetcfgResult<()> {
    validate_interface_name(&config.interface)?;

    for port in config.ports() {
        validate_interface_name(port)?;
    }

    if let Some(prefix) = config.prefix {
        validate_prefix_len(prefix)?;
    }
    if let Some(addr) = &config.ip_address {
        validate_ip_address(addr)?;
    }
    if let Some(gateway) = &config.gateway {
        validate_ip_address(gateway)?;
    }

    Ok(())
}

/// Validate an interface or port name
///
/// Names end up as file names and as tokens in generated config, so they must
/// not contain whitespace, control characters or path separators.
pub fn validate_interface_name(name: &str) -> NetcfgResult<()> {
    if name.is_empty() {
        return Err(NetcfgError::InvalidParameter(
            "Interface name cannot be empty".to_string()
        ));
    }

    for c in name.chars() {
        if c.is_whitespace() || c.is_control() || c == '/' {
            return Err(NetcfgError::InvalidParameter(
                format!("Invalid interface name '{}': contains invalid character {:?}", name, c)
            ));
        }
    }

    // Leading dash reads as an option, leading dot as a hidden file
    if name.starts_with('-') || name.starts_with('.') {
        return Err(NetcfgError::InvalidParameter(
            format!("Interface name '{}' cannot start with '-' or '.'", name)
        ));
    }

    Ok(())
}

/// Validate an IPv4 address
pub fn validate_ip_address(addr: &str) -> NetcfgResult<Ipv4Addr> {
    addr.parse::<Ipv4Addr>()
        .map_err(|_| NetcfgError::InvalidParameter(
            format!("Invalid IP address: {}", addr)
        ))
}

/// Validate IPv4 prefix length
pub fn validate_prefix_len(prefix: u8) -> NetcfgResult<()> {
    if prefix > MAX_PREFIX_LEN {
        return Err(NetcfgError::InvalidParameter(
            format!("Prefix length {} exceeds maximum {}", prefix, MAX_PREFIX_LEN)
        ));
    }
    Ok(())
}
