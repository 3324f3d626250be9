//! OS interface name resolution

use crate::error::{NetcfgError, NetcfgResult};
use crate::intent::InterfaceConfig;
use std::collections::HashMap;

/// Maximum length for interface names (Linux kernel limit is 15)
pub const MAX_IFNAME_LEN: usize = 15;

/// OS-visible name for an intent
///
/// VLANs get `<interface>.<vlanid>`; names over the kernel limit keep only
/// their trailing characters.
pub fn resolve_ifname(config: &InterfaceConfig) -> String {
    let name = config.natural_name();
    if config.vlanid.is_none() {
        return name;
    }

    let len = name.chars().count();
    if len > MAX_IFNAME_LEN {
        name.chars().skip(len - MAX_IFNAME_LEN).collect()
    } else {
        name
    }
}

/// Human-readable form of an intent's logical key
fn logical_label(config: &InterfaceConfig) -> String {
    match config.vlanid {
        Some(vlanid) => format!("{} vlan {}", config.interface, vlanid),
        None => config.interface.clone(),
    }
}

/// Fill in `ifname` on every intent
///
/// Resolved names must be unique across logical `(interface, vlanid)` keys.
/// Distinct VLANs can truncate to the same name, and a plain interface
/// literally named `eth0.10` clashes with VLAN 10 on `eth0`.
pub fn resolve_names(configs: &mut [InterfaceConfig]) -> NetcfgResult<()> {
    let mut seen: HashMap<String, (&str, Option<u16>)> = HashMap::new();
    let mut resolved = Vec::with_capacity(configs.len());

    for config in configs.iter() {
        let ifname = resolve_ifname(config);
        let key = (config.interface.as_str(), config.vlanid);

        match seen.get(&ifname) {
            Some(&(interface, vlanid)) if (interface, vlanid) != key => {
                let first = match vlanid {
                    Some(id) => format!("{} vlan {}", interface, id),
                    None => interface.to_string(),
                };
                return Err(NetcfgError::IfnameCollision {
                    ifname,
                    first,
                    second: logical_label(config),
                });
            }
            Some(_) => {}
            None => {
                seen.insert(ifname.clone(), key);
            }
        }

        resolved.push(ifname);
    }

    for (config, ifname) in configs.iter_mut().zip(resolved) {
        config.ifname = Some(ifname);
    }

    Ok(())
}
