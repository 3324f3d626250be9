//! netplan backend

use super::{write_atomic, BackendId, ConfigBackend};
use crate::error::NetcfgResult;
use crate::intent::{InterfaceConfig, RenderMode};
use crate::render::{static_address, GENERATED_HEADER};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetplanDocument {
    pub network: NetplanNetwork,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetplanNetwork {
    pub version: u8,
    pub renderer: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ethernets: BTreeMap<String, NetplanDevice>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vlans: BTreeMap<String, NetplanDevice>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bridges: BTreeMap<String, NetplanDevice>,
}

/// One device entry; which fields apply depends on the section it sits in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetplanDevice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    pub dhcp4: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<NetplanRoute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetplanRoute {
    pub to: String,
    pub via: String,
}

impl NetplanDevice {
    fn apply_addressing(&mut self, config: &InterfaceConfig) {
        self.addresses.clear();
        self.routes.clear();

        match config.mode() {
            RenderMode::Dhcp => self.dhcp4 = true,
            RenderMode::Manual => self.dhcp4 = false,
            RenderMode::Static => {
                self.dhcp4 = false;
                self.addresses.extend(static_address(config));
                if let Some(gateway) = &config.gateway {
                    self.routes.push(NetplanRoute {
                        to: "default".to_string(),
                        via: gateway.clone(),
                    });
                }
            }
        }
    }
}

pub struct NetplanBackend {
    path: PathBuf,
}

impl NetplanBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the netplan document for the intent set
    pub fn build_document(&self, configs: &[InterfaceConfig]) -> NetplanDocument {
        let mut network = NetplanNetwork {
            version: 2,
            renderer: "networkd".to_string(),
            ethernets: BTreeMap::new(),
            vlans: BTreeMap::new(),
            bridges: BTreeMap::new(),
        };

        for config in configs {
            if let Some(vlanid) = config.vlanid {
                let device = network.vlans.entry(config.os_name()).or_default();
                device.id = Some(vlanid);
                device.link = Some(config.interface.clone());
                device.apply_addressing(config);
            } else if config.is_bridge() {
                let device = network.bridges.entry(config.interface.clone()).or_default();
                for port in config.ports() {
                    if !device.interfaces.contains(port) {
                        device.interfaces.push(port.clone());
                    }
                }
                device.apply_addressing(config);
            } else {
                network.ethernets
                    .entry(config.interface.clone())
                    .or_default()
                    .apply_addressing(config);
            }
        }

        // Bridge members and VLAN links must be declared even without an
        // intent of their own
        let ports: Vec<String> = network.bridges.values()
            .flat_map(|b| b.interfaces.iter().cloned())
            .collect();
        for port in ports {
            network.ethernets.entry(port).or_default();
        }

        let links: Vec<String> = network.vlans.values()
            .filter_map(|v| v.link.clone())
            .filter(|link| !network.bridges.contains_key(link) && !network.vlans.contains_key(link))
            .collect();
        for link in links {
            network.ethernets.entry(link).or_default();
        }

        NetplanDocument { network }
    }

    pub fn generate_config(&self, configs: &[InterfaceConfig]) -> NetcfgResult<String> {
        let yaml = serde_yaml::to_string(&self.build_document(configs))?;
        Ok(format!("{}\n{}", GENERATED_HEADER, yaml))
    }
}

#[async_trait]
impl ConfigBackend for NetplanBackend {
    fn id(&self) -> BackendId {
        BackendId::Netplan
    }

    async fn configure(&self, configs: &[InterfaceConfig]) -> NetcfgResult<()> {
        let yaml = self.generate_config(configs)?;
        write_atomic(&self.path, &yaml).await?;
        info!("netplan: wrote {}", self.path.display());
        Ok(())
    }
}
