//! dhcpcd backend
//!
//! dhcpcd runs DHCP on every interface by default, so only static and
//! address-less interfaces need an entry.

use super::{write_atomic, BackendId, ConfigBackend};
use crate::error::NetcfgResult;
use crate::intent::{InterfaceConfig, RenderMode};
use crate::render::{static_address, GENERATED_HEADER};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Client options emitted ahead of the per-interface blocks
const BASE_OPTIONS: &[&str] = &[
    "hostname",
    "clientid",
    "persistent",
    "option rapid_commit",
    "option domain_name_servers, domain_name, domain_search, host_name",
    "option classless_static_routes",
    "option interface_mtu",
    "require dhcp_server_identifier",
    "slaac private",
];

pub struct DhcpcdBackend {
    path: PathBuf,
}

impl DhcpcdBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Generate the full dhcpcd.conf
    pub fn generate_config(&self, configs: &[InterfaceConfig]) -> String {
        let mut denied: Vec<String> = Vec::new();
        let mut blocks: Vec<String> = Vec::new();

        for config in configs {
            for port in config.ports() {
                push_unique(&mut denied, port);
            }

            let ifname = config.os_name();
            match config.mode() {
                RenderMode::Dhcp => blocks.push(format!("interface {}", ifname)),
                RenderMode::Manual => push_unique(&mut denied, &ifname),
                RenderMode::Static => {
                    let mut block = format!("interface {}", ifname);
                    if let Some(addr) = static_address(config) {
                        block.push_str(&format!("\nstatic ip_address={}", addr));
                    }
                    if let Some(gateway) = &config.gateway {
                        block.push_str(&format!("\nstatic routers={}", gateway));
                    }
                    blocks.push(block);
                }
            }
        }

        let mut conf = String::new();
        conf.push_str(GENERATED_HEADER);
        conf.push('\n');
        conf.push_str(&BASE_OPTIONS.join("\n"));
        conf.push('\n');

        if !denied.is_empty() {
            conf.push_str(&format!("\ndenyinterfaces {}\n", denied.join(" ")));
        }
        for block in blocks {
            conf.push('\n');
            conf.push_str(&block);
            conf.push('\n');
        }

        conf
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

#[async_trait]
impl ConfigBackend for DhcpcdBackend {
    fn id(&self) -> BackendId {
        BackendId::Dhcpcd
    }

    async fn configure(&self, configs: &[InterfaceConfig]) -> NetcfgResult<()> {
        let conf = self.generate_config(configs);
        write_atomic(&self.path, &conf).await?;
        info!("dhcpcd: wrote {}", self.path.display());
        Ok(())
    }
}
