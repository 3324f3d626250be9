//! interfaces.d backend

use super::{write_atomic, BackendId, ConfigBackend};
use crate::error::NetcfgResult;
use crate::intent::InterfaceConfig;
use crate::render::render_file;
use async_trait::async_trait;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes one file per base interface into an interfaces.d directory
pub struct InterfacesDBackend {
    dir: PathBuf,
}

impl InterfacesDBackend {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Group intents by base interface, keeping application order
    ///
    /// A VLAN shares its base interface's file, so every stanza for that
    /// interface is written in one go.
    pub fn plan_files<'a>(&self, configs: &'a [InterfaceConfig]) -> Vec<(PathBuf, Vec<&'a InterfaceConfig>)> {
        let mut files: Vec<(PathBuf, Vec<&InterfaceConfig>)> = Vec::new();

        for config in configs {
            let path = self.dir.join(&config.interface);
            match files.iter_mut().find(|(p, _)| *p == path) {
                Some((_, group)) => group.push(config),
                None => files.push((path, vec![config])),
            }
        }

        files
    }
}

#[async_trait]
impl ConfigBackend for InterfacesDBackend {
    fn id(&self) -> BackendId {
        BackendId::InterfacesD
    }

    async fn configure(&self, configs: &[InterfaceConfig]) -> NetcfgResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let writes = self.plan_files(configs).into_iter().map(|(path, group)| async move {
            let contents = render_file(group);
            write_atomic(&path, &contents).await?;
            debug!("Wrote {}", path.display());
            NetcfgResult::Ok(())
        });
        let written = try_join_all(writes).await?;

        info!("interfaces.d: wrote {} file(s) to {}", written.len(), self.dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::GENERATED_HEADER;
    use tempfile::TempDir;

    #[test]
    fn test_vlans_share_the_base_file() {
        let backend = InterfacesDBackend::new(PathBuf::from("/etc/network/interfaces.d"));
        let configs = vec![
            InterfaceConfig::new_manual("br0").with_bridge_ports(["eth1"]),
            InterfaceConfig::new_static("eth0", "10.0.0.5", 24),
            InterfaceConfig::new_dhcp("eth0").with_vlan(10),
        ];

        let plan = backend.plan_files(&configs);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].0, PathBuf::from("/etc/network/interfaces.d/br0"));
        assert_eq!(plan[1].0, PathBuf::from("/etc/network/interfaces.d/eth0"));
        assert_eq!(plan[1].1.len(), 2);
    }

    #[tokio::test]
    async fn test_configure_writes_files() {
        let dir = TempDir::new().unwrap();
        let backend = InterfacesDBackend::new(dir.path().join("interfaces.d"));

        let mut vlan = InterfaceConfig::new_dhcp("eth0").with_vlan(10);
        vlan.ifname = Some("eth0.10".to_string());
        let configs = vec![
            InterfaceConfig::new_static("eth0", "10.0.0.5", 24).with_gateway("10.0.0.1"),
            vlan,
        ];

        backend.configure(&configs).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("interfaces.d/eth0")).unwrap();
        assert_eq!(
            content,
            format!(
                "{}\nauto eth0\niface eth0 inet static\n  address 10.0.0.5/24\n  gateway 10.0.0.1\n\n\
                 auto eth0.10\nallow-hotplug eth0.10\niface eth0.10 inet dhcp\n  vlan-raw-device eth0",
                GENERATED_HEADER
            )
        );
    }
}
