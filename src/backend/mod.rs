//! Configuration backends
//!
//! Each backend persists the full validated, ordered intent set in its own
//! format and owns a disjoint set of files:
//! - interfaces_d: one `/etc/network/interfaces.d/<interface>` file per base interface
//! - dhcpcd: `/etc/dhcpcd.conf`
//! - netplan: a single netplan YAML file

pub mod dhcpcd;
pub mod interfaces_d;
pub mod netplan;

pub use dhcpcd::DhcpcdBackend;
pub use interfaces_d::InterfacesDBackend;
pub use netplan::NetplanBackend;

use crate::error::{NetcfgError, NetcfgResult};
use crate::intent::InterfaceConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Backend identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendId {
    #[serde(alias = "dhcpd")]
    Dhcpcd,
    InterfacesD,
    Netplan,
}

impl BackendId {
    pub const ALL: [BackendId; 3] = [BackendId::Dhcpcd, BackendId::InterfacesD, BackendId::Netplan];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Dhcpcd => "dhcpcd",
            BackendId::InterfacesD => "interfaces_d",
            BackendId::Netplan => "netplan",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dhcpcd" | "dhcpd" => Ok(BackendId::Dhcpcd),
            "interfaces_d" | "interfaces.d" => Ok(BackendId::InterfacesD),
            "netplan" => Ok(BackendId::Netplan),
            other => Err(format!(
                "unknown backend '{}' (expected dhcpcd, interfaces_d or netplan)",
                other
            )),
        }
    }
}

/// Common interface that every configuration backend implements
#[async_trait]
pub trait ConfigBackend: Send + Sync {
    /// Which backend this is
    fn id(&self) -> BackendId;

    /// Render and persist the whole intent set
    ///
    /// Intents arrive validated, name-resolved and in application order. A
    /// backend picks out what is relevant to it and either writes everything
    /// or fails.
    async fn configure(&self, configs: &[InterfaceConfig]) -> NetcfgResult<()>;
}

/// Write `contents` next to `path` and rename it into place
pub(crate) async fn write_atomic(path: &Path, contents: &str) -> NetcfgResult<()> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let file_name = path.file_name()
        .ok_or_else(|| NetcfgError::InvalidParameter(format!("invalid path {}", path.display())))?;
    let tmp = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));

    fs::create_dir_all(dir).await?;
    {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(contents.as_bytes()).await?;
        file.sync_all().await?;
    }
    fs::rename(&tmp, path).await?;

    Ok(())
}
