//! netcfg - Network Interface Configuration Library
//!
//! Turns a declarative list of interface intents (static, DHCP or manual
//! addressing, VLAN sub-interfaces, bridges) into configuration for:
//! - interfaces.d (ifupdown text stanzas)
//! - dhcpcd (dhcpcd.conf)
//! - netplan (YAML)
//!
//! and then reconciles the running network stack.

pub mod error;
pub mod config;
pub mod intent;
pub mod validation;
pub mod resolver;
pub mod order;
pub mod render;
pub mod backend;
pub mod dispatch;
pub mod reconcile;

// Re-export commonly used types
pub use error::{BackendFailure, NetcfgError, NetcfgResult};
pub use config::NetcfgConfig;
pub use intent::{IntentSet, InterfaceConfig, RenderMode};
pub use validation::validate_intents;
pub use resolver::{resolve_ifname, resolve_names, MAX_IFNAME_LEN};
pub use order::application_order;
pub use render::{render, render_file, GENERATED_HEADER};
pub use backend::{BackendId, ConfigBackend, DhcpcdBackend, InterfacesDBackend, NetplanBackend};
pub use dispatch::{prepare, BackendRegistry, Configurator};
pub use reconcile::{CommandRunner, ServiceReconciler, SystemRunner};
