//! Application order
//!
//! Two stable passes: VLANs after everything else, then bridges before
//! everything else. The passes stay separate; the second one decides the
//! outer class order and the first one's result survives inside each class.

use crate::intent::InterfaceConfig;

pub fn application_order(mut configs: Vec<InterfaceConfig>) -> Vec<InterfaceConfig> {
    configs.sort_by_key(|c| c.is_vlan());
    configs.sort_by_key(|c| !c.is_bridge());
    configs
}
