//! Interface intents
//!
//! An intent is one desired-state record for a network interface. The caller
//! hands over the whole set at once; nothing here outlives a single
//! configure call.

use serde::{Deserialize, Serialize};

/// Addressing mode of an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Static,
    Dhcp,
    Manual,
}

/// One desired network interface state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceConfig {
    /// Base OS interface name
    pub interface: String,
    /// VLAN ID; presence marks a VLAN sub-interface of `interface`
    #[serde(default, alias = "vlan_id", skip_serializing_if = "Option::is_none")]
    pub vlanid: Option<u16>,
    /// Bridge member ports; presence marks a bridge
    #[serde(default, alias = "bridge_ports", skip_serializing_if = "Option::is_none")]
    pub bridge_ports: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual: Option<bool>,
    #[serde(default, alias = "ip_address", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// OS-visible name, filled in by the resolver
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub ifname: Option<String>,
}

impl InterfaceConfig {
    /// Static intent with address and prefix
    pub fn new_static(interface: &str, ip_address: &str, prefix: u8) -> Self {
        Self {
            interface: interface.to_string(),
            ip_address: Some(ip_address.to_string()),
            prefix: Some(prefix),
            ..Default::default()
        }
    }

    /// DHCP intent
    pub fn new_dhcp(interface: &str) -> Self {
        Self {
            interface: interface.to_string(),
            dhcp: Some(true),
            ..Default::default()
        }
    }

    /// Manual (link up, no address) intent
    pub fn new_manual(interface: &str) -> Self {
        Self {
            interface: interface.to_string(),
            manual: Some(true),
            ..Default::default()
        }
    }

    pub fn with_vlan(mut self, vlanid: u16) -> Self {
        self.vlanid = Some(vlanid);
        self
    }

    pub fn with_bridge_ports<I, S>(mut self, ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bridge_ports = Some(ports.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_gateway(mut self, gateway: &str) -> Self {
        self.gateway = Some(gateway.to_string());
        self
    }

    pub fn is_vlan(&self) -> bool {
        self.vlanid.is_some()
    }

    pub fn is_bridge(&self) -> bool {
        self.bridge_ports.is_some()
    }

    /// Mode precedence: dhcp, then manual, then static
    pub fn mode(&self) -> RenderMode {
        if self.dhcp.unwrap_or(false) {
            RenderMode::Dhcp
        } else if self.manual.unwrap_or(false) {
            RenderMode::Manual
        } else {
            RenderMode::Static
        }
    }

    /// Untruncated `<interface>.<vlanid>` for VLANs, the interface otherwise
    pub fn natural_name(&self) -> String {
        match self.vlanid {
            Some(id) => format!("{}.{}", self.interface, id),
            None => self.interface.clone(),
        }
    }

    /// Resolved OS name, or the natural name before resolution
    pub fn os_name(&self) -> String {
        self.ifname.clone().unwrap_or_else(|| self.natural_name())
    }

    pub fn ports(&self) -> &[String] {
        self.bridge_ports.as_deref().unwrap_or(&[])
    }
}

/// A full intent set; a lone object normalizes into a one-element set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IntentInput")]
pub struct IntentSet(pub Vec<InterfaceConfig>);

#[derive(Deserialize)]
#[serde(untagged)]
enum IntentInput {
    Many(Vec<InterfaceConfig>),
    One(InterfaceConfig),
}

impl From<IntentInput> for IntentSet {
    fn from(input: IntentInput) -> Self {
        match input {
            IntentInput::Many(configs) => IntentSet(configs),
            IntentInput::One(config) => IntentSet(vec![config]),
        }
    }
}

impl IntentSet {
    pub fn into_inner(self) -> Vec<InterfaceConfig> {
        self.0
    }

    pub fn from_json(json: &str) -> crate::NetcfgResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<InterfaceConfig> for IntentSet {
    fn from(config: InterfaceConfig) -> Self {
        IntentSet(vec![config])
    }
}

impl From<Vec<InterfaceConfig>> for IntentSet {
    fn from(configs: Vec<InterfaceConfig>) -> Self {
        IntentSet(configs)
    }
}

impl From<&[InterfaceConfig]> for IntentSet {
    fn from(configs: &[InterfaceConfig]) -> Self {
        IntentSet(configs.to_vec())
    }
}
