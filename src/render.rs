//! interfaces.d template rendering
//!
//! Each intent maps to one stanza. The stanza is built line by line from the
//! intent's mode and fields instead of substituting into a shared template.

use crate::intent::{InterfaceConfig, RenderMode};

/// Header line written at the top of every generated file
pub const GENERATED_HEADER: &str = "# This file is auto generated by netcfg. Do not edit manually!";

/// Line builder for one interfaces.d stanza
#[derive(Debug, Default)]
pub struct StanzaBuilder {
    lines: Vec<String>,
}

impl StanzaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level line (`auto`, `iface`, ...)
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Indented option line
    pub fn option(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.lines.push(format!("  {} {}", key, value.as_ref()));
        self
    }

    pub fn option_if(self, key: &str, value: Option<impl AsRef<str>>) -> Self {
        match value {
            Some(v) => self.option(key, v),
            None => self,
        }
    }

    pub fn build(self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

/// Render one intent into an interfaces.d stanza
///
/// A static intent without `ip_address` gets no `address` line. That only
/// suits a bridge whose ports carry the link; ifupdown rejects such a stanza
/// on a plain interface.
pub fn render(config: &InterfaceConfig) -> String {
    let ifname = config.os_name();
    let raw_device = config.vlanid.map(|_| config.interface.as_str());

    let builder = match config.mode() {
        RenderMode::Static => StanzaBuilder::new()
            .line(format!("auto {}", ifname))
            .line(format!("iface {} inet static", ifname))
            .option_if("address", static_address(config))
            .option_if("gateway", config.gateway.as_deref())
            .option_if("vlan-raw-device", raw_device),
        RenderMode::Dhcp => StanzaBuilder::new()
            .line(format!("auto {}", ifname))
            .line(format!("allow-hotplug {}", ifname))
            .line(format!("iface {} inet dhcp", ifname))
            .option_if("vlan-raw-device", raw_device),
        RenderMode::Manual => StanzaBuilder::new()
            .line(format!("iface {} inet manual", ifname))
            .option_if("vlan-raw-device", raw_device),
    };

    builder
        .option_if("bridge_ports", config.bridge_ports.as_ref().map(|p| p.join(" ")))
        .build()
}

/// `<ip>/<prefix>`, or the bare address when no prefix was given
pub(crate) fn static_address(config: &InterfaceConfig) -> Option<String> {
    let addr = config.ip_address.as_deref()?;
    Some(match config.prefix {
        Some(prefix) => format!("{}/{}", addr, prefix),
        None => addr.to_string(),
    })
}

/// Render a whole interfaces.d file for the given stanzas
pub fn render_file<'a, I>(configs: I) -> String
where
    I: IntoIterator<Item = &'a InterfaceConfig>,
{
    let stanzas: Vec<String> = configs.into_iter().map(render).collect();
    format!("{}\n{}", GENERATED_HEADER, stanzas.join("\n\n"))
}
