//! End-to-end tests for the configure pipeline
//!
//! Every backend writes into a temporary directory; nothing touches /etc.

use libnetcfg::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config_in(dir: &Path) -> NetcfgConfig {
    let mut config = NetcfgConfig::default();
    config.paths.interfaces_dir = dir.join("interfaces.d");
    config.paths.dhcpcd_conf = dir.join("dhcpcd.conf");
    config.paths.netplan_file = dir.join("netplan/01-netcfg.yaml");
    config
}

fn sample_intents() -> Vec<InterfaceConfig> {
    vec![
        InterfaceConfig::new_dhcp("eth0").with_vlan(10),
        InterfaceConfig::new_static("eth0", "10.0.0.5", 24).with_gateway("10.0.0.1"),
        InterfaceConfig::new_manual("br0").with_bridge_ports(["eth1", "eth2"]),
        InterfaceConfig::new_dhcp("enp0s31f6xyz").with_vlan(100),
    ]
}

#[tokio::test]
async fn test_all_backends_write_their_files() {
    let dir = TempDir::new().unwrap();
    let configurator = Configurator::new(&config_in(dir.path()));

    configurator.configure_default(sample_intents()).await.unwrap();

    let eth0 = fs::read_to_string(dir.path().join("interfaces.d/eth0")).unwrap();
    assert!(eth0.starts_with(GENERATED_HEADER));
    assert!(eth0.contains("  address 10.0.0.5/24\n  gateway 10.0.0.1"));
    assert!(eth0.contains("iface eth0.10 inet dhcp\n  vlan-raw-device eth0"));
    // Plain stanza comes before the VLAN built on it
    assert!(eth0.find("iface eth0 inet static").unwrap() < eth0.find("iface eth0.10").unwrap());

    let br0 = fs::read_to_string(dir.path().join("interfaces.d/br0")).unwrap();
    assert!(br0.ends_with("iface br0 inet manual\n  bridge_ports eth1 eth2"));

    let long = fs::read_to_string(dir.path().join("interfaces.d/enp0s31f6xyz")).unwrap();
    assert!(long.contains("auto np0s31f6xyz.100\n"));
    assert!(long.contains("vlan-raw-device enp0s31f6xyz"));

    let dhcpcd = fs::read_to_string(dir.path().join("dhcpcd.conf")).unwrap();
    assert!(dhcpcd.contains("denyinterfaces eth1 eth2 br0"));
    assert!(dhcpcd.contains("interface eth0\nstatic ip_address=10.0.0.5/24\nstatic routers=10.0.0.1"));

    let netplan = fs::read_to_string(dir.path().join("netplan/01-netcfg.yaml")).unwrap();
    assert!(netplan.contains("np0s31f6xyz.100:"));
    assert!(netplan.contains("bridges:"));
}

#[tokio::test]
async fn test_single_object_input() {
    let dir = TempDir::new().unwrap();
    let configurator = Configurator::new(&config_in(dir.path()));

    let set = IntentSet::from_json(
        r#"{"interface": "eth0", "ipAddress": "10.0.0.5", "prefix": 24, "gateway": "10.0.0.1"}"#,
    ).unwrap();
    configurator.configure(set, &[BackendId::InterfacesD]).await.unwrap();

    let eth0 = fs::read_to_string(dir.path().join("interfaces.d/eth0")).unwrap();
    assert!(eth0.contains("address 10.0.0.5/24"));
    assert!(!eth0.contains("vlan-raw-device"));
    assert!(!dir.path().join("dhcpcd.conf").exists());
    assert!(!dir.path().join("netplan").exists());
}

#[tokio::test]
async fn test_conflict_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let configurator = Configurator::new(&config_in(dir.path()));

    let intents = vec![
        InterfaceConfig::new_manual("br0").with_bridge_ports(["eth1"]),
        InterfaceConfig::new_manual("br1").with_bridge_ports(["eth1"]),
    ];
    let err = configurator.configure_default(intents).await.unwrap_err();

    assert!(matches!(err, NetcfgError::PortDoubleBridged { .. }));
    assert!(err.is_validation());
    assert!(!dir.path().join("interfaces.d").exists());
    assert!(!dir.path().join("dhcpcd.conf").exists());
}

#[tokio::test]
async fn test_failing_backend_does_not_stop_the_others() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());

    // A regular file where the netplan directory should be
    fs::write(dir.path().join("blocker"), "").unwrap();
    config.paths.netplan_file = dir.path().join("blocker/01-netcfg.yaml");

    let configurator = Configurator::new(&config);
    let err = configurator.configure_default(sample_intents()).await.unwrap_err();

    match err {
        NetcfgError::BackendFailures(failures) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].backend, BackendId::Netplan);
        }
        other => panic!("expected BackendFailures, got {:?}", other),
    }

    assert!(dir.path().join("interfaces.d/eth0").exists());
    assert!(dir.path().join("interfaces.d/br0").exists());
    assert!(dir.path().join("dhcpcd.conf").exists());
}

#[test]
fn test_prepare_orders_bridges_plain_vlans() {
    let ordered = prepare(sample_intents()).unwrap();
    let names: Vec<String> = ordered.iter().map(|c| c.os_name()).collect();
    assert_eq!(names, vec!["br0", "eth0", "eth0.10", "np0s31f6xyz.100"]);
    assert!(ordered.iter().all(|c| c.ifname.as_ref().map_or(false, |n| n.len() <= MAX_IFNAME_LEN)));
}

#[tokio::test]
async fn test_vlan_name_clash_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let configurator = Configurator::new(&config_in(dir.path()));

    let intents = vec![
        InterfaceConfig::new_static("eth0.10", "10.0.0.5", 24),
        InterfaceConfig::new_dhcp("eth0").with_vlan(10),
    ];
    let err = configurator.configure_default(intents).await.unwrap_err();

    assert!(matches!(err, NetcfgError::IfnameCollision { .. }));
    assert!(!dir.path().join("interfaces.d").exists());
    assert!(!dir.path().join("netplan").exists());
}

#[tokio::test]
async fn test_vlan_only_netplan_declares_its_link() {
    let dir = TempDir::new().unwrap();
    let configurator = Configurator::new(&config_in(dir.path()));

    configurator
        .configure(InterfaceConfig::new_dhcp("eth0").with_vlan(10), &[BackendId::Netplan])
        .await
        .unwrap();

    let yaml = fs::read_to_string(dir.path().join("netplan/01-netcfg.yaml")).unwrap();
    assert!(yaml.contains("ethernets:\n    eth0:"));
    assert!(yaml.contains("link: eth0"));
}
