//! Integration tests for the netcfg binary
//!
//! Only commands that never touch system files are exercised here.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn netcfg() -> Command {
    Command::cargo_bin("netcfg").unwrap()
}

#[test]
fn test_help_command() {
    netcfg()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn test_render_prints_ordered_stanzas() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("intents.json");
    fs::write(
        &file,
        r#"[
            {"interface": "eth0", "vlanid": 10, "dhcp": true},
            {"interface": "br0", "bridgePorts": ["eth0", "eth1"], "manual": true}
        ]"#,
    ).unwrap();

    netcfg()
        .arg("render")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("iface br0 inet manual\n  bridge_ports eth0 eth1\n\nauto eth0.10"))
        .stdout(predicate::str::contains("vlan-raw-device eth0"));
}

#[test]
fn test_render_rejects_duplicate_vlan() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("intents.json");
    fs::write(
        &file,
        r#"[{"interface": "eth0", "vlanid": 10}, {"interface": "eth0", "vlanid": 10, "dhcp": true}]"#,
    ).unwrap();

    netcfg()
        .arg("render")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("same VLAN ID 10 on interface eth0"));
}

#[test]
fn test_apply_with_custom_paths() {
    let dir = TempDir::new().unwrap();
    let intents = dir.path().join("intents.json");
    fs::write(&intents, r#"{"interface": "eth0", "ipAddress": "10.0.0.5", "prefix": 24}"#).unwrap();

    let config = dir.path().join("netcfg.toml");
    fs::write(
        &config,
        format!(
            "[paths]\ninterfaces_dir = {:?}\ndhcpcd_conf = {:?}\nnetplan_file = {:?}\n",
            dir.path().join("interfaces.d"),
            dir.path().join("dhcpcd.conf"),
            dir.path().join("netplan.yaml"),
        ),
    ).unwrap();

    netcfg()
        .arg("--config")
        .arg(&config)
        .arg("apply")
        .arg(&intents)
        .arg("--backend")
        .arg("interfaces_d")
        .assert()
        .success();

    let eth0 = fs::read_to_string(dir.path().join("interfaces.d/eth0")).unwrap();
    assert!(eth0.contains("address 10.0.0.5/24"));
    assert!(!dir.path().join("dhcpcd.conf").exists());
}

#[test]
fn test_unknown_backend_is_rejected() {
    netcfg()
        .args(["apply", "intents.json", "--backend", "networkd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown backend"));
}
