//! The four subcommands. Each prints its report to stdout and returns the
//! process exit code.

use std::process::ExitCode;

use anyhow::Context;
use log::debug;
use nmclient::builders::bond::port_id;
use nmclient::{
    AccessPointInfo, ActivationOutcome, ClientError, ConnectionLookup, DeviceInfo, NmClient,
};

/// Parses `[id|uuid] <value>`.
pub fn parse_lookup(args: &[String]) -> Result<ConnectionLookup, ClientError> {
    match args {
        [value] => Ok(ConnectionLookup::Any(value.clone())),
        [kind, value] if kind == "id" => Ok(ConnectionLookup::Id(value.clone())),
        [kind, value] if kind == "uuid" => Ok(ConnectionLookup::Uuid(value.clone())),
        [kind, _] => Err(ClientError::Usage(format!(
            "expected \"id\" or \"uuid\", got \"{kind}\""
        ))),
        _ => Err(ClientError::Usage("expected [id|uuid] <value>".into())),
    }
}

pub async fn create_bond(nm: &NmClient, name: &str, ifaces: &[String]) -> anyhow::Result<ExitCode> {
    let setup = nm
        .create_bond(name, ifaces)
        .await
        .with_context(|| format!("failed to set up bond {name}"))?;

    println!("Created bond connection: {name} ({})", setup.master);
    for (iface, port) in ifaces.iter().zip(&setup.ports) {
        println!("Created slave connection: {} ({port})", port_id(name, iface));
    }
    println!("Activating bond: {name} ({})", setup.activation);

    match nm.await_state(&setup.activation).await {
        Ok(ActivationOutcome::Connected) => {
            println!("Successfully connected");
            Ok(ExitCode::SUCCESS)
        }
        Ok(ActivationOutcome::Failed(state)) => {
            println!("Bond activation failed ({state})");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).context("failed while waiting for the bond to activate"),
    }
}

pub async fn wifi_active_ap(nm: &NmClient, iface: &str) -> anyhow::Result<ExitCode> {
    let device = nm.resolve_device(iface).await?;

    match nm.get_active_access_point(&device).await? {
        Some(ap) => println!("{iface} is associated to '{}' ({})", ap.ssid(), ap.bssid),
        None => println!("{iface} is not currently associated"),
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn update_stable_id(nm: &NmClient, lookup: &ConnectionLookup) -> anyhow::Result<ExitCode> {
    match nm.bump_stable_id(lookup).await {
        Ok(bump) => {
            println!(
                "update connection \"{}\" ({}) succeeded: {}",
                bump.id, bump.uuid, bump.outcome
            );
            println!("set stable-id to \"{}\"", bump.stable_id);
            Ok(ExitCode::SUCCESS)
        }
        Err(ClientError::NotFound(_)) => {
            println!("could not find a connection {lookup}");
            Ok(ExitCode::FAILURE)
        }
        Err(ClientError::MissingSetting(_)) => {
            println!("connection {lookup} has no [connection] setting");
            Ok(ExitCode::FAILURE)
        }
        Err(e @ ClientError::NoStableId(_)) => {
            println!("{e}");
            Ok(ExitCode::FAILURE)
        }
        Err(ClientError::Update(msg)) => {
            println!("update connection {lookup} failed: {msg}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).context("failed to update stable-id"),
    }
}

fn device_header(info: &DeviceInfo) -> String {
    let active = info
        .active_access_point
        .as_ref()
        .map(AccessPointInfo::ssid)
        .unwrap_or_else(|| "None".to_string());

    format!(
        "Device: {} | Driver: {} | Active AP: {active}",
        info.interface,
        info.driver.as_deref().unwrap_or("None")
    )
}

fn print_access_point(ap: &AccessPointInfo) {
    println!("SSID:      {}", ap.ssid());
    println!("BSSID:     {}", ap.bssid);
    println!("Frequency: {}", ap.frequency);
    println!("Channel:   {}", ap.channel().unwrap_or(0));
    println!("Mode:      {}", ap.mode_label());
    println!("Flags:     {}", ap.flags_label());
    println!("WPA flags: {}", ap.wpa_flags.labels());
    println!("RSN flags: {}", ap.rsn_flags.labels());
    println!("Security:  {}", ap.security());
    println!("Strength:  {} {}%", ap.bars(), ap.strength);
    println!();
}

pub async fn show_wifi_networks(nm: &NmClient) -> anyhow::Result<ExitCode> {
    for device in nm.wifi_devices().await? {
        let info = nm.device_info(&device).await?;
        let header = device_header(&info);
        println!("{header}");
        println!("{}", "=".repeat(header.chars().count()));

        let aps = nm.access_points(&device).await?;
        debug!("{} sees {} access points", info.interface, aps.len());
        for ap in &aps {
            print_access_point(ap);
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lookup_without_selector_matches_either() {
        assert_eq!(
            parse_lookup(&args(&["eth0"])).unwrap(),
            ConnectionLookup::Any("eth0".into())
        );
    }

    #[test]
    fn lookup_with_selector() {
        assert_eq!(
            parse_lookup(&args(&["id", "eth0"])).unwrap(),
            ConnectionLookup::Id("eth0".into())
        );
        assert_eq!(
            parse_lookup(&args(&["uuid", "1234"])).unwrap(),
            ConnectionLookup::Uuid("1234".into())
        );
    }

    #[test]
    fn lookup_rejects_bad_selector() {
        assert!(matches!(
            parse_lookup(&args(&["name", "eth0"])),
            Err(ClientError::Usage(_))
        ));
        assert!(parse_lookup(&[]).is_err());
    }
}
