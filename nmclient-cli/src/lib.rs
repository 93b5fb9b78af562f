pub mod commands;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nmclient::{ClientError, ConnectionLookup, NmClient, TimeoutConfig};

#[derive(Parser, Debug)]
#[command(name = "nmclient")]
#[command(about = "Bond setup, stable-id updates and Wi-Fi reporting through NetworkManager")]
#[command(version)]
struct Cli {
    /// Seconds to wait for activations and profile updates
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a bond with one port per interface and activate it
    CreateBond {
        /// Bond name, used as both profile id and interface name
        name: String,
        /// Member interfaces
        #[arg(required = true)]
        ifaces: Vec<String>,
    },
    /// Show the access point an interface is associated with
    WifiActiveAp {
        /// Wi-Fi interface name
        iface: String,
    },
    /// Increment the stable-id of a saved connection
    ///
    /// Takes `[id|uuid] <value>`; without a selector the value matches
    /// either the id or the UUID.
    UpdateStableId {
        #[arg(num_args = 1..=2, required = true, value_name = "[id|uuid] VALUE")]
        args: Vec<String>,
    },
    /// List every Wi-Fi device and the access points it sees
    ShowWifiNetworks,
}

fn timeouts(secs: Option<u64>) -> TimeoutConfig {
    match secs {
        Some(s) => TimeoutConfig::new()
            .with_activation_timeout(Duration::from_secs(s))
            .with_update_timeout(Duration::from_secs(s)),
        None => TimeoutConfig::default(),
    }
}

pub fn run() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().context("failed to print usage")?;
            return Ok(if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    let action = match Action::try_from(cli.command) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async {
        let nm = NmClient::with_config(timeouts(cli.timeout))
            .await
            .context("failed to connect to the system bus")?;

        match action {
            Action::CreateBond { name, ifaces } => commands::create_bond(&nm, &name, &ifaces).await,
            Action::WifiActiveAp(iface) => commands::wifi_active_ap(&nm, &iface).await,
            Action::UpdateStableId(lookup) => commands::update_stable_id(&nm, &lookup).await,
            Action::ShowWifiNetworks => commands::show_wifi_networks(&nm).await,
        }
    })
}

/// A parsed command whose arguments have been checked.
enum Action {
    CreateBond { name: String, ifaces: Vec<String> },
    WifiActiveAp(String),
    UpdateStableId(ConnectionLookup),
    ShowWifiNetworks,
}

impl TryFrom<Command> for Action {
    type Error = ClientError;

    fn try_from(command: Command) -> Result<Self, Self::Error> {
        Ok(match command {
            Command::CreateBond { name, ifaces } => Self::CreateBond { name, ifaces },
            Command::WifiActiveAp { iface } => Self::WifiActiveAp(iface),
            Command::UpdateStableId { args } => Self::UpdateStableId(commands::parse_lookup(&args)?),
            Command::ShowWifiNetworks => Self::ShowWifiNetworks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_bond() {
        let cli = Cli::try_parse_from(["nmclient", "create-bond", "bond0", "eth0", "eth1"]).unwrap();
        match cli.command {
            Command::CreateBond { name, ifaces } => {
                assert_eq!(name, "bond0");
                assert_eq!(ifaces, vec!["eth0", "eth1"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn create_bond_needs_a_port() {
        assert!(Cli::try_parse_from(["nmclient", "create-bond", "bond0"]).is_err());
    }

    #[test]
    fn update_stable_id_takes_at_most_two_args() {
        assert!(Cli::try_parse_from(["nmclient", "update-stable-id", "id", "a", "b"]).is_err());
        assert!(Cli::try_parse_from(["nmclient", "update-stable-id"]).is_err());
    }

    #[test]
    fn update_stable_id_rejects_unknown_selector() {
        let cli = Cli::try_parse_from(["nmclient", "update-stable-id", "name", "eth0"]).unwrap();
        assert!(matches!(
            Action::try_from(cli.command),
            Err(ClientError::Usage(_))
        ));
    }

    #[test]
    fn timeout_is_global() {
        let cli =
            Cli::try_parse_from(["nmclient", "wifi-active-ap", "wlan0", "--timeout", "5"]).unwrap();
        let cfg = timeouts(cli.timeout);
        assert_eq!(cfg.activation_timeout, Duration::from_secs(5));
        assert_eq!(cfg.update_timeout, Duration::from_secs(5));
    }
}
