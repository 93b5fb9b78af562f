/// Example demonstrating custom timeout configuration.
///
/// Bonds using LACP can take a while to negotiate with the switch, so this
/// waits up to a minute for the activation instead of the default 30 seconds.
use nmclient::{ActivationOutcome, NmClient, TimeoutConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> nmclient::Result<()> {
    let config = TimeoutConfig::new()
        .with_activation_timeout(Duration::from_secs(60))
        .with_update_timeout(Duration::from_secs(10));

    let nm = NmClient::with_config(config).await?;

    println!("NmClient configured with custom timeouts:");
    println!(
        "  Activation timeout: {:?}",
        nm.timeout_config().activation_timeout
    );
    println!("  Update timeout: {:?}", nm.timeout_config().update_timeout);

    let ports = vec!["eth0".to_string(), "eth1".to_string()];
    let setup = nm.create_bond("bond0", &ports).await?;
    println!("\nActivating bond0 ({})...", setup.activation);

    match nm.await_state(&setup.activation).await? {
        ActivationOutcome::Connected => println!("bond0 is up"),
        ActivationOutcome::Failed(state) => println!("bond0 failed: {state}"),
    }

    Ok(())
}
