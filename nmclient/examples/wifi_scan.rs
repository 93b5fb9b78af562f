use nmclient::NmClient;

#[tokio::main]
async fn main() -> nmclient::Result<()> {
    let nm = NmClient::new().await?;

    for device in nm.wifi_devices().await? {
        let info = nm.device_info(&device).await?;
        println!("{}:", info.interface);

        for ap in nm.access_points(&device).await? {
            println!(
                "  {:30} {:>3} {} {}",
                ap.ssid(),
                ap.channel().unwrap_or(0),
                ap.bars(),
                ap.security()
            );
        }
    }

    Ok(())
}
