// main.rs
//
// Line console over the bulb control core, driven by the voice text parser.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use smartbulb_udp::config::Settings;
use smartbulb_udp::{
    BulbController, BulbResponse, DeviceAddress, DiscoveryOptions, ScanRange, UdpTransport, voice,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Settings::new()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    if settings.metrics.enabled {
        smartbulb_udp::metrics::setup_metrics(settings.metrics.port)?;
    }

    let controller = BulbController::new(
        Arc::new(UdpTransport::new()),
        settings.bulb.timeout(),
    );
    let default_address = DeviceAddress::new(settings.bulb.host.clone(), settings.bulb.port)?;
    let bulb = controller.client(default_address.clone());

    info!(%default_address, "bulb console ready");
    println!("Commands: turn on / turn off / set brightness to N / set color to red /");
    println!("          status / ping / discover / devices / quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            break;
        }

        if text.contains("discover") || text.contains("find") {
            let range = ScanRange::subnet(
                &settings.discovery.subnet,
                settings.discovery.port_start..=settings.discovery.port_end,
            );
            let opts = DiscoveryOptions {
                probe_timeout: settings.discovery.probe_timeout(),
                overall_budget: settings.discovery.budget(),
                fan_out: settings.discovery.fan_out,
            };
            let found = controller.discover(&range, &opts).await;
            if found.is_empty() {
                println!("No smart bulbs found on the network");
            } else {
                for address in found {
                    println!("Found bulb at {address}");
                }
            }
            continue;
        }

        if text.contains("devices") {
            let devices = controller.known_devices();
            if devices.is_empty() {
                println!("No devices observed yet");
            }
            for record in devices {
                println!(
                    "{} last seen {} status {:?}",
                    record.address, record.last_seen, record.last_status
                );
            }
            continue;
        }

        let Some(command) = voice::parse_command(text) else {
            println!("Didn't understand that. Try 'turn on lights' or 'set brightness to 50'.");
            continue;
        };

        match bulb.send(&command).await {
            Ok(BulbResponse::Ack) => println!("OK"),
            Ok(BulbResponse::Status(status)) => println!(
                "Bulb is {} at {}% brightness, color {:?}",
                if status.power { "on" } else { "off" },
                status.brightness,
                status.color
            ),
            Ok(BulbResponse::Error { reason }) => println!("Bulb error: {reason}"),
            Ok(BulbResponse::Timeout) => println!("No reply from {default_address}"),
            Err(e) => println!("Failed: {e}"),
        }
    }

    Ok(())
}
