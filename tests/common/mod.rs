// Loopback fake bulb used by the network tests. Speaks the JSON datagram
// protocol: echoes the request id and keeps power/brightness/color state.
// Not every test binary touches every helper.
#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

use smartbulb_udp::DeviceAddress;

pub struct FakeBulb {
    pub address: DeviceAddress,
    pub datagrams_received: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl FakeBulb {
    pub fn received(&self) -> usize {
        self.datagrams_received.load(Ordering::SeqCst)
    }
}

impl Drop for FakeBulb {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Bind an ephemeral loopback port and answer the bulb protocol.
pub async fn spawn_fake_bulb() -> FakeBulb {
    spawn_fake_bulb_on(UdpSocket::bind("127.0.0.1:0").await.unwrap())
}

/// Same, on a caller-provided socket (for fixed-port discovery sweeps).
pub fn spawn_fake_bulb_on(socket: UdpSocket) -> FakeBulb {
    let port = socket.local_addr().unwrap().port();
    let datagrams_received = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&datagrams_received);

    let handle = tokio::spawn(async move {
        let mut power = false;
        let mut brightness = 0u8;
        let mut color = [255u8, 255, 255];
        let mut buf = [0u8; 2048];

        loop {
            let Ok((len, from)) = socket.recv_from(&mut buf).await else {
                return;
            };
            counter.fetch_add(1, Ordering::SeqCst);

            let Ok(request) = serde_json::from_slice::<Value>(&buf[..len]) else {
                continue;
            };
            let id = request["id"].clone();
            let reply = match request["type"].as_str() {
                Some("ping") => json!({"id": id, "type": "ack"}),
                Some("power_on") => {
                    power = true;
                    json!({"id": id, "type": "ack"})
                }
                Some("power_off") => {
                    power = false;
                    json!({"id": id, "type": "ack"})
                }
                Some("set_brightness") => {
                    brightness = request["brightness"].as_u64().unwrap_or(0) as u8;
                    json!({"id": id, "type": "ack"})
                }
                Some("set_color") => {
                    if let Some(channels) = request["color"].as_array() {
                        for (i, channel) in channels.iter().take(3).enumerate() {
                            color[i] = channel.as_u64().unwrap_or(0) as u8;
                        }
                    }
                    json!({"id": id, "type": "ack"})
                }
                Some("get_status") => json!({
                    "id": id,
                    "type": "status",
                    "power": power,
                    "brightness": brightness,
                    "color": color,
                }),
                _ => json!({"id": id, "type": "error", "reason": "unknown command"}),
            };
            let _ = socket
                .send_to(reply.to_string().as_bytes(), from)
                .await;
        }
    });

    FakeBulb {
        address: DeviceAddress::new("127.0.0.1", port).unwrap(),
        datagrams_received,
        handle,
    }
}
