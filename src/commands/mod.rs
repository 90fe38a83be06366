// commands/mod.rs
//
// Wire protocol: one JSON object per UDP datagram, tagged with `type`
// (snake_case); replies echo the request `id`.
//   {"id":"3f2a9c1d","type":"set_brightness","brightness":50}

use serde::{Deserialize, Serialize};

use crate::error::BulbError;
use crate::models::DeviceStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BulbCommand {
    PowerOn,
    PowerOff,
    SetBrightness { brightness: u8 },
    SetColor { color: [u8; 3] },
    GetStatus,
    Ping,
}

impl BulbCommand {
    /// Brightness is percent; out-of-range values are rejected before any
    /// encoding or transmission, never clamped.
    pub fn set_brightness(brightness: u8) -> Result<Self, BulbError> {
        if brightness > 100 {
            return Err(BulbError::Validation(format!(
                "brightness must be 0-100, got {brightness}"
            )));
        }
        Ok(Self::SetBrightness { brightness })
    }

    pub fn set_color(r: u8, g: u8, b: u8) -> Self {
        Self::SetColor { color: [r, g, b] }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BulbResponse {
    Ack,
    Status(DeviceStatus),
    Error { reason: String },
    /// Produced only by the transport when no reply arrived in time; a peer
    /// datagram claiming this tag decodes as malformed.
    Timeout,
}

impl BulbResponse {
    /// A reply that proves a live bulb is at the address.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ack | Self::Status(_))
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    id: &'a str,
    #[serde(flatten)]
    command: &'a BulbCommand,
}

// What a bulb may legitimately put on the wire. Timeout is not a wire tag.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireResponse {
    Ack,
    Status(DeviceStatus),
    Error { reason: String },
}

impl From<WireResponse> for BulbResponse {
    fn from(wire: WireResponse) -> Self {
        match wire {
            WireResponse::Ack => Self::Ack,
            WireResponse::Status(status) => Self::Status(status),
            WireResponse::Error { reason } => Self::Error { reason },
        }
    }
}

#[derive(Deserialize)]
struct WireReply {
    #[serde(default)]
    id: Option<String>,
    #[serde(flatten)]
    response: WireResponse,
}

/// Deterministic, side-effect-free encoding of one request datagram.
pub fn encode(command: &BulbCommand, id: &str) -> Result<Vec<u8>, BulbError> {
    serde_json::to_vec(&WireRequest { id, command })
        .map_err(|e| BulbError::Protocol(format!("encode failed: {e}")))
}

/// Total over all byte inputs: malformed or truncated datagrams decode to
/// `Error { reason: "malformed" }` rather than failing.
pub fn decode(buf: &[u8]) -> (Option<String>, BulbResponse) {
    match serde_json::from_slice::<WireReply>(buf) {
        Ok(reply) => (reply.id, reply.response.into()),
        Err(_) => (
            None,
            BulbResponse::Error {
                reason: "malformed".to_string(),
            },
        ),
    }
}

/// Parse `#RRGGBB` (leading `#` optional) into RGB channels.
pub fn parse_hex_color(hex: &str) -> Result<[u8; 3], BulbError> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BulbError::Validation(format!("invalid hex color: {hex}")));
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    Ok([
        channel(0).map_err(|e| BulbError::Validation(e.to_string()))?,
        channel(2).map_err(|e| BulbError::Validation(e.to_string()))?,
        channel(4).map_err(|e| BulbError::Validation(e.to_string()))?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(command: BulbCommand) {
        let bytes = encode(&command, "abcd1234").unwrap();
        // Requests and replies share the tagged layout, so a request decodes
        // back as-is when the variant exists on both sides.
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], "abcd1234");
        let decoded: BulbCommand = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, command);
    }

    #[test]
    fn commands_roundtrip_through_wire() {
        roundtrip(BulbCommand::PowerOn);
        roundtrip(BulbCommand::PowerOff);
        roundtrip(BulbCommand::GetStatus);
        roundtrip(BulbCommand::Ping);
        for brightness in [0u8, 1, 50, 99, 100] {
            roundtrip(BulbCommand::set_brightness(brightness).unwrap());
        }
        for color in [[0, 0, 0], [255, 255, 255], [12, 200, 7]] {
            roundtrip(BulbCommand::SetColor { color });
        }
    }

    #[test]
    fn brightness_out_of_range_is_rejected() {
        for brightness in [101u8, 150, 255] {
            assert!(matches!(
                BulbCommand::set_brightness(brightness),
                Err(BulbError::Validation(_))
            ));
        }
    }

    #[test]
    fn decode_is_total_over_garbage() {
        for bytes in [
            &b""[..],
            b"\x00\x01\x02",
            b"{\"type\":",
            b"{\"type\":\"no_such_variant\"}",
            b"not json at all",
        ] {
            let (id, response) = decode(bytes);
            assert!(id.is_none());
            assert_eq!(
                response,
                BulbResponse::Error {
                    reason: "malformed".into()
                }
            );
        }
    }

    #[test]
    fn timeout_tag_is_not_a_wire_response() {
        // Only the transport may produce Timeout; a peer claiming the tag
        // must not impersonate a lost reply.
        let (id, response) = decode(br#"{"id":"aa","type":"timeout"}"#);
        assert!(id.is_none());
        assert_eq!(
            response,
            BulbResponse::Error {
                reason: "malformed".into()
            }
        );
    }

    #[test]
    fn decode_status_reply() {
        let bytes =
            br#"{"id":"aa","type":"status","power":true,"brightness":75,"color":[255,0,0]}"#;
        let (id, response) = decode(bytes);
        assert_eq!(id.as_deref(), Some("aa"));
        assert_eq!(
            response,
            BulbResponse::Status(DeviceStatus {
                power: true,
                brightness: 75,
                color: [255, 0, 0],
            })
        );
    }

    #[test]
    fn hex_color_parsing() {
        assert_eq!(parse_hex_color("#FF0000").unwrap(), [255, 0, 0]);
        assert_eq!(parse_hex_color("00ff00").unwrap(), [0, 255, 0]);
        assert!(parse_hex_color("#F00").is_err());
        assert!(parse_hex_color("zzzzzz").is_err());
    }
}
