// voice/mod.rs
//
// Pure mapping from free text to a bulb command. No networking, no speech
// I/O.

use crate::commands::BulbCommand;

const LEVEL_WORDS: &[(&str, u8)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
    ("medium", 50),
    ("bright", 90),
    ("high", 75),
    ("low", 25),
    ("dim", 20),
    ("max", 100),
];

const COLOR_WORDS: &[(&str, [u8; 3])] = &[
    // "warm white" before "warm" and "white" so the two-word phrase wins
    ("warm white", [255, 242, 204]),
    ("red", [255, 0, 0]),
    ("green", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("white", [255, 255, 255]),
    ("yellow", [255, 255, 0]),
    ("purple", [128, 0, 128]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("cyan", [0, 255, 255]),
    ("warm", [255, 228, 181]),
    ("cool", [224, 255, 255]),
];

/// Map free text to a command, or `None` when nothing matches. Discovery
/// phrasing is not a device command; the caller recognizes it itself.
pub fn parse_command(text: &str) -> Option<BulbCommand> {
    let text = text.to_lowercase();

    if text.contains("turn on") || text.contains("lights on") || text.contains("light on") {
        return Some(BulbCommand::PowerOn);
    }
    if text.contains("turn off") || text.contains("lights off") || text.contains("light off") {
        return Some(BulbCommand::PowerOff);
    }
    if text.contains("brightness") || text.contains("dim") || text.contains("bright") {
        let brightness = extract_brightness(&text)?;
        // spoken numbers get clamped, programmatic callers get rejected
        return BulbCommand::set_brightness(brightness.min(100)).ok();
    }
    // A bare color name is enough ("set it to red").
    if let Some(color) = extract_color(&text) {
        return Some(BulbCommand::SetColor { color });
    }
    if text.contains("status") || text.contains("how are") {
        return Some(BulbCommand::GetStatus);
    }
    if text.contains("ping") {
        return Some(BulbCommand::Ping);
    }

    None
}

/// First 1-3 digit number in the text, else a descriptive level word.
fn extract_brightness(text: &str) -> Option<u8> {
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            if digits.len() < 3 {
                digits.push(c);
            }
        } else if !digits.is_empty() {
            break;
        }
    }
    if let Ok(value) = digits.parse::<u16>() {
        return Some(value.min(100) as u8);
    }

    LEVEL_WORDS
        .iter()
        .find(|(word, _)| text.contains(word))
        .map(|&(_, level)| level)
}

fn extract_color(text: &str) -> Option<[u8; 3]> {
    COLOR_WORDS
        .iter()
        .find(|(word, _)| text.contains(word))
        .map(|&(_, color)| color)
}
