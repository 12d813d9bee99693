//! Colour values parsed from tag text.

use serde::Serialize;

/// An sRGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Colour names commonly found in `building:colour` / `roof:colour`.
const NAMED: &[(&str, u32)] = &[
    ("black", 0x00_0000),
    ("white", 0xff_ffff),
    ("gray", 0x80_8080),
    ("grey", 0x80_8080),
    ("lightgray", 0xd3_d3d3),
    ("lightgrey", 0xd3_d3d3),
    ("darkgray", 0xa9_a9a9),
    ("darkgrey", 0xa9_a9a9),
    ("silver", 0xc0_c0c0),
    ("red", 0xff_0000),
    ("darkred", 0x8b_0000),
    ("maroon", 0x80_0000),
    ("brown", 0xa5_2a2a),
    ("orange", 0xff_a500),
    ("yellow", 0xff_ff00),
    ("beige", 0xf5_f5dc),
    ("tan", 0xd2_b48c),
    ("ivory", 0xff_fff0),
    ("green", 0x00_8000),
    ("darkgreen", 0x00_6400),
    ("olive", 0x80_8000),
    ("blue", 0x00_00ff),
    ("navy", 0x00_0080),
    ("lightblue", 0xad_d8e6),
    ("teal", 0x00_8080),
    ("purple", 0x80_0080),
    ("pink", 0xff_c0cb),
];

impl Rgb {
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| f32::from(((hex >> shift) & 0xff) as u8) / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Parse `#rgb`, `#rrggbb` or a colour name.
    ///
    /// Returns `None` for anything else.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(digits) = s.strip_prefix('#') {
            return parse_hex_digits(digits).map(Self::from_hex);
        }
        let lower = s.to_ascii_lowercase().replace([' ', '_'], "");
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|&(_, hex)| Self::from_hex(hex))
    }

    #[must_use]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

fn parse_hex_digits(digits: &str) -> Option<u32> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        6 => Some(value),
        3 => {
            let r = (value >> 8) & 0xf;
            let g = (value >> 4) & 0xf;
            let b = value & 0xf;
            Some(((r * 0x11) << 16) | ((g * 0x11) << 8) | (b * 0x11))
        }
        _ => None,
    }
}
