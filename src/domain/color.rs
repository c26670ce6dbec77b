use std::{fmt, str::FromStr};

use thiserror::Error;

use super::util::hash;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex length: {0}")]
    InvalidLength(usize),
    #[error("invalid hex digits in {0:?}")]
    InvalidHex(String),
}

/// An opaque 24-bit color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Same color as [`super::util::str_to_rgb`], as channels.
    pub fn from_str_hash(s: &str) -> Self {
        let [_, r, g, b] = (hash(s) & 0x00FF_FFFF).to_be_bytes();
        Rgb { r, g, b }
    }

    /// Color shown for a CLI argument: literal `#RGB`/`#RRGGBB` codes are
    /// taken as is, anything else is hashed.
    pub fn for_label(label: &str) -> Self {
        if label.starts_with('#') {
            if let Ok(rgb) = label.parse() {
                return rgb;
            }
        }
        Rgb::from_str_hash(label)
    }

    pub fn ansi_fg(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    pub fn ansi_bg(&self) -> String {
        format!("\x1b[48;2;{};{};{}m", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Accepts `#RGB` and `#RRGGBB`, with or without the `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(s.to_string()));
        }

        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16).map_err(|_| ColorParseError::InvalidHex(s.to_string()))
        };

        match digits.len() {
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|n| n * 17);
                Ok(Rgb::new(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Rgb::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            len => Err(ColorParseError::InvalidLength(len)),
        }
    }
}
