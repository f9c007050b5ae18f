//! Packed 24-bit colours.

use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RgbParseError {
    #[error("bad RGB colour value: {0}")]
    Malformed(String),
}

/// `0xRRGGBB`. [`Rgb::NO_VALUE`] is reserved to mean "no colour given".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const NO_VALUE: Self = Self(0x00_FF_FF);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    pub fn is_none(self) -> bool {
        self == Self::NO_VALUE
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::NO_VALUE
    }
}

/// Parses `#RRGGBB` (surrounding blanks allowed). A colour that lands on
/// the reserved sentinel is nudged off it.
impl FromStr for Rgb {
    type Err = RgbParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || RgbParseError::Malformed(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(bad)?;
        match hex.as_bytes().get(..6) {
            Some(digits) if digits.iter().all(u8::is_ascii_hexdigit) => {}
            _ => return Err(bad()),
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        let rgb = Self::new(channel(0)?, channel(2)?, channel(4)?);
        if !hex[6..].trim().is_empty() {
            return Err(bad());
        }
        if rgb == Self::NO_VALUE {
            return Ok(Self(rgb.0 ^ 0x01_01_01));
        }
        Ok(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex() {
        assert_eq!("#FF8000".parse::<Rgb>(), Ok(Rgb::new(255, 128, 0)));
        assert_eq!(" #0a0B0c ".parse::<Rgb>(), Ok(Rgb::new(10, 11, 12)));
    }

    #[test]
    fn sentinel_is_never_produced() {
        let c: Rgb = "#00FFFF".parse().expect("parse");
        assert_ne!(c, Rgb::NO_VALUE);
        assert_eq!(c, Rgb(0x01_FE_FE));
    }

    #[test]
    fn malformed() {
        assert!("FF8000".parse::<Rgb>().is_err());
        assert!("#FF80".parse::<Rgb>().is_err());
        assert!("#GG8000".parse::<Rgb>().is_err());
        assert!("#FF8000ZZ".parse::<Rgb>().is_err());
        assert!("#+F8000".parse::<Rgb>().is_err());
    }

    #[test]
    fn non_ascii_is_malformed() {
        assert!("#A\u{e9}1234".parse::<Rgb>().is_err());
        assert!("#\u{e9}\u{e9}\u{e9}".parse::<Rgb>().is_err());
    }

    #[test]
    fn channels() {
        let c = Rgb::new(1, 2, 3);
        assert_eq!((c.red(), c.green(), c.blue()), (1, 2, 3));
    }
}
