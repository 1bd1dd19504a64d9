//! RGB colors parsed from `#RRGGBB` hex strings

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

/// Background of a day with no activity
pub const EMPTY_DAY_COLOR: Rgb = Rgb {
    r: 0xeb,
    g: 0xed,
    b: 0xf0,
};

fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^#([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$").unwrap()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// CSS `rgba(r, g, b, a)` with the given alpha
    pub fn to_rgba(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

impl fmt::Display for Rgb {
    /// Lowercase `#rrggbb`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = hex_pattern()
            .captures(s)
            .ok_or_else(|| format!("'{}' is not a #RRGGBB color", s))?;
        let channel = |i: usize| u8::from_str_radix(&caps[i], 16).map_err(|e| e.to_string());
        Ok(Rgb {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
        })
    }
}
