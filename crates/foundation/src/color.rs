use serde::{Deserialize, Serialize};

/// RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rgba(pub [f32; 4]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    MissingHash,
    BadLength(usize),
    BadDigit(char),
}

impl std::fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorParseError::MissingHash => write!(f, "hex color must start with '#'"),
            ColorParseError::BadLength(n) => {
                write!(f, "hex color must have 6 or 8 digits, got {n}")
            }
            ColorParseError::BadDigit(c) => write!(f, "invalid hex digit {c:?}"),
        }
    }
}

impl std::error::Error for ColorParseError {}

impl Rgba {
    /// Parse `#rrggbb` or `#rrggbbaa`. Alpha defaults to opaque.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.strip_prefix('#').ok_or(ColorParseError::MissingHash)?;
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(c));
        }
        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColorParseError::BadLength(digits.len()));
        }

        let mut out = [1.0f32; 4];
        for (i, pair) in digits.as_bytes().chunks(2).enumerate() {
            let byte = (hex_nibble(pair[0]) << 4) | hex_nibble(pair[1]);
            out[i] = byte as f32 / 255.0;
        }
        Ok(Self(out))
    }

    /// Lowercase `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0.map(channel_to_u8);
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// Per-channel blend: `self` at `w = 0`, `other` at `w = 1`.
    pub fn mix(&self, other: &Rgba, w: f64) -> Rgba {
        let mut out = [0.0f32; 4];
        for (i, slot) in out.iter_mut().enumerate() {
            let a = self.0[i] as f64;
            let b = other.0[i] as f64;
            *slot = (a + (b - a) * w) as f32;
        }
        Rgba(out)
    }
}

// Callers have already checked the byte is an ASCII hex digit.
fn hex_nibble(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

fn channel_to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::{ColorParseError, Rgba};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_six_digit_hex_as_opaque() {
        let c = Rgba::from_hex("#f2a8ff").expect("parse");
        assert_eq!(c.0[0], 0xf2 as f32 / 255.0);
        assert_eq!(c.0[1], 0xa8 as f32 / 255.0);
        assert_eq!(c.0[2], 1.0);
        assert_eq!(c.0[3], 1.0);
    }

    #[test]
    fn hex_survives_parse_and_print() {
        for hex in ["#f2a8ff", "#dc70ff", "#6002c5", "#00000080"] {
            assert_eq!(Rgba::from_hex(hex).expect("parse").to_hex(), hex);
        }
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(Rgba::from_hex("f2a8ff"), Err(ColorParseError::MissingHash));
        assert_eq!(Rgba::from_hex("#fff"), Err(ColorParseError::BadLength(3)));
        assert_eq!(Rgba::from_hex("#f2a8fg"), Err(ColorParseError::BadDigit('g')));
    }

    #[test]
    fn mix_hits_endpoints() {
        let a = Rgba([0.0, 0.0, 0.0, 1.0]);
        let b = Rgba([1.0, 0.5, 0.25, 1.0]);
        assert_eq!(a.mix(&b, 0.0), a);
        assert_eq!(a.mix(&b, 1.0), b);
        assert_eq!(a.mix(&b, 0.5), Rgba([0.5, 0.25, 0.125, 1.0]));
    }
}
