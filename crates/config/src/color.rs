use crate::{ConfigError, Result};
use view::Color;

/// 解析 `rrggbb` / `rrggbbaa`，可带 `#` 前缀，alpha 忽略
pub fn decode_hex_color(input: &str) -> Result<Color> {
    let hex = input.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !matches!(hex.len(), 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(input.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| ConfigError::InvalidColor(input.to_string()))
    };
    Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rgb_and_rgba() {
        assert_eq!(decode_hex_color("000000ff").unwrap(), Color::BLACK);
        assert_eq!(decode_hex_color("ffffff").unwrap(), Color::WHITE);
        assert_eq!(decode_hex_color("#1a2B3c").unwrap(), Color::rgb(0x1a, 0x2b, 0x3c));
    }

    #[test]
    fn test_decode_invalid() {
        for bad in ["", "fff", "#12345", "gg0000", "1234567", "+12345"] {
            let err = decode_hex_color(bad).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidColor(ref s) if s == bad), "{}", bad);
        }
    }
}
