//! Hexadecimal color codec for palette descriptors
//!
//! Descriptor files spell colors as human-readable `RRGGBB` or `RRGGBBAA`
//! hex strings. The image pipeline, however, compares palette keys against
//! pixels read straight out of an RGBA byte buffer, where the little-endian
//! packed value comes out as `AABBGGRR`. The codec bridges the two: it
//! decodes the authored string and flips the byte order, so palette keys
//! compare directly against [`image::RgbaImage`] pixel values.

use crate::error::{Error, Result};

/// Flip a packed 32-bit color between `RRGGBBAA` and `AABBGGRR` byte order.
///
/// The permutation is a plain byte swap, so the function is its own inverse.
pub const fn flip_rgba(value: u32) -> u32 {
    value.swap_bytes()
}

/// Decode an `RRGGBB` or `RRGGBBAA` hex string into a native packed pixel.
///
/// Six-character input gets a fully-opaque `FF` alpha appended before
/// decoding. Any other length, or any non-hex digit, is an error; there is
/// no silent fallback, since a mistyped key would otherwise just never match
/// a pixel.
pub fn decode_hex(text: &str) -> Result<u32> {
    let full: std::borrow::Cow<'_, str> = match text.len() {
        6 => format!("{text}FF").into(),
        8 => text.into(),
        _ => {
            return Err(Error::InvalidColorLength {
                text: text.to_string(),
            });
        }
    };
    let rgba = u32::from_str_radix(&full, 16).map_err(|_| Error::InvalidColorDigits {
        text: text.to_string(),
    })?;
    Ok(flip_rgba(rgba))
}

/// Encode a native packed pixel back to an 8-character `RRGGBBAA` string.
pub fn encode_hex(packed: u32) -> String {
    format!("{:08X}", flip_rgba(packed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for value in [0u32, 0xFF0000FF, 0x7F7F7FFF, 0x12345678, u32::MAX] {
            assert_eq!(decode_hex(&encode_hex(value)).unwrap(), value);
        }
    }

    #[test]
    fn test_six_chars_default_to_opaque_alpha() {
        assert_eq!(
            decode_hex("AABBCC").unwrap(),
            decode_hex("AABBCCFF").unwrap()
        );
        assert_eq!(
            decode_hex("7F7F7F").unwrap(),
            decode_hex("7F7F7FFF").unwrap()
        );
    }

    #[test]
    fn test_byte_order_flip() {
        // RRGGBBAA 11223344 stored natively as AABBGGRR
        assert_eq!(decode_hex("11223344").unwrap(), 0x44332211);
        assert_eq!(encode_hex(0x44332211), "11223344");
    }

    #[test]
    fn test_flip_is_involution() {
        for value in [0u32, 1, 0xDEADBEEF, u32::MAX] {
            assert_eq!(flip_rgba(flip_rgba(value)), value);
        }
    }

    #[test]
    fn test_wrong_length_rejected() {
        for bad in ["", "ABC", "AABBC", "AABBCCD", "AABBCCDD0", "AABBCCDDEE"] {
            assert!(matches!(
                decode_hex(bad),
                Err(Error::InvalidColorLength { .. })
            ));
        }
    }

    #[test]
    fn test_non_hex_digits_rejected() {
        assert!(matches!(
            decode_hex("GGHHII"),
            Err(Error::InvalidColorDigits { .. })
        ));
        assert!(matches!(
            decode_hex("AABBCCZZ"),
            Err(Error::InvalidColorDigits { .. })
        ));
    }

    #[test]
    fn test_matches_rgba_image_pixel_layout() {
        // decode_hex("FF0000FF") must equal the packed value of an opaque
        // red pixel as read from an RGBA byte buffer
        let red = u32::from_le_bytes([0xFF, 0x00, 0x00, 0xFF]);
        assert_eq!(decode_hex("FF0000FF").unwrap(), red);
        let gray = u32::from_le_bytes([0x7F, 0x7F, 0x7F, 0xFF]);
        assert_eq!(decode_hex("7F7F7F").unwrap(), gray);
    }
}
