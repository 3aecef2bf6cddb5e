//! Base64 encoding and decoding over raw byte sequences.
//!
//! Two variants are supported: [`Variant::Standard`] (RFC 4648 alphabet,
//! output padded with `=` to a multiple of four) and [`Variant::UrlSafe`]
//! (`-`/`_` in place of `+`/`/`, unpadded output). The URL-safe variant is
//! what the compact token format uses for its segments.

const STANDARD_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const URL_SAFE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const PAD: u8 = b'=';

/// Alphabet and padding variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Standard alphabet, output padded with `=` to a multiple of four.
    Standard,
    /// URL-safe alphabet (`-`/`_`), unpadded output.
    UrlSafe,
}

impl Variant {
    fn alphabet(self) -> &'static [u8; 64] {
        match self {
            Variant::Standard => STANDARD_ALPHABET,
            Variant::UrlSafe => URL_SAFE_ALPHABET,
        }
    }

    fn padded(self) -> bool {
        matches!(self, Variant::Standard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A byte outside the alphabet (and not padding) at the given offset.
    #[error("invalid byte {1:#04x} at offset {0}")]
    InvalidByte(usize, u8),
}

/// Encode `input` into base64 text.
///
/// The input bytes form one bit stream, most significant bit first; the
/// stream is regrouped into 6-bit values indexing the alphabet, the final
/// value zero-padded on the right when the bit count is not a multiple of
/// six. Empty input encodes to the empty string.
pub fn encode(input: impl AsRef<[u8]>, variant: Variant) -> String {
    let input = input.as_ref();
    let alphabet = variant.alphabet();
    let mut out = String::with_capacity((input.len() + 2) / 3 * 4);

    let mut acc: u32 = 0;
    let mut bits = 0;
    for &byte in input {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= 6 {
            bits -= 6;
            out.push(alphabet[(acc >> bits) as usize & 0x3f] as char);
        }
    }
    if bits > 0 {
        out.push(alphabet[(acc << (6 - bits)) as usize & 0x3f] as char);
    }

    if variant.padded() {
        while out.len() % 4 != 0 {
            out.push(PAD as char);
        }
    }

    out
}

/// Decode base64 text back into bytes.
///
/// Decoding stops at the first pad character; only further padding may
/// follow it. Trailing bits short of a full byte are discarded. Any symbol
/// outside the variant's alphabet is a fatal [`DecodeError::InvalidByte`],
/// never skipped. Pad characters are accepted for either variant, so padded
/// and unpadded spellings of the same data both decode.
pub fn decode(input: impl AsRef<[u8]>, variant: Variant) -> Result<Vec<u8>, DecodeError> {
    let input = input.as_ref();
    let alphabet = variant.alphabet();
    let mut out = Vec::with_capacity(input.len() / 4 * 3 + 2);

    let mut acc: u32 = 0;
    let mut bits = 0;
    for (offset, &byte) in input.iter().enumerate() {
        if byte == PAD {
            for (rest, &trailing) in input.iter().enumerate().skip(offset + 1) {
                if trailing != PAD {
                    return Err(DecodeError::InvalidByte(rest, trailing));
                }
            }
            break;
        }
        let value = alphabet
            .iter()
            .position(|&symbol| symbol == byte)
            .ok_or(DecodeError::InvalidByte(offset, byte))?;
        acc = (acc << 6) | value as u32;
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4648 section 10 test vectors.
    const VECTORS: &[(&str, &str)] = &[
        ("", ""),
        ("f", "Zg=="),
        ("fo", "Zm8="),
        ("foo", "Zm9v"),
        ("foob", "Zm9vYg=="),
        ("fooba", "Zm9vYmE="),
        ("foobar", "Zm9vYmFy"),
    ];

    #[test]
    fn standard_rfc4648_vectors() {
        for (plain, encoded) in VECTORS {
            assert_eq!(encode(plain, Variant::Standard), *encoded);
            assert_eq!(
                decode(encoded, Variant::Standard).unwrap(),
                plain.as_bytes()
            );
        }
    }

    #[test]
    fn url_safe_is_unpadded() {
        for (plain, encoded) in VECTORS {
            let url_safe = encode(plain, Variant::UrlSafe);
            assert_eq!(url_safe, encoded.trim_end_matches('='));
            assert_eq!(decode(&url_safe, Variant::UrlSafe).unwrap(), plain.as_bytes());
        }
    }

    #[test]
    fn url_safe_alphabet_substitution() {
        // 0xfb 0xff hits the last two alphabet symbols.
        assert_eq!(encode([0xfbu8, 0xff], Variant::Standard), "+/8=");
        assert_eq!(encode([0xfbu8, 0xff], Variant::UrlSafe), "-_8");
        assert_eq!(decode("-_8", Variant::UrlSafe).unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn round_trip_all_lengths() {
        let data: Vec<u8> = (0u8..=255).collect();
        for len in 0..data.len() {
            let slice = &data[..len];
            for variant in [Variant::Standard, Variant::UrlSafe] {
                let encoded = encode(slice, variant);
                assert_eq!(decode(&encoded, variant).unwrap(), slice, "len {len}");
            }
        }
    }

    #[test]
    fn output_stays_in_alphabet() {
        let encoded = encode(b"any carnal pleasure", Variant::Standard);
        assert!(encoded
            .bytes()
            .all(|b| STANDARD_ALPHABET.contains(&b) || b == PAD));
    }

    #[test]
    fn rejects_symbol_outside_alphabet() {
        assert_eq!(
            decode("Zm9v!A", Variant::Standard),
            Err(DecodeError::InvalidByte(4, b'!'))
        );
        // '+' belongs to the standard alphabet only.
        assert_eq!(
            decode("+A", Variant::UrlSafe),
            Err(DecodeError::InvalidByte(0, b'+'))
        );
    }

    #[test]
    fn rejects_data_after_padding() {
        assert_eq!(
            decode("Zg==x", Variant::Standard),
            Err(DecodeError::InvalidByte(4, b'x'))
        );
        assert_eq!(decode("Zg==", Variant::UrlSafe).unwrap(), b"f");
    }

    #[test]
    fn decode_accepts_unpadded_standard() {
        assert_eq!(decode("Zg", Variant::Standard).unwrap(), b"f");
        assert_eq!(decode("Zm8", Variant::Standard).unwrap(), b"fo");
    }

    #[test]
    fn empty_both_directions() {
        assert_eq!(encode(b"", Variant::Standard), "");
        assert_eq!(decode("", Variant::Standard).unwrap(), Vec::<u8>::new());
    }
}
