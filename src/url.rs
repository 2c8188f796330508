use crate::error::DecodeError;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Bytes that are always written as `%HH`: ASCII whitespace plus the
/// delimiters that carry meaning inside a URL. Everything else, including
/// non-ASCII bytes, is passed through.
pub const ESCAPED_BYTES: &[u8] = b" \t\r\n\x0C\x0B!#$%&'()*+,/:;=?@[]";

static ESCAPE_TABLE: [Option<[u8; 3]>; 256] = build_escape_table();

const fn build_escape_table() -> [Option<[u8; 3]>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < ESCAPED_BYTES.len() {
        let b = ESCAPED_BYTES[i];
        table[b as usize] = Some([b'%', HEX[(b >> 4) as usize], HEX[(b & 0x0F) as usize]]);
        i += 1;
    }
    table
}

/// Returns the `%HH` escape for `b`, if `b` must be escaped.
pub fn escape_for(b: u8) -> Option<&'static [u8; 3]> {
    ESCAPE_TABLE[b as usize].as_ref()
}

/// Percent-encode `input`, escaping only the bytes in [`ESCAPED_BYTES`].
pub fn percent_encode(input: &[u8]) -> Vec<u8> {
    // Worst case every byte becomes "%XX"; most inputs stay close to their length.
    let mut out = Vec::with_capacity(input.len() + input.len() / 2);

    for &b in input {
        match escape_for(b) {
            Some(escape) => out.extend_from_slice(escape),
            None => out.push(b),
        }
    }

    out
}

/// Same as [`percent_encode`] for text. Only ASCII is ever rewritten, so
/// the result is still valid UTF-8.
pub fn percent_encode_str(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for ch in input.chars() {
        let escape = if ch.is_ascii() { escape_for(ch as u8) } else { None };
        match escape {
            Some(escape) => escape.iter().for_each(|&b| out.push(b as char)),
            None => out.push(ch),
        }
    }

    out
}

/// Decode `%HH` escapes and `+` (as space).
///
/// Fails on the first escape that is truncated or not made of two hex
/// digits; no partial output is returned in that case.
pub fn percent_decode(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        match input[i] {
            b'%' => {
                let (hi, lo) = match input.get(i + 1..i + 3) {
                    Some(&[hi, lo]) => (hi, lo),
                    _ => return Err(DecodeError { offset: i }),
                };
                match (hex_value(hi), hex_value(lo)) {
                    (Some(hi), Some(lo)) => out.push(hi << 4 | lo),
                    _ => return Err(DecodeError { offset: i }),
                }
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    Ok(out)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_every_escaped_byte_as_uppercase_hex() {
        for &b in ESCAPED_BYTES {
            let expected = format!("%{:02X}", b);
            assert_eq!(percent_encode(&[b]), expected.as_bytes(), "byte {:#04x}", b);
        }
    }

    #[test]
    fn escape_set_is_exactly_twenty_five_bytes() {
        let escaped = (0..=255u8).filter(|&b| escape_for(b).is_some()).count();
        assert_eq!(escaped, 25);
        assert_eq!(ESCAPED_BYTES.len(), 25);
    }

    #[test]
    fn leaves_other_bytes_alone() {
        let s = b"Az09-._~\"<>\\^`{|}\x00\x7F\x80\xFF";
        assert_eq!(percent_encode(s), s.to_vec());
        assert_eq!(percent_decode(s).unwrap(), s.to_vec());
    }

    #[test]
    fn encodes_mixed_input() {
        assert_eq!(percent_encode(b"a b&c"), b"a%20b%26c");
        assert_eq!(percent_encode(b"100% sure"), b"100%25%20sure");
        assert_eq!(percent_encode(b"[::1]:80\r\n"), b"%5B%3A%3A1%5D%3A80%0D%0A");
    }

    #[test]
    fn encodes_str_and_keeps_unicode() {
        assert_eq!(percent_encode_str("héllo wörld?"), "héllo%20wörld%3F");
        assert_eq!(
            percent_encode_str("日本 語").as_bytes(),
            percent_encode("日本 語".as_bytes())
        );
    }

    #[test]
    fn decodes_escapes_and_plus() {
        assert_eq!(percent_decode(b"%20").unwrap(), b" ");
        assert_eq!(percent_decode(b"+").unwrap(), b" ");
        assert_eq!(percent_decode(b"%2B").unwrap(), b"+");
        assert_eq!(percent_decode(b"a%20b%26c").unwrap(), b"a b&c");
        assert_eq!(percent_decode(b"100%25%20sure").unwrap(), b"100% sure");
    }

    #[test]
    fn decodes_lowercase_hex_and_high_bytes() {
        assert_eq!(percent_decode(b"%2f%3a").unwrap(), b"/:");
        assert_eq!(percent_decode(b"%ff%00%C3%A9").unwrap(), vec![0xFF, 0x00, 0xC3, 0xA9]);
    }

    #[test]
    fn empty_input() {
        assert!(percent_encode(b"").is_empty());
        assert!(percent_decode(b"").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_escapes() {
        assert_eq!(percent_decode(b"%"), Err(DecodeError { offset: 0 }));
        assert_eq!(percent_decode(b"%2"), Err(DecodeError { offset: 0 }));
        assert_eq!(percent_decode(b"%zz"), Err(DecodeError { offset: 0 }));
        assert_eq!(percent_decode(b"ok%2g"), Err(DecodeError { offset: 2 }));
        assert_eq!(percent_decode(b"%+5"), Err(DecodeError { offset: 0 }));
        assert_eq!(percent_decode(b"%20%"), Err(DecodeError { offset: 3 }));
    }
}
