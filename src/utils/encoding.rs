use log::debug;

/// Percent-encode a query value for URL transport
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Leave a value as-is, for human-readable previews
pub fn identity(value: &str) -> String {
    value.to_string()
}

/// Decode a query string as received from a URL.
///
/// `+` is read as a space before percent-decoding, so an encoded `%2B`
/// survives as a literal plus. Input that does not decode to valid UTF-8 is
/// returned with only the `+` normalization applied.
pub fn decode_query(raw: &str) -> String {
    let normalized = raw.replace('+', " ");
    match urlencoding::decode(&normalized) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            debug!("query is not valid percent-encoded UTF-8 ({}), using raw text", e);
            normalized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_quotes_and_spaces() {
        assert_eq!(percent_encode("\"war & peace\""), "%22war%20%26%20peace%22");
    }

    #[test]
    fn test_decode_plus_as_space() {
        assert_eq!(decode_query("a:%22x%22+AND+b:%22y%22"), r#"a:"x" AND b:"y""#);
    }

    #[test]
    fn test_encoded_plus_survives() {
        assert_eq!(decode_query("c%2B%2B"), "c++");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(decode_query(r#"a:"x" AND b:"y""#), r#"a:"x" AND b:"y""#);
    }

    #[test]
    fn test_invalid_utf8_falls_back() {
        assert_eq!(decode_query("a:%FF+b"), "a:%FF b");
    }

    #[test]
    fn test_encode_decode_unicode() {
        let encoded = percent_encode("\"été\"");
        assert_eq!(decode_query(&encoded), "\"été\"");
    }
}
