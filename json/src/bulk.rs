//! Bulk data URIs.
//!
//! Binary values are never written inline.
//! Instead, they are referred to by a URI of the form
//! `<root>?offset=<offset>&length=<length>`,
//! pointing at the byte range `[offset, offset + length)`
//! of the source buffer.

/// The byte range referred to by a bulk data URI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BulkDataRange {
    /// position of the first byte in the source buffer
    pub offset: u64,
    /// number of bytes
    pub length: u64,
}

/// Build the bulk data URI for the given byte range.
///
/// ```
/// # use dicomix_json::bulk::build_bulk_data_uri;
/// assert_eq!(build_bulk_data_uri("", 512, 1024), "?offset=512&length=1024");
/// assert_eq!(
///     build_bulk_data_uri("http://pacs/instances/1", 0, 16),
///     "http://pacs/instances/1?offset=0&length=16",
/// );
/// ```
pub fn build_bulk_data_uri(root: &str, offset: u64, length: u64) -> String {
    format!("{}?offset={}&length={}", root, offset, length)
}

/// Extract the byte range from a bulk data URI.
///
/// The last `?offset=<digits>&length=<digits>` in the string is taken,
/// so that any root produced by [`build_bulk_data_uri`] is accepted.
/// Returns `None` if the pattern is absent
/// or if any of the numbers does not fit in 64 bits.
pub fn parse_bulk_data_uri(uri: &str) -> Option<BulkDataRange> {
    const OFFSET: &str = "?offset=";
    const LENGTH: &str = "&length=";

    let start = uri.rfind(OFFSET)?;
    let rest = &uri[start + OFFSET.len()..];
    let (offset, length) = rest.split_once(LENGTH)?;
    Some(BulkDataRange {
        offset: parse_digits(offset)?,
        length: parse_digits(length)?,
    })
}

fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_known_uris() {
        assert_eq!(
            parse_bulk_data_uri("?offset=512&length=1024"),
            Some(BulkDataRange {
                offset: 512,
                length: 1024
            })
        );
        assert_eq!(
            parse_bulk_data_uri("http://x/y?offset=0&length=0"),
            Some(BulkDataRange {
                offset: 0,
                length: 0
            })
        );
    }

    #[test]
    fn reject_malformed_uris() {
        for uri in [
            "",
            "http://x/y",
            "?offset=12",
            "?offset=&length=4",
            "?offset=-1&length=4",
            "?offset=1&length=4x",
            "?length=4&offset=1",
            "?offset=1&length=99999999999999999999999",
        ] {
            assert_eq!(parse_bulk_data_uri(uri), None, "{}", uri);
        }
    }

    proptest! {
        #[test]
        fn build_and_parse_are_inverses(root in "\\PC*", offset in any::<u64>(), length in any::<u64>()) {
            let uri = build_bulk_data_uri(&root, offset, length);
            prop_assert_eq!(parse_bulk_data_uri(&uri), Some(BulkDataRange { offset, length }));
        }
    }
}
