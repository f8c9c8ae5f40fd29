//! Normalization of textual tag notations.
//!
//! Data sets coming from different tokenizers address their elements
//! with different spellings of the same tag.
//! The following notations are recognized,
//! with hexadecimal digits in any case:
//!
//! - `x00080060` (prefixed form)
//! - `(0008,0060)` (grouped form)
//! - `0008,0060`
//! - `00080060` (canonical form)
//!
//! All of them normalize to the canonical key `"00080060"`.
//! Anything else is passed through untouched,
//! which callers should see as a lookup miss.

use crate::header::Tag;
use std::borrow::Cow;

/// Parse a tag in any of the recognized notations.
///
/// ```
/// # use dicomix_core::{tag::parse_tag, Tag};
/// assert_eq!(parse_tag("x7FE00010"), Some(Tag(0x7FE0, 0x0010)));
/// assert_eq!(parse_tag("(0010,0010)"), Some(Tag(0x0010, 0x0010)));
/// assert_eq!(parse_tag("PatientName"), None);
/// ```
pub fn parse_tag(text: &str) -> Option<Tag> {
    let text = text.trim();
    let (group, element) = if let Some(inner) = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
    {
        inner.split_once(',')?
    } else if let Some((group, element)) = text.split_once(',') {
        (group, element)
    } else {
        let digits = text
            .strip_prefix('x')
            .or_else(|| text.strip_prefix('X'))
            .unwrap_or(text);
        if digits.len() != 8 || !digits.is_char_boundary(4) {
            return None;
        }
        digits.split_at(4)
    };

    Some(Tag(parse_hex_u16(group)?, parse_hex_u16(element)?))
}

fn parse_hex_u16(digits: &str) -> Option<u16> {
    if digits.len() != 4 || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

/// Normalize a tag string into its canonical key form.
///
/// Strings which are already canonical are borrowed as is,
/// and unrecognized notations are returned unchanged.
///
/// ```
/// # use dicomix_core::tag::normalize_tag;
/// assert_eq!(normalize_tag("x0008103E"), "0008103e");
/// assert_eq!(normalize_tag("(0008,103E)"), "0008103e");
/// assert_eq!(normalize_tag("0008103e"), "0008103e");
/// assert_eq!(normalize_tag("SeriesDescription"), "SeriesDescription");
/// ```
pub fn normalize_tag(text: &str) -> Cow<'_, str> {
    if is_canonical(text) {
        return Cow::Borrowed(text);
    }
    match parse_tag(text) {
        Some(tag) => Cow::Owned(tag.to_canonical()),
        None => Cow::Borrowed(text),
    }
}

/// Check whether the string is a canonical tag key:
/// exactly 8 lowercase hexadecimal digits.
pub fn is_canonical(text: &str) -> bool {
    text.len() == 8
        && text
            .bytes()
            .all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c))
}
