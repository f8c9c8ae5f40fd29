//! Implicit VR Little Endian header decoding

use super::{ByteSource, DecodeHeader, ElementHeader};
use crate::error::Result;

/// A data element header decoder for the Implicit VR Little Endian transfer syntax.
///
/// Headers are read without a VR,
/// which is left for a data dictionary to resolve.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ImplicitVRLittleEndianDecoder;

impl DecodeHeader for ImplicitVRLittleEndianDecoder {
    fn is_explicit_vr(&self) -> bool {
        false
    }

    fn decode_header(&self, source: &mut ByteSource<'_>) -> Result<ElementHeader> {
        let tag = source.read_tag("element tag")?;
        let length = source.read_u32("element length")?;
        Ok(ElementHeader {
            tag,
            vr: None,
            length,
        })
    }
}
