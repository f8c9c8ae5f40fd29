//! Explicit VR Little Endian header decoding

use dicomix_core::{VrCode, VR};

use super::{ByteSource, DecodeHeader, ElementHeader};
use crate::error::Result;

/// A data element header decoder for the Explicit VR Little Endian transfer syntax.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ExplicitVRLittleEndianDecoder;

/// Whether the VR is followed by 2 reserved bytes and a 32-bit length,
/// rather than a 16-bit length.
pub fn has_long_length(vr: VrCode) -> bool {
    matches!(
        vr.to_vr(),
        Some(
            VR::OB
                | VR::OD
                | VR::OF
                | VR::OL
                | VR::OV
                | VR::OW
                | VR::SQ
                | VR::SV
                | VR::UC
                | VR::UN
                | VR::UR
                | VR::UT
                | VR::UV
        )
    )
}

impl DecodeHeader for ExplicitVRLittleEndianDecoder {
    fn is_explicit_vr(&self) -> bool {
        true
    }

    fn decode_header(&self, source: &mut ByteSource<'_>) -> Result<ElementHeader> {
        let tag = source.read_tag("element tag")?;
        if tag.group() == 0xFFFE {
            // items and delimiters do not have VR or reserved field
            let length = source.read_u32("item length")?;
            return Ok(ElementHeader {
                tag,
                vr: None,
                length,
            });
        }

        let code = source.take(2, "value representation")?;
        let vr = VrCode::from_binary([code[0], code[1]]).unwrap_or_else(|| {
            tracing::warn!(
                "Invalid VR bytes {:02X?} for element {} at position {}, reading as UN",
                code,
                tag,
                source.position() - 2
            );
            VR::UN.into()
        });

        let length = if has_long_length(vr) {
            source.skip(2, "reserved bytes")?;
            source.read_u32("element length")?
        } else {
            u32::from(source.read_u16("element length")?)
        };

        Ok(ElementHeader {
            tag,
            vr: Some(vr),
            length,
        })
    }
}
