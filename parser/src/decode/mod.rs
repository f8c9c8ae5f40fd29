//! This module contains the data element header decoding logic.

use dicomix_core::{Tag, VrCode};

use crate::error::Result;

pub mod explicit_le;
pub mod implicit_le;
pub mod source;

pub use self::explicit_le::ExplicitVRLittleEndianDecoder;
pub use self::implicit_le::ImplicitVRLittleEndianDecoder;
pub use self::source::ByteSource;

/// The length value of a data element or item
/// whose end is marked by a delimiter.
pub const UNDEFINED_LENGTH: u32 = 0xFFFF_FFFF;

/// The tag of a sequence item.
pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
/// The tag of an item delimitation item.
pub const ITEM_DELIMITER: Tag = Tag(0xFFFE, 0xE00D);
/// The tag of a sequence delimitation item.
pub const SEQUENCE_DELIMITER: Tag = Tag(0xFFFE, 0xE0DD);

/// The header of a data element, or of an item or delimiter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ElementHeader {
    pub tag: Tag,
    /// The value representation, absent in implicit VR
    /// and for items and delimiters.
    pub vr: Option<VrCode>,
    pub length: u32,
}

impl ElementHeader {
    pub fn is_undefined_length(&self) -> bool {
        self.length == UNDEFINED_LENGTH
    }

    /// Whether this is the header of an item or of a delimiter,
    /// which carry no VR in any transfer syntax.
    pub fn is_item_or_delimiter(&self) -> bool {
        self.tag.group() == 0xFFFE
    }
}

/** Type trait for reading data element headers from a byte source.
 *
 * Implementations differ only in the presence of the VR field.
 * Item and delimiter headers are read the same in all of them.
 */
pub trait DecodeHeader {
    /// Whether the encoding carries the VR of each element.
    fn is_explicit_vr(&self) -> bool;

    /// Read the header of the next data element, item or delimiter.
    fn decode_header(&self, source: &mut ByteSource<'_>) -> Result<ElementHeader>;

    /// Read the header of an item or a delimiter.
    fn decode_item_header(&self, source: &mut ByteSource<'_>) -> Result<ElementHeader> {
        let tag = source.read_tag("item tag")?;
        let length = source.read_u32("item length")?;
        Ok(ElementHeader {
            tag,
            vr: None,
            length,
        })
    }
}

/// A header decoder for either of the supported encodings,
/// decided at run-time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeaderDecoder {
    /// Explicit VR Little Endian
    ExplicitLE(ExplicitVRLittleEndianDecoder),
    /// Implicit VR Little Endian
    ImplicitLE(ImplicitVRLittleEndianDecoder),
}

impl HeaderDecoder {
    pub fn explicit_le() -> Self {
        HeaderDecoder::ExplicitLE(ExplicitVRLittleEndianDecoder)
    }

    pub fn implicit_le() -> Self {
        HeaderDecoder::ImplicitLE(ImplicitVRLittleEndianDecoder)
    }
}

impl DecodeHeader for HeaderDecoder {
    fn is_explicit_vr(&self) -> bool {
        match self {
            HeaderDecoder::ExplicitLE(d) => d.is_explicit_vr(),
            HeaderDecoder::ImplicitLE(d) => d.is_explicit_vr(),
        }
    }

    fn decode_header(&self, source: &mut ByteSource<'_>) -> Result<ElementHeader> {
        match self {
            HeaderDecoder::ExplicitLE(d) => d.decode_header(source),
            HeaderDecoder::ImplicitLE(d) => d.decode_header(source),
        }
    }
}
