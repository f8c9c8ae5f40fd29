//! Bounds checked reading over an in-memory buffer.

use byteordered::byteorder::{ByteOrder, LittleEndian};
use dicomix_core::Tag;
use snafu::OptionExt;

use crate::error::{Result, UnexpectedEndSnafu};

/// A cursor over the source buffer,
/// reading little endian words.
///
/// Every read checks that the bytes are available
/// and fails with `UnexpectedEnd` otherwise,
/// leaving the position untouched.
#[derive(Debug, Clone)]
pub struct ByteSource<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        ByteSource { bytes, position: 0 }
    }

    /// The whole underlying buffer.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the position is at or past the end of the buffer.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    /// Take the next `len` bytes.
    pub fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8]> {
        let bytes = self.peek(len, what)?;
        self.position += len;
        Ok(bytes)
    }

    /// Look at the next `len` bytes without consuming them.
    pub fn peek(&self, len: usize, what: &'static str) -> Result<&'a [u8]> {
        self.position
            .checked_add(len)
            .and_then(|end| self.bytes.get(self.position..end))
            .context(UnexpectedEndSnafu {
                position: self.position,
                what,
            })
    }

    /// Move forward by `len` bytes.
    pub fn skip(&mut self, len: usize, what: &'static str) -> Result<()> {
        self.take(len, what).map(|_| ())
    }

    pub fn read_u16(&mut self, what: &'static str) -> Result<u16> {
        self.take(2, what).map(LittleEndian::read_u16)
    }

    pub fn read_u32(&mut self, what: &'static str) -> Result<u32> {
        self.take(4, what).map(LittleEndian::read_u32)
    }

    pub fn read_tag(&mut self, what: &'static str) -> Result<Tag> {
        let group = self.read_u16(what)?;
        let element = self.read_u16(what)?;
        Ok(Tag(group, element))
    }

    /// Read the next tag without consuming it.
    pub fn peek_tag(&self) -> Result<Tag> {
        let bytes = self.peek(4, "tag")?;
        Ok(Tag(
            LittleEndian::read_u16(&bytes[0..2]),
            LittleEndian::read_u16(&bytes[2..4]),
        ))
    }
}
