//! This module contains the reader of whole data sets.
//!
//! Values are not decoded here.
//! The reader only walks over the element headers,
//! recording where each value lies in the source buffer,
//! and descends into sequence items.

use dicomix_core::{DataSet, Element, VrCode, VR};
use snafu::ensure;

use crate::decode::{
    ByteSource, DecodeHeader, ElementHeader, HeaderDecoder, ITEM, ITEM_DELIMITER,
    SEQUENCE_DELIMITER, UNDEFINED_LENGTH,
};
use crate::error::{Result, TooDeepSnafu, UnexpectedDelimiterSnafu};
use crate::ParseOptions;

/// Where a run of data elements ends.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum End {
    /// at the end of the input
    Input,
    /// at the given position of the input (an item of defined length)
    Position(usize),
    /// at an item delimitation item (an item of undefined length)
    ItemDelimiter,
}

/// A reader of data elements over an in-memory buffer.
#[derive(Debug)]
pub struct DataSetReader<'a, 'o> {
    source: ByteSource<'a>,
    options: &'o ParseOptions,
}

impl<'a, 'o> DataSetReader<'a, 'o> {
    /// Create a reader starting at the given position of the buffer.
    pub fn new(bytes: &'a [u8], start: usize, options: &'o ParseOptions) -> Result<Self> {
        let mut source = ByteSource::new(bytes);
        source.skip(start, "preamble")?;
        Ok(DataSetReader { source, options })
    }

    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Whether the next element belongs to the given group.
    pub fn next_in_group(&self, group: u16) -> Result<bool> {
        if self.source.is_at_end() {
            return Ok(false);
        }
        Ok(self.source.peek_tag()?.group() == group)
    }

    /// Read all consecutive elements of a group into the data set.
    pub fn read_group(
        &mut self,
        dataset: &mut DataSet<'a>,
        decoder: HeaderDecoder,
        group: u16,
    ) -> Result<()> {
        while self.next_in_group(group)? {
            let header = decoder.decode_header(&mut self.source)?;
            let element = self.read_element(header, decoder, 0)?;
            dataset.insert(element);
        }
        Ok(())
    }

    /// Read the remaining elements up to the end of the input.
    pub fn read_to_end(&mut self, dataset: &mut DataSet<'a>, decoder: HeaderDecoder) -> Result<()> {
        self.read_elements(dataset, decoder, End::Input, 0)
    }

    fn read_elements(
        &mut self,
        dataset: &mut DataSet<'a>,
        decoder: HeaderDecoder,
        end: End,
        depth: usize,
    ) -> Result<()> {
        ensure!(
            depth <= self.options.max_depth,
            TooDeepSnafu {
                position: self.source.position(),
                max_depth: self.options.max_depth,
            }
        );

        loop {
            match end {
                End::Input if self.source.is_at_end() => return Ok(()),
                End::Position(end) if self.source.position() >= end => {
                    if self.source.position() > end {
                        tracing::warn!(
                            "Item ending at position {} overran by {} bytes",
                            end,
                            self.source.position() - end
                        );
                    }
                    return Ok(());
                }
                _ => {}
            }

            let position = self.source.position();
            let header = decoder.decode_header(&mut self.source)?;
            if header.is_item_or_delimiter() {
                // some writers close items of defined length with a delimiter too
                if header.tag == ITEM_DELIMITER && end != End::Input {
                    return Ok(());
                }
                return UnexpectedDelimiterSnafu {
                    tag: header.tag,
                    position,
                }
                .fail();
            }

            let element = self.read_element(header, decoder, depth)?;
            dataset.insert(element);
        }
    }

    fn read_element(
        &mut self,
        header: ElementHeader,
        decoder: HeaderDecoder,
        depth: usize,
    ) -> Result<Element<'a>> {
        let key = header.tag.to_canonical();
        let data_offset = self.source.position();

        if let Some(item_decoder) = self.sequence_decoder(&header, decoder) {
            let (items, content_end) = self.read_items(&header, item_decoder, depth)?;
            let length = if header.is_undefined_length() {
                span(data_offset, content_end)
            } else {
                header.length
            };
            return Ok(Element::new_sequence(
                key,
                Some(VR::SQ.into()),
                length,
                data_offset,
                items,
            ));
        }

        if header.is_undefined_length() {
            let length = self.skip_fragments(decoder)?;
            return Ok(Element::new(key, header.vr, length, data_offset));
        }

        self.source.skip(header.length as usize, "element value")?;
        Ok(Element::new(key, header.vr, header.length, data_offset))
    }

    /// Decide whether the element is a sequence,
    /// and if so, which decoder its items are read with.
    fn sequence_decoder(&self, header: &ElementHeader, decoder: HeaderDecoder) -> Option<HeaderDecoder> {
        match header.vr.map(VrCode::to_vr) {
            Some(Some(VR::SQ)) => Some(decoder),
            // a sequence of unknown VR is always in implicit VR little endian
            Some(Some(VR::UN)) if header.is_undefined_length() => {
                Some(HeaderDecoder::implicit_le())
            }
            Some(_) => None,
            None if header.is_undefined_length() => Some(decoder),
            None => {
                let starts_with_item = header.length >= 8
                    && self.source.peek_tag().map(|tag| tag == ITEM).unwrap_or(false);
                if starts_with_item {
                    Some(decoder)
                } else {
                    None
                }
            }
        }
    }

    /// Read the items of a sequence,
    /// returning them along with the position where the sequence content ends.
    fn read_items(
        &mut self,
        header: &ElementHeader,
        decoder: HeaderDecoder,
        depth: usize,
    ) -> Result<(Vec<DataSet<'a>>, usize)> {
        let bytes = self.source.bytes();
        let end = if header.is_undefined_length() {
            None
        } else {
            Some(self.source.position().saturating_add(header.length as usize))
        };

        let mut items = Vec::new();
        loop {
            if let Some(end) = end {
                if self.source.position() >= end {
                    return Ok((items, end));
                }
            }

            let position = self.source.position();
            let item = decoder.decode_item_header(&mut self.source)?;
            match item.tag {
                ITEM => {
                    let item_end = if item.is_undefined_length() {
                        End::ItemDelimiter
                    } else {
                        End::Position(self.source.position().saturating_add(item.length as usize))
                    };
                    let mut dataset = DataSet::new(bytes);
                    self.read_elements(&mut dataset, decoder, item_end, depth + 1)?;
                    items.push(dataset);
                }
                SEQUENCE_DELIMITER if end.is_none() => return Ok((items, position)),
                tag => return UnexpectedDelimiterSnafu { tag, position }.fail(),
            }
        }
    }

    /// Skip over the fragments of an encapsulated value,
    /// up to and including the sequence delimitation item.
    /// Returns the length of the value without the delimiter.
    fn skip_fragments(&mut self, decoder: HeaderDecoder) -> Result<u32> {
        let start = self.source.position();
        loop {
            let position = self.source.position();
            let item = decoder.decode_item_header(&mut self.source)?;
            match item.tag {
                ITEM => self.source.skip(item.length as usize, "fragment")?,
                SEQUENCE_DELIMITER => return Ok(span(start, position)),
                tag => return UnexpectedDelimiterSnafu { tag, position }.fail(),
            }
        }
    }
}

fn span(start: usize, end: usize) -> u32 {
    u32::try_from(end - start).unwrap_or(UNDEFINED_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use dicomix_core::Tag;

    fn read<'a>(bytes: &'a [u8], decoder: HeaderDecoder, options: &ParseOptions) -> Result<DataSet<'a>> {
        let mut reader = DataSetReader::new(bytes, 0, options)?;
        let mut dataset = DataSet::new(bytes);
        reader.read_to_end(&mut dataset, decoder)?;
        Ok(dataset)
    }

    #[rustfmt::skip]
    const NESTED_IMPLICIT: &[u8] = &[
        0x08, 0x00, 0x15, 0x11,         // (0008,1115) sequence, implicit
            0xFF, 0xFF, 0xFF, 0xFF,     // undefined length
            0xFE, 0xFF, 0x00, 0xE0,     // item
                0xFF, 0xFF, 0xFF, 0xFF, // undefined length
                0x08, 0x00, 0x40, 0x11, // (0008,1140) sequence, implicit
                    0x10, 0x00, 0x00, 0x00, // 16 bytes
                    0xFE, 0xFF, 0x00, 0xE0, // item
                        0x08, 0x00, 0x00, 0x00, // 8 bytes
                        0x20, 0x00, 0x13, 0x00, // (0020,0013)
                            0x00, 0x00, 0x00, 0x00, // empty
                0xFE, 0xFF, 0x0D, 0xE0, // item delimiter
                    0x00, 0x00, 0x00, 0x00,
            0xFE, 0xFF, 0xDD, 0xE0,     // sequence delimiter
                0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn read_implicit_sequences() {
        let options = ParseOptions::default();
        let dataset = read(NESTED_IMPLICIT, HeaderDecoder::implicit_le(), &options).unwrap();
        assert_eq!(dataset.len(), 1);

        let outer = dataset.get("00081115").unwrap();
        assert_eq!(outer.vr, Some(VR::SQ.into()));
        assert_eq!(outer.data_offset, 8);
        // everything up to the sequence delimiter
        assert_eq!(outer.length, 40);
        let items = outer.items.as_ref().unwrap();
        assert_eq!(items.len(), 1);

        let inner = items[0].get("00081140").unwrap();
        assert_eq!(inner.vr, Some(VR::SQ.into()));
        assert_eq!(inner.length, 16);
        let inner_items = inner.items.as_ref().unwrap();
        assert_eq!(inner_items.len(), 1);
        let number = inner_items[0].get("00200013").unwrap();
        assert_eq!(number.length, 0);
        assert_eq!(number.vr, None);
    }

    #[test]
    fn nesting_is_bounded() {
        let options = ParseOptions {
            max_depth: 1,
            ..Default::default()
        };
        match read(NESTED_IMPLICIT, HeaderDecoder::implicit_le(), &options) {
            Err(Error::TooDeep { max_depth, position, .. }) => {
                assert_eq!(max_depth, 1);
                assert_eq!(position, 32);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[rustfmt::skip]
    const ENCAPSULATED: &[u8] = &[
        0xE0, 0x7F, 0x10, 0x00,         // (7FE0,0010) Pixel Data
            b'O', b'B', 0x00, 0x00,
            0xFF, 0xFF, 0xFF, 0xFF,     // undefined length
            0xFE, 0xFF, 0x00, 0xE0,     // basic offset table
                0x00, 0x00, 0x00, 0x00,
            0xFE, 0xFF, 0x00, 0xE0,     // fragment
                0x04, 0x00, 0x00, 0x00,
                0xFF, 0xD8, 0xFF, 0xD9,
            0xFE, 0xFF, 0xDD, 0xE0,     // sequence delimiter
                0x00, 0x00, 0x00, 0x00,
        0xFC, 0xFF, 0xFC, 0xFF,         // (FFFC,FFFC) trailing padding
            b'O', b'B', 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x00, 0x00,
    ];

    #[test]
    fn encapsulated_values_span_their_fragments() {
        let options = ParseOptions::default();
        let dataset = read(ENCAPSULATED, HeaderDecoder::explicit_le(), &options).unwrap();

        let pixel_data = dataset.get("7fe00010").unwrap();
        assert_eq!(pixel_data.vr, Some(VR::OB.into()));
        assert_eq!(pixel_data.data_offset, 12);
        assert_eq!(pixel_data.length, 20);
        assert_eq!(pixel_data.items, None);

        let padding = dataset.get("fffcfffc").unwrap();
        assert_eq!(padding.data_offset, 52);
        assert_eq!(padding.length, 2);
    }

    #[test]
    fn stray_delimiters_are_rejected() {
        let options = ParseOptions::default();
        let bytes = [0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00];
        match read(&bytes, HeaderDecoder::explicit_le(), &options) {
            Err(Error::UnexpectedDelimiter { tag, position, .. }) => {
                assert_eq!(tag, Tag(0xFFFE, 0xE0DD));
                assert_eq!(position, 0);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn truncated_values_are_rejected() {
        let options = ParseOptions::default();
        // (0010,0010) PN with 8 bytes announced, 3 present
        let bytes = [0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x08, 0x00, b'D', b'o', b'e'];
        match read(&bytes, HeaderDecoder::explicit_le(), &options) {
            Err(Error::UnexpectedEnd { position, .. }) => assert_eq!(position, 8),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
