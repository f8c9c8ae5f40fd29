//! Parsed DICOM data sets, as produced by a tokenizer.
//!
//! A [`DataSet`] does not hold decoded values.
//! Each [`Element`] records where its value lies
//! in the byte buffer which the data set borrows,
//! so that values can be decoded lazily, or not at all.

use crate::header::{Tag, VrCode};
use crate::tag::parse_tag;
use std::collections::btree_map::{self, BTreeMap};

/// A data element header, plus the nested data sets of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Element<'a> {
    /// The element's tag, as spelled by the tokenizer.
    pub tag: String,
    /// The value representation, if known at parse time.
    pub vr: Option<VrCode>,
    /// The length of the encoded value in bytes.
    pub length: u32,
    /// The position of the first value byte in the source buffer.
    pub data_offset: usize,
    /// The sequence items, if this element is a sequence.
    pub items: Option<Vec<DataSet<'a>>>,
}

impl<'a> Element<'a> {
    /// Create a primitive element header.
    pub fn new(tag: impl Into<String>, vr: Option<VrCode>, length: u32, data_offset: usize) -> Self {
        Element {
            tag: tag.into(),
            vr,
            length,
            data_offset,
            items: None,
        }
    }

    /// Create a sequence element with the given items.
    pub fn new_sequence(
        tag: impl Into<String>,
        vr: Option<VrCode>,
        length: u32,
        data_offset: usize,
        items: Vec<DataSet<'a>>,
    ) -> Self {
        Element {
            tag: tag.into(),
            vr,
            length,
            data_offset,
            items: Some(items),
        }
    }

    /// Parse the element's tag, if it is in a recognized notation.
    pub fn parsed_tag(&self) -> Option<Tag> {
        parse_tag(&self.tag)
    }

    /// The byte range of the element's value in the source buffer.
    pub fn value_range(&self) -> std::ops::Range<usize> {
        self.data_offset..self.data_offset.saturating_add(self.length as usize)
    }
}

/// A collection of data elements over a shared source buffer.
///
/// Elements are unique by tag key.
/// Sequence items are data sets themselves,
/// borrowing the same buffer as their parent.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet<'a> {
    byte_array: &'a [u8],
    elements: BTreeMap<String, Element<'a>>,
}

impl<'a> DataSet<'a> {
    /// Create an empty data set over the given buffer.
    pub fn new(byte_array: &'a [u8]) -> Self {
        DataSet {
            byte_array,
            elements: BTreeMap::new(),
        }
    }

    /// Create a data set over the given buffer from a sequence of elements.
    pub fn from_element_iter<I>(byte_array: &'a [u8], iter: I) -> Self
    where
        I: IntoIterator<Item = Element<'a>>,
    {
        let mut set = DataSet::new(byte_array);
        for e in iter {
            set.insert(e);
        }
        set
    }

    /// Insert an element, returning the one previously stored
    /// under the same tag key, if any.
    pub fn insert(&mut self, element: Element<'a>) -> Option<Element<'a>> {
        self.elements.insert(element.tag.clone(), element)
    }

    /// Fetch an element by its tag key, as spelled in the data set.
    pub fn get(&self, tag: &str) -> Option<&Element<'a>> {
        self.elements.get(tag)
    }

    /// The whole source buffer.
    pub fn byte_array(&self) -> &'a [u8] {
        self.byte_array
    }

    /// Retrieve the raw value bytes of an element,
    /// or `None` if its range does not fit in the buffer.
    pub fn value_bytes(&self, element: &Element<'_>) -> Option<&'a [u8]> {
        self.byte_array.get(element.value_range())
    }

    /// The number of elements in this data set.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the data set has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over the elements, ordered by their tag key text.
    pub fn iter(&self) -> btree_map::Values<'_, String, Element<'a>> {
        self.elements.values()
    }
}

impl<'s, 'a> IntoIterator for &'s DataSet<'a> {
    type Item = &'s Element<'a>;
    type IntoIter = btree_map::Values<'s, String, Element<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::VR;

    #[test]
    fn value_bytes_are_bounds_checked() {
        let buffer = b"CTMR";
        let set = DataSet::from_element_iter(
            buffer,
            [
                Element::new("00080060", Some(VR::CS.into()), 2, 0),
                Element::new("00080061", Some(VR::CS.into()), 4, 2),
            ],
        );

        let modality = set.get("00080060").unwrap();
        assert_eq!(set.value_bytes(modality), Some(&b"CT"[..]));
        assert_eq!(modality.parsed_tag(), Some(Tag(0x0008, 0x0060)));

        let out_of_range = set.get("00080061").unwrap();
        assert_eq!(set.value_bytes(out_of_range), None);
    }

    #[test]
    fn insert_replaces_same_key() {
        let mut set = DataSet::new(&[]);
        assert!(set.insert(Element::new("00100010", None, 0, 0)).is_none());
        let previous = set.insert(Element::new("00100010", Some(VR::PN.into()), 0, 0));
        assert_eq!(previous.map(|e| e.vr), Some(None));
        assert_eq!(set.len(), 1);
    }
}
