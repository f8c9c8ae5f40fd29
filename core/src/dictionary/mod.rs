//! This module contains the concept of a DICOM data dictionary.
//!
//! A data dictionary translates a tag into an entry
//! holding the attribute's keyword and its typical value representation.
//! The standard dictionary lives in a separate crate;
//! an empty [`StubDataDictionary`] is provided here
//! for when no translation is desired.

pub mod stub;

pub use self::stub::StubDataDictionary;

use crate::header::{Tag, VrCode};
use crate::tag::parse_tag;
use std::fmt::Debug;

/// An entry of a data dictionary, representing a DICOM attribute.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DictionaryEntry {
    /// The keyword of the attribute, with no spaces, usually in UpperCamelCase.
    pub keyword: String,
    /// The _typical_ value representation of the attribute, if known.
    pub vr: Option<VrCode>,
}

/** Type trait for a dictionary of DICOM attributes. Attribute dictionaries provide the
 * means to convert a tag to a keyword and vice versa, as well as a form of retrieving
 * the attribute's value representation.
 *
 * The methods herein have no generic parameters, so as to enable being
 * used as a trait object.
 */
pub trait DataDictionary: Debug {
    /// Fetch an entry by its tag.
    fn by_tag(&self, tag: Tag) -> Option<&DictionaryEntry>;

    /// Fetch an entry by its keyword (e.g. "PatientName" or "SOPInstanceUID").
    /// Keywords are case sensitive.
    fn by_keyword(&self, keyword: &str) -> Option<&DictionaryEntry>;

    /// Fetch an entry by a tag in any recognized textual notation.
    ///
    /// Tags which cannot be parsed are a lookup miss.
    fn by_key(&self, key: &str) -> Option<&DictionaryEntry> {
        parse_tag(key).and_then(|tag| self.by_tag(tag))
    }
}

impl<D> DataDictionary for &D
where
    D: DataDictionary + ?Sized,
{
    fn by_tag(&self, tag: Tag) -> Option<&DictionaryEntry> {
        (**self).by_tag(tag)
    }

    fn by_keyword(&self, keyword: &str) -> Option<&DictionaryEntry> {
        (**self).by_keyword(keyword)
    }
}
