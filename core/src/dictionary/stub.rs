//! This module contains a stub dictionary.

use super::{DataDictionary, DictionaryEntry};
use crate::header::Tag;

/// An empty attribute dictionary.
///
/// Every lookup is a miss, so elements without an explicit VR
/// are classified as unknown and tags are never replaced by keywords.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StubDataDictionary;

impl DataDictionary for StubDataDictionary {
    fn by_tag(&self, _: Tag) -> Option<&DictionaryEntry> {
        None
    }

    fn by_keyword(&self, _: &str) -> Option<&DictionaryEntry> {
        None
    }
}
