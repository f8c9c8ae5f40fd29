//! Element exclusion rules.

use dicomix_core::{Element, Tag, VrClass};

use crate::OutputOptions;

/// The reason for an element to be left out of the output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// a group length element, with `ignore_group_length`
    GroupLength,
    /// a private element, with `ignore_private`
    Private,
    /// an element with no value
    Empty,
    /// a file meta information element, with `ignore_meta_header`
    MetaHeader,
    /// an element decoded as binary, with `ignore_binary`
    Binary,
}

/// Evaluate the exclusion rules for an element.
///
/// `tag` is the parsed form of the element's tag, if it could be parsed,
/// and `class` is the element's resolved VR class.
/// Tag based rules never match elements with an unparsed tag.
/// Sequences are never excluded for being empty.
pub fn exclusion(
    options: &OutputOptions,
    element: &Element<'_>,
    tag: Option<Tag>,
    class: VrClass,
) -> Option<Exclusion> {
    if let Some(tag) = tag {
        if options.ignore_group_length && tag.is_group_length() {
            return Some(Exclusion::GroupLength);
        }
        if options.ignore_private && tag.is_private() {
            return Some(Exclusion::Private);
        }
        if options.ignore_meta_header && tag.is_file_meta() {
            return Some(Exclusion::MetaHeader);
        }
    }
    if element.length == 0 && class != VrClass::Sequence {
        return Some(Exclusion::Empty);
    }
    if options.ignore_binary && class.decodes_as_binary() {
        return Some(Exclusion::Binary);
    }
    None
}

/// Whether the element should be left out of the output.
pub fn should_exclude(
    options: &OutputOptions,
    element: &Element<'_>,
    tag: Option<Tag>,
    class: VrClass,
) -> bool {
    exclusion(options, element, tag, class).is_some()
}
