#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]

//! This is the core library of dicomix, containing the data model
//! shared by the tokenizer, the data dictionaries and the serializer.
//!
//! The current structure of this crate is as follows:
//!
//! - [`header`] comprises the data types for DICOM element headers,
//!   namely tags and value representations.
//! - [`tag`] normalizes the various textual notations of a tag
//!   into one canonical key.
//! - [`vr_class`] partitions value representations into decoding classes.
//! - [`dataset`] holds the parsed data set structure,
//!   which refers to values by their position in the source buffer.
//! - [`dictionary`] describes common behavior of DICOM data dictionaries,
//!   which translate tags into a keyword and a value representation.

pub mod dataset;
pub mod dictionary;
pub mod header;
pub mod tag;
pub mod vr_class;

pub use dataset::{DataSet, Element};
pub use dictionary::{DataDictionary, DictionaryEntry};
pub use header::{ParseVrError, Tag, VrCode, VR};
pub use tag::{normalize_tag, parse_tag};
pub use vr_class::{NumericKind, VrClass};
