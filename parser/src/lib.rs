//! This crate provides a reference tokenizer of DICOM data,
//! producing the parsed [`DataSet`] structure from an in-memory buffer.
//!
//! No value is decoded here:
//! each element records its tag, VR (when explicit), length and value offset,
//! and sequences hold their items as nested data sets.
//!
//! Supported encodings are Explicit VR Little Endian,
//! including encapsulated pixel data,
//! and Implicit VR Little Endian.
//!
//! ```
//! # use dicomix_parser::parse;
//! let bytes = [
//!     0x08, 0x00, 0x60, 0x00,  // (0008,0060)
//!     0x02, 0x00, 0x00, 0x00,  // implicit VR, 2 bytes
//!     b'C', b'T',
//! ];
//! let dataset = parse(&bytes)?;
//! let modality = dataset.get("00080060").unwrap();
//! assert_eq!(dataset.value_bytes(modality), Some(&b"CT"[..]));
//! # Ok::<(), dicomix_parser::Error>(())
//! ```
//!
//! [`DataSet`]: dicomix_core::DataSet

pub mod dataset;
pub mod decode;
pub mod error;
pub mod transfer_syntax;

pub use crate::dataset::{parse, parse_with_options};
pub use crate::error::{Error, Result};

/// The default bound on sequence nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options for parsing a data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// The maximum nesting depth of sequence items.
    pub max_depth: usize,
    /// The transfer syntax UID to assume
    /// when the data has no file meta group.
    pub transfer_syntax: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            transfer_syntax: None,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the maximum nesting depth of sequence items.
    pub fn max_depth(&mut self, depth: usize) -> &mut Self {
        self.max_depth = depth;
        self
    }

    /// Set the transfer syntax to assume
    /// when the data has no file meta group.
    pub fn transfer_syntax(&mut self, uid: impl Into<String>) -> &mut Self {
        self.transfer_syntax = Some(uid.into());
        self
    }
}
