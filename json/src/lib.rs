//! Structured DICOM serialization module
//!
//! This library turns a parsed DICOM data set
//! into a tree of JSON-friendly values,
//! keyed either by attribute keyword or by canonical tag.
//! Text and numbers are decoded from the source buffer,
//! while binary values are replaced by
//! a [bulk data URI](bulk) pointing back at the original bytes.
//!
//! The easiest path to serialization is in
//! using the functions readily available [`to_string`] and [`to_value`],
//! which take the data set, the [output options](OutputOptions)
//! and the data dictionary to resolve keywords and VRs with.
//!
//! # Example
//!
//! ```rust
//! # use dicomix_core::{DataSet, Element, VR};
//! # use dicomix_core::dictionary::StubDataDictionary;
//! # use dicomix_json::OutputOptions;
//! let bytes = b"CT20230610";
//! let dataset = DataSet::from_element_iter(&bytes[..], [
//!     Element::new("00080060", Some(VR::CS.into()), 2, 0),
//!     Element::new("(0008,0021)", Some(VR::DA.into()), 8, 2),
//! ]);
//!
//! let mut options = OutputOptions::new();
//! options.use_common_names(false);
//! let json = dicomix_json::to_string(&dataset, &options, StubDataDictionary)?;
//!
//! assert_eq!(json, r#"{"00080021":"20230610","00080060":"CT"}"#);
//! # Ok::<(), dicomix_json::Error>(())
//! ```
//!
//! Use [`serialize`] to obtain the [`OutputMap`] itself,
//! or a [`DataSetSerializer`] to serialize many data sets
//! with the same options and dictionary.

pub mod bulk;
pub mod filter;
mod options;
mod output;
mod ser;

pub use crate::options::{OutputOptions, DEFAULT_MAX_SEQUENCE_DEPTH};
pub use crate::output::{Number, OutputMap, OutputValue};
pub use crate::ser::{
    serialize, to_string, to_string_pretty, to_value, to_vec, to_writer, DataSetSerializer, Error,
    Result,
};

/// The textual representation of a floating point NaN.
pub const NAN: &str = "NaN";
/// The textual representation of positive infinity.
pub const INFINITY: &str = "inf";
/// The textual representation of negative infinity.
pub const NEG_INFINITY: &str = "-inf";
