//! This crate implements the standard DICOM tag dictionary.
//!
//! ## Run-time dictionary
//!
//! [`TagDictionary`] translates tags into attribute keywords
//! and their typical value representations.
//! The standard table is embedded in the crate
//! and is loaded on first use through [`registry`],
//! which yields a process-wide, read-only instance.
//! Custom tables in the same JSON format
//! can be loaded with [`TagDictionary::open`].
//!
//! Failing to load a table is always reported as a [`LoadDictionaryError`],
//! since an empty dictionary would silently
//! break value representation resolution and keyword naming.
pub mod data_element;

pub use data_element::{registry, LoadDictionaryError, TagDictionary};
