//! Serialization options.

use serde::Deserialize;

/// The default bound on sequence nesting.
pub const DEFAULT_MAX_SEQUENCE_DEPTH: usize = 64;

/// The set of options for serializing a data set.
///
/// Options are immutable for the duration of one serialization.
/// They can be built through the chained setters,
/// or deserialized from a JSON object with camel case field names,
/// where absent fields take their default value.
///
/// ```
/// # use dicomix_json::OutputOptions;
/// let mut options = OutputOptions::new();
/// options.ignore_group_length(true).use_common_names(false);
/// assert!(options.ignore_group_length);
/// assert!(!options.use_common_names);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OutputOptions {
    /// always produce arrays for numeric values, even single ones
    pub use_array_with_single_value: bool,
    /// leave out group length elements `(gggg,0000)`
    pub ignore_group_length: bool,
    /// leave out file meta information elements (group `0002` and below)
    pub ignore_meta_header: bool,
    /// leave out private elements (odd group number)
    pub ignore_private: bool,
    /// leave out elements decoded as binary data
    pub ignore_binary: bool,
    /// key elements by their dictionary keyword instead of their tag
    pub use_common_names: bool,
    /// prefix bulk data URIs with `bulk_data_root`
    pub explicit_bulk_data_root: bool,
    /// the root of bulk data URIs
    pub bulk_data_root: String,
    /// the maximum sequence nesting depth
    pub max_sequence_depth: usize,
}

impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions {
            use_array_with_single_value: false,
            ignore_group_length: false,
            ignore_meta_header: false,
            ignore_private: false,
            ignore_binary: false,
            use_common_names: true,
            explicit_bulk_data_root: false,
            bulk_data_root: String::new(),
            max_sequence_depth: DEFAULT_MAX_SEQUENCE_DEPTH,
        }
    }
}

impl OutputOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set whether single numeric values are kept in a one-element array.
    pub fn use_array_with_single_value(&mut self, value: bool) -> &mut Self {
        self.use_array_with_single_value = value;
        self
    }

    /// Set whether group length elements are left out.
    pub fn ignore_group_length(&mut self, value: bool) -> &mut Self {
        self.ignore_group_length = value;
        self
    }

    /// Set whether file meta information elements are left out.
    pub fn ignore_meta_header(&mut self, value: bool) -> &mut Self {
        self.ignore_meta_header = value;
        self
    }

    /// Set whether private elements are left out.
    pub fn ignore_private(&mut self, value: bool) -> &mut Self {
        self.ignore_private = value;
        self
    }

    /// Set whether binary elements are left out.
    pub fn ignore_binary(&mut self, value: bool) -> &mut Self {
        self.ignore_binary = value;
        self
    }

    /// Set whether output keys are dictionary keywords when available.
    pub fn use_common_names(&mut self, value: bool) -> &mut Self {
        self.use_common_names = value;
        self
    }

    /// Set the root of bulk data URIs.
    ///
    /// This also enables `explicit_bulk_data_root`.
    pub fn bulk_data_root(&mut self, root: impl Into<String>) -> &mut Self {
        self.bulk_data_root = root.into();
        self.explicit_bulk_data_root = true;
        self
    }

    /// Go back to root-relative bulk data URIs.
    ///
    /// This is the default behavior.
    pub fn relative_bulk_data_uris(&mut self) -> &mut Self {
        self.bulk_data_root.clear();
        self.explicit_bulk_data_root = false;
        self
    }

    /// Set the maximum sequence nesting depth.
    pub fn max_sequence_depth(&mut self, depth: usize) -> &mut Self {
        self.max_sequence_depth = depth;
        self
    }

    /// The root to prefix bulk data URIs with,
    /// which is empty unless `explicit_bulk_data_root` is set.
    pub fn effective_bulk_data_root(&self) -> &str {
        if self.explicit_bulk_data_root {
            &self.bulk_data_root
        } else {
            ""
        }
    }
}
