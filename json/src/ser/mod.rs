//! Data set serialization module

use std::io::Write;

use dicomix_core::{normalize_tag, DataDictionary, DataSet, VrClass};
use snafu::{Backtrace, ResultExt, Snafu};

use crate::filter::should_exclude;
use crate::output::OutputMap;
use crate::OutputOptions;

use self::value::decode_value;
mod value;

/// An error which may occur when writing a serialized data set as JSON.
///
/// Building the output map itself never fails:
/// values which cannot be decoded become bulk data references.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Could not write the output as JSON
    Json {
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A serializer of parsed data sets into a structured output map,
/// holding the options and the data dictionary to use.
///
/// The serializer does not keep any state between calls,
/// so one instance can serialize any number of data sets.
#[derive(Debug, Clone)]
pub struct DataSetSerializer<'o, D> {
    options: &'o OutputOptions,
    dictionary: D,
}

impl<'o, D> DataSetSerializer<'o, D>
where
    D: DataDictionary,
{
    pub fn new(options: &'o OutputOptions, dictionary: D) -> Self {
        DataSetSerializer {
            options,
            dictionary,
        }
    }

    pub fn options(&self) -> &OutputOptions {
        self.options
    }

    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    /// Serialize a top level data set.
    pub fn serialize(&self, dataset: &DataSet<'_>) -> OutputMap {
        self.serialize_at(dataset, 0)
    }

    /// Serialize a data set found at the given sequence nesting depth.
    pub(crate) fn serialize_at(&self, dataset: &DataSet<'_>, depth: usize) -> OutputMap {
        // visit in canonical key order, whatever the source notation
        let mut elements: Vec<_> = dataset
            .iter()
            .map(|e| (normalize_tag(&e.tag), e))
            .collect();
        elements.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut output = OutputMap::new();
        for (key, element) in elements {
            let tag = element.parsed_tag();
            let entry = tag.and_then(|tag| self.dictionary.by_tag(tag));
            let vr = element.vr.or_else(|| entry.and_then(|e| e.vr));
            let class = VrClass::of_opt(vr);

            if should_exclude(self.options, element, tag, class) {
                continue;
            }

            let value = decode_value(self, dataset, element, vr, class, depth);
            let key = match entry {
                Some(entry) if self.options.use_common_names => entry.keyword.clone(),
                _ => key.into_owned(),
            };
            output.insert(key, value);
        }
        output
    }
}

/// Serialize a data set into a structured output map.
pub fn serialize<D>(dataset: &DataSet<'_>, options: &OutputOptions, dictionary: D) -> OutputMap
where
    D: DataDictionary,
{
    DataSetSerializer::new(options, dictionary).serialize(dataset)
}

/// Serialize a data set as a serde JSON value.
pub fn to_value<D>(
    dataset: &DataSet<'_>,
    options: &OutputOptions,
    dictionary: D,
) -> Result<serde_json::Value>
where
    D: DataDictionary,
{
    let output = serialize(dataset, options, dictionary);
    serde_json::to_value(&output).context(JsonSnafu)
}

/// Serialize a data set as a string of JSON.
pub fn to_string<D>(dataset: &DataSet<'_>, options: &OutputOptions, dictionary: D) -> Result<String>
where
    D: DataDictionary,
{
    let output = serialize(dataset, options, dictionary);
    serde_json::to_string(&output).context(JsonSnafu)
}

/// Serialize a data set as a pretty-printed string of JSON.
pub fn to_string_pretty<D>(
    dataset: &DataSet<'_>,
    options: &OutputOptions,
    dictionary: D,
) -> Result<String>
where
    D: DataDictionary,
{
    let output = serialize(dataset, options, dictionary);
    serde_json::to_string_pretty(&output).context(JsonSnafu)
}

/// Serialize a data set to a vector of bytes.
pub fn to_vec<D>(dataset: &DataSet<'_>, options: &OutputOptions, dictionary: D) -> Result<Vec<u8>>
where
    D: DataDictionary,
{
    let output = serialize(dataset, options, dictionary);
    serde_json::to_vec(&output).context(JsonSnafu)
}

/// Serialize a data set to a byte writer.
pub fn to_writer<W, D>(
    writer: W,
    dataset: &DataSet<'_>,
    options: &OutputOptions,
    dictionary: D,
) -> Result<()>
where
    W: Write,
    D: DataDictionary,
{
    let output = serialize(dataset, options, dictionary);
    serde_json::to_writer(writer, &output).context(JsonSnafu)
}
