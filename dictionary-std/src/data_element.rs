//! Data element dictionary, loaded from a JSON tag table.
//!
//! The table is a JSON object mapping canonical tag keys to entries:
//!
//! ```json
//! {
//!   "00100010": { "keyword": "PatientName", "vr": "PN" },
//!   "60xx3000": { "keyword": "OverlayData", "vr": "OW" }
//! }
//! ```
//!
//! The `vr` field is optional.
//! Repeating groups or elements are written with `xx`
//! in place of the varying byte.

use dicomix_core::dictionary::{DataDictionary, DictionaryEntry};
use dicomix_core::header::{ParseVrError, Tag, VrCode, VR};
use dicomix_core::tag::parse_tag;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The standard tag table, embedded at build time.
static STANDARD_TABLE: &str = include_str!("../data/tags.json");

static DICT: OnceCell<TagDictionary> = OnceCell::new();

/// An error which may occur when loading a tag dictionary.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum LoadDictionaryError {
    /// The dictionary file could not be opened
    #[snafu(display("Could not open dictionary file {}", path.display()))]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },
    /// The table is not a valid JSON object of entries
    #[snafu(display("Could not parse dictionary table"))]
    ParseTable {
        source: serde_json::Error,
        backtrace: Backtrace,
    },
    /// A table key is not a tag
    #[snafu(display("Invalid tag key {:?} in dictionary table", key))]
    InvalidTagKey { key: String, backtrace: Backtrace },
    /// An entry has a malformed value representation
    #[snafu(display("Invalid value representation for entry {:?}", key))]
    InvalidVr {
        key: String,
        source: ParseVrError,
    },
    /// The table has no entries at all
    #[snafu(display("Dictionary table is empty"))]
    EmptyTable { backtrace: Backtrace },
}

pub type Result<T, E = LoadDictionaryError> = std::result::Result<T, E>;

/// Retrieve the process-wide instance of the standard tag dictionary.
///
/// The embedded table is parsed on the first call.
/// Concurrent first calls wait for that single initialization,
/// so no caller ever sees a partially built dictionary.
/// A table which fails to load is reported on every call
/// and is never replaced with an empty dictionary.
pub fn registry() -> Result<&'static TagDictionary> {
    DICT.get_or_try_init(|| {
        let dict = TagDictionary::from_json_str(STANDARD_TABLE)?;
        debug!("Loaded standard tag dictionary with {} entries", dict.len());
        Ok(dict)
    })
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    keyword: String,
    #[serde(default)]
    vr: Option<String>,
}

/// The way a table key matches tags.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum KeyRange {
    /// a single tag
    Single(Tag),
    /// `(ggxx,eeee)`, with the `xx` portion zeroed
    Group100(Tag),
    /// `(gggg,eexx)`, with the `xx` portion zeroed
    Element100(Tag),
}

fn parse_key(key: &str) -> Option<KeyRange> {
    if key.len() != 8 || !key.is_ascii() {
        return None;
    }
    let lower = key.to_ascii_lowercase();
    if &lower[2..4] == "xx" {
        let tag = parse_tag(&format!("{}00{}", &lower[..2], &lower[4..]))?;
        Some(KeyRange::Group100(tag))
    } else if &lower[6..8] == "xx" {
        let tag = parse_tag(&format!("{}00", &lower[..6]))?;
        Some(KeyRange::Element100(tag))
    } else {
        parse_tag(&lower).map(KeyRange::Single)
    }
}

/// A data element dictionary built from a tag table.
///
/// Besides the table's own entries,
/// any group length tag `(gggg,0000)` resolves to `GenericGroupLength`
/// and private creator tags resolve to `PrivateCreator`.
#[derive(Debug)]
pub struct TagDictionary {
    entries: Vec<DictionaryEntry>,
    /// mapping: tag → entry index
    by_tag: HashMap<Tag, usize>,
    /// mapping: keyword → entry index
    by_keyword: HashMap<String, usize>,
    /// repeating elements of the form (ggxx, eeee). The `xx` portion is zeroed.
    repeating_ggxx: HashMap<Tag, usize>,
    /// repeating elements of the form (gggg, eexx). The `xx` portion is zeroed.
    repeating_eexx: HashMap<Tag, usize>,
    group_length: DictionaryEntry,
    private_creator: DictionaryEntry,
}

impl TagDictionary {
    fn with_capacity(capacity: usize) -> Self {
        TagDictionary {
            entries: Vec::with_capacity(capacity),
            by_tag: HashMap::with_capacity(capacity),
            by_keyword: HashMap::with_capacity(capacity),
            repeating_ggxx: HashMap::new(),
            repeating_eexx: HashMap::new(),
            group_length: DictionaryEntry {
                keyword: "GenericGroupLength".to_string(),
                vr: Some(VR::UL.into()),
            },
            private_creator: DictionaryEntry {
                keyword: "PrivateCreator".to_string(),
                vr: Some(VR::LO.into()),
            },
        }
    }

    /// Build a dictionary from a JSON tag table in a string.
    pub fn from_json_str(table: &str) -> Result<Self> {
        let raw: BTreeMap<String, RawEntry> = serde_json::from_str(table).context(ParseTableSnafu)?;
        Self::from_raw(raw)
    }

    /// Build a dictionary from a JSON tag table read from the given source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: BTreeMap<String, RawEntry> =
            serde_json::from_reader(reader).context(ParseTableSnafu)?;
        Self::from_raw(raw)
    }

    /// Build a dictionary from a JSON tag table file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).context(OpenFileSnafu { path })?;
        Self::from_reader(BufReader::new(file))
    }

    fn from_raw(raw: BTreeMap<String, RawEntry>) -> Result<Self> {
        ensure!(!raw.is_empty(), EmptyTableSnafu);

        let mut dict = TagDictionary::with_capacity(raw.len());
        for (key, entry) in raw {
            let range = parse_key(&key).context(InvalidTagKeySnafu { key: &key })?;
            let vr = match entry.vr.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(code) => Some(code.parse::<VrCode>().context(InvalidVrSnafu { key: &key })?),
            };
            dict.index(
                range,
                DictionaryEntry {
                    keyword: entry.keyword,
                    vr,
                },
            );
        }
        Ok(dict)
    }

    /// record the given dictionary entry
    fn index(&mut self, range: KeyRange, entry: DictionaryEntry) -> &mut Self {
        let i = self.entries.len();
        self.by_keyword.insert(entry.keyword.clone(), i);
        match range {
            KeyRange::Single(tag) => {
                self.by_tag.insert(tag, i);
            }
            KeyRange::Group100(tag) => {
                self.repeating_ggxx.insert(tag, i);
            }
            KeyRange::Element100(tag) => {
                self.repeating_eexx.insert(tag, i);
            }
        }
        self.entries.push(entry);
        self
    }

    /// The number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn indexed_tag(&self, tag: Tag) -> Option<&DictionaryEntry> {
        self.by_tag
            .get(&tag)
            .or_else(|| {
                // check tags repeating in different groups
                let group_trimmed = Tag(tag.0 & 0xFF00, tag.1);
                self.repeating_ggxx.get(&group_trimmed)
            })
            .or_else(|| {
                // check tags repeating in different elements
                let elem_trimmed = Tag(tag.0, tag.1 & 0xFF00);
                self.repeating_eexx.get(&elem_trimmed)
            })
            .map(|&i| &self.entries[i])
            .or_else(|| {
                // check for private creator
                if tag.is_private() && (0x0010..=0x00FF).contains(&tag.1) {
                    return Some(&self.private_creator);
                }
                // check for group length
                if tag.is_group_length() {
                    return Some(&self.group_length);
                }
                None
            })
    }
}

impl DataDictionary for TagDictionary {
    fn by_tag(&self, tag: Tag) -> Option<&DictionaryEntry> {
        self.indexed_tag(tag)
    }

    fn by_keyword(&self, keyword: &str) -> Option<&DictionaryEntry> {
        self.by_keyword.get(keyword).map(|&i| &self.entries[i])
    }
}
