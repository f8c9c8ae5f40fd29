use dicomix_core::Tag;
use snafu::{Backtrace, Snafu};

/// Type alias for a result from this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The main data type for errors in the library.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    /// The input ended in the middle of a data element
    #[snafu(display("Unexpected end of input at position {} while reading {}", position, what))]
    UnexpectedEnd {
        position: usize,
        what: &'static str,
        backtrace: Backtrace,
    },
    /// The data set is encoded in a transfer syntax which cannot be read
    #[snafu(display("Unsupported transfer syntax {}", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },
    /// A delimiter or item tag was found where a data element was expected
    #[snafu(display("Unexpected delimiter {} at position {}", tag, position))]
    UnexpectedDelimiter {
        tag: Tag,
        position: usize,
        backtrace: Backtrace,
    },
    /// Sequence items are nested deeper than allowed
    #[snafu(display("Data set at position {} is nested deeper than {} levels", position, max_depth))]
    TooDeep {
        position: usize,
        max_depth: usize,
        backtrace: Backtrace,
    },
}
