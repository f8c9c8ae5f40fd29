//! Transfer syntax identification.
//!
//! Only little endian encodings are read.
//! Encapsulated (compressed) transfer syntaxes are read as Explicit VR Little Endian,
//! their pixel data fragments being kept as an opaque value.

use snafu::ensure;

use crate::decode::HeaderDecoder;
use crate::error::{Result, UnsupportedTransferSyntaxSnafu};

/// Implicit VR Little Endian, the default transfer syntax
pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
/// Explicit VR Little Endian
pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
/// Deflated Explicit VR Little Endian (not supported)
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1.99";
/// Explicit VR Big Endian (retired, not supported)
pub const EXPLICIT_VR_BIG_ENDIAN: &str = "1.2.840.10008.1.2.2";

/// Trim the padding of a UID value.
pub fn trim_uid(uid: &str) -> &str {
    uid.trim_end_matches(|c: char| c == '\0' || c == ' ')
        .trim_start_matches(' ')
}

/// Obtain the header decoder for the data set body
/// encoded with the given transfer syntax.
pub fn body_decoder(uid: &str) -> Result<HeaderDecoder> {
    let uid = trim_uid(uid);
    ensure!(
        uid != EXPLICIT_VR_BIG_ENDIAN && uid != DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
        UnsupportedTransferSyntaxSnafu { uid }
    );
    if uid == IMPLICIT_VR_LITTLE_ENDIAN {
        Ok(HeaderDecoder::implicit_le())
    } else {
        Ok(HeaderDecoder::explicit_le())
    }
}
