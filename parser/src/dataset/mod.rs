//! Parsing of complete DICOM files and data sets.

use dicomix_core::DataSet;

use crate::decode::HeaderDecoder;
use crate::error::Result;
use crate::transfer_syntax::{body_decoder, trim_uid, IMPLICIT_VR_LITTLE_ENDIAN};
use crate::ParseOptions;

pub mod read;

pub use self::read::DataSetReader;

/// The length of the preamble at the start of a DICOM file.
pub const PREAMBLE_LENGTH: usize = 128;

/// The magic code following the preamble.
pub const DICM_MAGIC_CODE: [u8; 4] = *b"DICM";

/// The canonical key of the Transfer Syntax UID element.
const TRANSFER_SYNTAX_UID: &str = "00020010";

/// Determine where the first data element starts,
/// skipping the preamble and magic code if present.
///
/// The preamble is optional,
/// and so is the magic code in data sets which are not files.
pub fn data_set_start(bytes: &[u8]) -> usize {
    let magic_end = PREAMBLE_LENGTH + DICM_MAGIC_CODE.len();
    if bytes.get(PREAMBLE_LENGTH..magic_end) == Some(&DICM_MAGIC_CODE[..]) {
        magic_end
    } else if bytes.starts_with(&DICM_MAGIC_CODE) {
        DICM_MAGIC_CODE.len()
    } else {
        0
    }
}

/// Parse a DICOM file or data set, with the default options.
pub fn parse(bytes: &[u8]) -> Result<DataSet<'_>> {
    parse_with_options(bytes, &ParseOptions::default())
}

/// Parse a DICOM file or data set.
///
/// The file meta group, if present, is always read in Explicit VR Little Endian,
/// and the rest of the data set is read in the transfer syntax it declares.
/// Without a file meta group,
/// the transfer syntax in the options is assumed,
/// which is Implicit VR Little Endian unless set otherwise.
///
/// The file meta group elements are part of the returned data set.
pub fn parse_with_options<'a>(bytes: &'a [u8], options: &ParseOptions) -> Result<DataSet<'a>> {
    let mut reader = DataSetReader::new(bytes, data_set_start(bytes), options)?;
    let mut dataset = DataSet::new(bytes);

    let decoder = if reader.next_in_group(0x0002)? {
        reader.read_group(&mut dataset, HeaderDecoder::explicit_le(), 0x0002)?;
        let uid = dataset
            .get(TRANSFER_SYNTAX_UID)
            .and_then(|e| dataset.value_bytes(e))
            .map(String::from_utf8_lossy);
        match uid {
            Some(uid) => {
                tracing::debug!("Reading data set in transfer syntax {}", trim_uid(&uid));
                body_decoder(&uid)?
            }
            None => {
                tracing::warn!("File meta group has no transfer syntax, assuming the default");
                fallback_decoder(options)?
            }
        }
    } else {
        fallback_decoder(options)?
    };

    reader.read_to_end(&mut dataset, decoder)?;
    Ok(dataset)
}

fn fallback_decoder(options: &ParseOptions) -> Result<HeaderDecoder> {
    body_decoder(
        options
            .transfer_syntax
            .as_deref()
            .unwrap_or(IMPLICIT_VR_LITTLE_ENDIAN),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_data_set_start() {
        let mut file = vec![0_u8; 128];
        file.extend_from_slice(b"DICM\x02\x00\x00\x00");
        assert_eq!(data_set_start(&file), 132);
        assert_eq!(data_set_start(b"DICM\x02\x00"), 4);
        assert_eq!(data_set_start(&[0x08, 0x00, 0x60, 0x00]), 0);
        assert_eq!(data_set_start(&[]), 0);
    }
}
