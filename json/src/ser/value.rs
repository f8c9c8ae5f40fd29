//! DICOM value decoding

use byteordered::ByteOrdered;
use dicomix_core::{DataDictionary, DataSet, Element, NumericKind, VrClass, VrCode, VR};
use std::io;

use super::DataSetSerializer;
use crate::bulk::build_bulk_data_uri;
use crate::output::{Number, OutputValue};
use crate::OutputOptions;

/// Decode the value of an element according to its VR class.
///
/// `depth` is the nesting depth of the data set holding the element,
/// starting at 0 for the top level data set.
/// A sequence whose items would lie deeper than the maximum sequence depth
/// is written as a bulk data reference instead.
pub(crate) fn decode_value<D>(
    serializer: &DataSetSerializer<'_, D>,
    dataset: &DataSet<'_>,
    element: &Element<'_>,
    vr: Option<VrCode>,
    class: VrClass,
    depth: usize,
) -> OutputValue
where
    D: DataDictionary,
{
    let options = serializer.options();
    match class {
        VrClass::Text => match dataset.value_bytes(element) {
            Some(bytes) => OutputValue::String(decode_text(bytes, vr)),
            None => out_of_range(element, options),
        },
        VrClass::Numeric(kind) => match dataset.value_bytes(element) {
            Some(bytes) => decode_numbers(element, bytes, kind, options),
            None => out_of_range(element, options),
        },
        VrClass::Binary | VrClass::Unknown => bulk_data(element, options),
        VrClass::Sequence => {
            let depth = depth + 1;
            if depth > options.max_sequence_depth {
                tracing::warn!(
                    "Sequence {} is nested deeper than {} levels, writing it as bulk data",
                    element.tag,
                    options.max_sequence_depth
                );
                return bulk_data(element, options);
            }
            let items = element.items.as_deref().unwrap_or_default();
            OutputValue::Sequence(
                items
                    .iter()
                    .map(|item| serializer.serialize_at(item, depth))
                    .collect(),
            )
        }
    }
}

/// Build a bulk data reference to the element's value.
pub(crate) fn bulk_data(element: &Element<'_>, options: &OutputOptions) -> OutputValue {
    OutputValue::BulkData {
        uri: build_bulk_data_uri(
            options.effective_bulk_data_root(),
            element.data_offset as u64,
            u64::from(element.length),
        ),
    }
}

fn out_of_range(element: &Element<'_>, options: &OutputOptions) -> OutputValue {
    tracing::warn!(
        "Value of element {} at offset {} with length {} lies outside the source buffer",
        element.tag,
        element.data_offset,
        element.length
    );
    bulk_data(element, options)
}

/// Extract a textual value.
///
/// The text ends at the first NUL byte, if any.
/// Trailing space padding is removed,
/// and so are leading spaces, except for the text VRs (LT, ST, UT)
/// in which they are significant.
/// Backslashes separating multiple values are kept as they are.
fn decode_text(bytes: &[u8], vr: Option<VrCode>) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text = String::from_utf8_lossy(&bytes[..end]);
    let text = text.trim_end_matches(' ');
    match vr.and_then(VrCode::to_vr) {
        Some(VR::LT) | Some(VR::ST) | Some(VR::UT) => text.to_string(),
        _ => text.trim_start_matches(' ').to_string(),
    }
}

fn decode_numbers(
    element: &Element<'_>,
    bytes: &[u8],
    kind: NumericKind,
    options: &OutputOptions,
) -> OutputValue {
    let width = kind.byte_width();
    if bytes.len() % width != 0 {
        tracing::warn!(
            "Length {} of element {} is not a multiple of {}, ignoring the last {} bytes",
            element.length,
            element.tag,
            width,
            bytes.len() % width
        );
    }

    let mut numbers = match read_numbers(bytes, kind) {
        Ok(numbers) => numbers,
        Err(e) => {
            tracing::warn!("Could not read numbers of element {}: {}", element.tag, e);
            return bulk_data(element, options);
        }
    };

    if numbers.len() == 1 && !options.use_array_with_single_value {
        if let Some(number) = numbers.pop() {
            return OutputValue::Number(number);
        }
    }
    OutputValue::Numbers(numbers)
}

/// Read as many whole little endian numbers of the given kind as fit.
fn read_numbers(bytes: &[u8], kind: NumericKind) -> io::Result<Vec<Number>> {
    let count = bytes.len() / kind.byte_width();
    let mut source = ByteOrdered::le(bytes);
    (0..count)
        .map(|_| {
            Ok(match kind {
                NumericKind::U16 => source.read_u16()?.into(),
                NumericKind::I16 => source.read_i16()?.into(),
                NumericKind::U32 => source.read_u32()?.into(),
                NumericKind::I32 => source.read_i32()?.into(),
                NumericKind::F32 => source.read_f32()?.into(),
                NumericKind::F64 => source.read_f64()?.into(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_padding_is_removed() {
        let cs = Some(VrCode::from(VR::CS));
        assert_eq!(decode_text(b"CT", cs), "CT");
        assert_eq!(decode_text(b"ORIGINAL\\PRIMARY ", cs), "ORIGINAL\\PRIMARY");
        assert_eq!(decode_text(b" 42 ", Some(VR::IS.into())), "42");
        assert_eq!(decode_text(b"1.2.840.10008.1.2.1\0", Some(VR::UI.into())), "1.2.840.10008.1.2.1");
        assert_eq!(decode_text(b"  indented  ", Some(VR::LT.into())), "  indented");
        assert_eq!(decode_text("Simões^João".as_bytes(), Some(VR::PN.into())), "Simões^João");
        assert_eq!(decode_text(b"", None), "");
    }

    #[test]
    fn read_numbers_of_each_kind() {
        assert_eq!(
            read_numbers(&[0x01, 0x00, 0xFF, 0xFF], NumericKind::U16).unwrap(),
            vec![Number::Unsigned(1), Number::Unsigned(0xFFFF)]
        );
        assert_eq!(
            read_numbers(&[0xFF, 0xFF], NumericKind::I16).unwrap(),
            vec![Number::Signed(-1)]
        );
        assert_eq!(
            read_numbers(&[0x08, 0x00, 0x60, 0x00], NumericKind::U32).unwrap(),
            vec![Number::Unsigned(0x0060_0008)]
        );
        assert_eq!(
            read_numbers(&(-5_i32).to_le_bytes(), NumericKind::I32).unwrap(),
            vec![Number::Signed(-5)]
        );
        assert_eq!(
            read_numbers(&1.5_f32.to_le_bytes(), NumericKind::F32).unwrap(),
            vec![Number::Float(1.5)]
        );
        assert_eq!(
            read_numbers(&(-0.25_f64).to_le_bytes(), NumericKind::F64).unwrap(),
            vec![Number::Float(-0.25)]
        );
    }

    #[test]
    fn trailing_bytes_are_dropped() {
        let bytes = [0x01, 0x00, 0x02, 0x00, 0x03];
        assert_eq!(
            read_numbers(&bytes, NumericKind::U16).unwrap(),
            vec![Number::Unsigned(1), Number::Unsigned(2)]
        );
        assert_eq!(read_numbers(&bytes[..1], NumericKind::U16).unwrap(), vec![]);
    }
}
