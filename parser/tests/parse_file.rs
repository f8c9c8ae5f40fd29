//! Parsing hand-crafted DICOM files and serializing the outcome.

use dicomix_core::VR;
use dicomix_dictionary_std::registry;
use dicomix_json::OutputOptions;
use dicomix_parser::{parse, parse_with_options, Error, ParseOptions};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Encode a data element in Explicit VR Little Endian.
fn explicit(group: u16, element: u16, vr: VR, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&group.to_le_bytes());
    out.extend_from_slice(&element.to_le_bytes());
    out.extend_from_slice(&vr.to_bytes());
    match vr {
        VR::OB | VR::OW | VR::SQ | VR::UN | VR::UT => {
            out.extend_from_slice(&[0, 0]);
            out.extend_from_slice(&(value.len() as u32).to_le_bytes());
        }
        _ => out.extend_from_slice(&(value.len() as u16).to_le_bytes()),
    }
    out.extend_from_slice(value);
    out
}

/// Encode a data element in Implicit VR Little Endian.
fn implicit(group: u16, element: u16, length: u32, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&group.to_le_bytes());
    out.extend_from_slice(&element.to_le_bytes());
    out.extend_from_slice(&length.to_le_bytes());
    out.extend_from_slice(value);
    out
}

fn delimiter(element: u16, length: u32) -> Vec<u8> {
    implicit(0xFFFE, element, length, &[])
}

/// A file with preamble and file meta group in the given transfer syntax.
fn file_header(transfer_syntax: &[u8]) -> Vec<u8> {
    let uid = explicit(0x0002, 0x0010, VR::UI, transfer_syntax);
    let mut out = vec![0_u8; 128];
    out.extend_from_slice(b"DICM");
    out.extend(explicit(0x0002, 0x0000, VR::UL, &(uid.len() as u32).to_le_bytes()));
    out.extend(uid);
    out
}

#[test]
fn parse_explicit_vr_file() {
    let mut file = file_header(b"1.2.840.10008.1.2.1\0");
    file.extend(explicit(0x0008, 0x0060, VR::CS, b"MR"));
    // sequence of undefined length, one item of undefined length
    file.extend_from_slice(&[0x08, 0x00, 0x15, 0x11, b'S', b'Q', 0, 0]);
    file.extend_from_slice(&0xFFFF_FFFF_u32.to_le_bytes());
    file.extend(delimiter(0xE000, 0xFFFF_FFFF));
    file.extend(explicit(0x0020, 0x000E, VR::UI, b"1.2.3\0"));
    file.extend(delimiter(0xE00D, 0));
    file.extend(delimiter(0xE0DD, 0));
    file.extend(explicit(0x0010, 0x0010, VR::PN, b"Doe^Jane"));
    file.extend(explicit(0x0028, 0x0010, VR::US, &512_u16.to_le_bytes()));
    file.extend(explicit(0x7FE0, 0x0010, VR::OW, &[0x11; 8]));
    let pixel_data_offset = file.len() - 8;

    let dataset = parse(&file).unwrap();
    assert_eq!(dataset.len(), 7);
    let pixel_data = dataset.get("7fe00010").unwrap();
    assert_eq!(pixel_data.data_offset, pixel_data_offset);
    assert_eq!(pixel_data.vr, Some(VR::OW.into()));

    let mut options = OutputOptions::new();
    options.ignore_group_length(true).ignore_meta_header(true);
    let output = dicomix_json::serialize(&dataset, &options, registry().unwrap());
    assert_eq!(
        output.keys().collect::<Vec<_>>(),
        vec![
            "Modality",
            "ReferencedSeriesSequence",
            "PatientName",
            "Rows",
            "PixelData"
        ],
    );
    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!({
            "Modality": "MR",
            "ReferencedSeriesSequence": [
                { "SeriesInstanceUID": "1.2.3" }
            ],
            "PatientName": "Doe^Jane",
            "Rows": 512,
            "PixelData": {
                "BulkDataURI": format!("?offset={}&length=8", pixel_data_offset)
            },
        })
    );
}

#[test]
fn parse_implicit_vr_data_set() {
    // no preamble, no file meta group
    let mut bytes = implicit(0x0008, 0x0060, 2, b"CT");
    bytes.extend(implicit(0x0010, 0x0020, 6, b"ID0042"));
    // sequence of defined length, detected by its first item
    let item = implicit(0x0008, 0x1150, 4, b"1.2\0");
    let mut items = delimiter(0xE000, item.len() as u32);
    items.extend(item);
    bytes.extend(implicit(0x0008, 0x1140, items.len() as u32, &items));

    let dataset = parse(&bytes).unwrap();
    let sequence = dataset.get("00081140").unwrap();
    assert_eq!(sequence.vr, Some(VR::SQ.into()));
    assert_eq!(sequence.items.as_ref().map(Vec::len), Some(1));

    let mut options = OutputOptions::new();
    options.use_common_names(false);
    let value = dicomix_json::to_value(&dataset, &options, registry().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "00080060": "CT",
            "00081140": [{ "00081150": "1.2" }],
            "00100020": "ID0042",
        })
    );
}

#[test]
fn implicit_transfer_syntax_in_file_meta() {
    let mut file = file_header(b"1.2.840.10008.1.2\0");
    file.extend(implicit(0x0028, 0x0010, 2, &256_u16.to_le_bytes()));

    let dataset = parse(&file).unwrap();
    let rows = dataset.get("00280010").unwrap();
    assert_eq!(rows.vr, None);

    let mut options = OutputOptions::new();
    options.ignore_meta_header(true);
    let value = dicomix_json::to_value(&dataset, &options, registry().unwrap()).unwrap();
    assert_eq!(value, json!({ "Rows": 256 }));
}

#[test]
fn assumed_transfer_syntax_without_file_meta() {
    let bytes = explicit(0x0008, 0x0060, VR::CS, b"US");
    let mut options = ParseOptions::new();
    options.transfer_syntax("1.2.840.10008.1.2.1");
    let dataset = parse_with_options(&bytes, &options).unwrap();
    let modality = dataset.get("00080060").unwrap();
    assert_eq!(modality.vr, Some(VR::CS.into()));
    assert_eq!(dataset.value_bytes(modality), Some(&b"US"[..]));
}

#[test]
fn big_endian_is_unsupported() {
    let mut file = file_header(b"1.2.840.10008.1.2.2\0");
    file.extend_from_slice(&[0x00, 0x08, 0x00, 0x60, b'C', b'S', 0x00, 0x02, b'C', b'T']);
    match parse(&file) {
        Err(Error::UnsupportedTransferSyntax { uid, .. }) => {
            assert_eq!(uid, "1.2.840.10008.1.2.2")
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn truncated_file_is_an_error() {
    let mut file = file_header(b"1.2.840.10008.1.2.1\0");
    file.extend(explicit(0x0010, 0x0010, VR::PN, b"Doe^Jane"));
    file.truncate(file.len() - 3);
    assert!(matches!(parse(&file), Err(Error::UnexpectedEnd { .. })));
}
