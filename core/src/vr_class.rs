//! Classification of value representations into decoding classes.
//!
//! Every VR code maps to exactly one [`VrClass`],
//! which decides how the element's value is to be decoded.
//! Codes outside of the known sets, including standard VRs
//! which are not given a dedicated class here (such as `OL` or `UV`),
//! are classified as [`VrClass::Unknown`] and decoded as binary data.

use crate::header::{VrCode, VR};

/// The decoding class of a value representation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VrClass {
    /// Textual values, extracted as a single string.
    Text,
    /// Fixed width binary numbers.
    Numeric(NumericKind),
    /// Binary payloads, never materialized inline.
    Binary,
    /// A sequence of nested data sets.
    Sequence,
    /// Any other code, decoded as binary.
    Unknown,
}

/// The primitive number type behind a numeric value representation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// 16-bit unsigned integer (US)
    U16,
    /// 16-bit signed integer (SS)
    I16,
    /// 32-bit unsigned integer (UL, AT)
    U32,
    /// 32-bit signed integer (SL)
    I32,
    /// 32-bit floating point (FL)
    F32,
    /// 64-bit floating point (FD)
    F64,
}

impl NumericKind {
    /// The number of bytes taken by each value of this kind.
    pub fn byte_width(self) -> usize {
        match self {
            NumericKind::U16 | NumericKind::I16 => 2,
            NumericKind::U32 | NumericKind::I32 | NumericKind::F32 => 4,
            NumericKind::F64 => 8,
        }
    }
}

impl VrClass {
    /// Classify the given VR code.
    pub fn of(code: VrCode) -> VrClass {
        match code.to_vr() {
            Some(vr) => VrClass::of_vr(vr),
            None => VrClass::Unknown,
        }
    }

    /// Classify a standard value representation.
    pub fn of_vr(vr: VR) -> VrClass {
        use VR::*;
        match vr {
            OB | OD | OF | OW | UN => VrClass::Binary,
            AT | UL => VrClass::Numeric(NumericKind::U32),
            FL => VrClass::Numeric(NumericKind::F32),
            FD => VrClass::Numeric(NumericKind::F64),
            SL => VrClass::Numeric(NumericKind::I32),
            SS => VrClass::Numeric(NumericKind::I16),
            US => VrClass::Numeric(NumericKind::U16),
            AE | AS | CS | DA | DS | DT | IS | LO | LT | PN | SH | ST | TM | UI | UT => {
                VrClass::Text
            }
            SQ => VrClass::Sequence,
            OL | OV | SV | UC | UR | UV => VrClass::Unknown,
        }
    }

    /// Classify an optional VR code,
    /// where the absence of a code yields [`VrClass::Unknown`].
    pub fn of_opt(code: Option<VrCode>) -> VrClass {
        code.map(VrClass::of).unwrap_or(VrClass::Unknown)
    }

    /// Whether values of this class are decoded as bulk binary data.
    #[inline]
    pub fn decodes_as_binary(self) -> bool {
        matches!(self, VrClass::Binary | VrClass::Unknown)
    }
}
