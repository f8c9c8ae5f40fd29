//! This module contains the basic header types of a DICOM data element:
//! attribute tags and value representations.
//!
//! Value representations come in two forms here.
//! [`VR`] is the closed set of codes defined by the standard,
//! whereas [`VrCode`] holds whatever two characters were found
//! in the source, so that unknown or vendor specific codes
//! can still be carried around and classified.

use snafu::{ensure, OptionExt, Snafu};
use std::fmt;
use std::str::{from_utf8, FromStr};

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// The data type for DICOM data element tags.
///
/// The canonical textual form of a tag in this library
/// is a string of 8 lowercase hexadecimal digits
/// (group followed by element, e.g. `"7fe00010"`),
/// which can be obtained via [`Tag::to_canonical`].
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }

    /// Whether this tag is a group length tag (element number `0000`).
    #[inline]
    pub fn is_group_length(self) -> bool {
        self.1 == 0x0000
    }

    /// Whether this tag belongs to a private group,
    /// which by convention have an odd group number.
    #[inline]
    pub fn is_private(self) -> bool {
        self.0 & 1 == 1
    }

    /// Whether this tag falls in the file meta information range,
    /// that is, all tags up to and including `(0002,FFFF)`.
    #[inline]
    pub fn is_file_meta(self) -> bool {
        self.0 <= 0x0002
    }

    /// Format the tag in its canonical key form:
    /// 8 lowercase hexadecimal digits with no separators.
    pub fn to_canonical(self) -> String {
        format!("{:04x}{:04x}", self.0, self.1)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}

/// An enum type for a DICOM value representation.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub enum VR {
    /// Application Entity
    AE,
    /// Age String
    AS,
    /// Attribute Tag
    AT,
    /// Code String
    CS,
    /// Date
    DA,
    /// Decimal String
    DS,
    /// Date Time
    DT,
    /// Floating Point Single
    FL,
    /// Floating Point Double
    FD,
    /// Integer String
    IS,
    /// Long String
    LO,
    /// Long Text
    LT,
    /// Other Byte
    OB,
    /// Other Double
    OD,
    /// Other Float
    OF,
    /// Other Long
    OL,
    /// Other Very Long
    OV,
    /// Other Word
    OW,
    /// Person Name
    PN,
    /// Short String
    SH,
    /// Signed Long
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short
    SS,
    /// Short Text
    ST,
    /// Signed Very Long
    SV,
    /// Time
    TM,
    /// Unlimited Characters
    UC,
    /// Unique Identifier (UID)
    UI,
    /// Unsigned Long
    UL,
    /// Unknown
    UN,
    /// Universal Resource Identifier or Universal Resource Locator (URI/URL)
    UR,
    /// Unsigned Short
    US,
    /// Unlimited Text
    UT,
    /// Unsigned Very Long
    UV,
}

impl VR {
    /// Obtain the value representation corresponding to the given two bytes.
    /// Each byte should represent an alphabetic character in upper case.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        from_utf8(chars.as_ref())
            .ok()
            .and_then(|s| VR::from_str(s).ok())
    }

    /// Retrieve a string representation of this VR.
    pub fn to_string(self) -> &'static str {
        use VR::*;
        match self {
            AE => "AE",
            AS => "AS",
            AT => "AT",
            CS => "CS",
            DA => "DA",
            DS => "DS",
            DT => "DT",
            FL => "FL",
            FD => "FD",
            IS => "IS",
            LO => "LO",
            LT => "LT",
            OB => "OB",
            OD => "OD",
            OF => "OF",
            OL => "OL",
            OV => "OV",
            OW => "OW",
            PN => "PN",
            SH => "SH",
            SL => "SL",
            SQ => "SQ",
            SS => "SS",
            ST => "ST",
            SV => "SV",
            TM => "TM",
            UC => "UC",
            UI => "UI",
            UL => "UL",
            UN => "UN",
            UR => "UR",
            US => "US",
            UT => "UT",
            UV => "UV",
        }
    }

    /// Retrieve a copy of this VR's byte representation.
    /// The function returns two alphabetic characters in upper case.
    pub fn to_bytes(self) -> [u8; 2] {
        let bytes = self.to_string().as_bytes();
        [bytes[0], bytes[1]]
    }
}

/// Obtain the value representation corresponding to the given string.
/// The string should hold exactly two UTF-8 encoded alphabetic characters
/// in upper case, otherwise no match is made.
impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> std::result::Result<Self, Self::Err> {
        use VR::*;
        match string {
            "AE" => Ok(AE),
            "AS" => Ok(AS),
            "AT" => Ok(AT),
            "CS" => Ok(CS),
            "DA" => Ok(DA),
            "DS" => Ok(DS),
            "DT" => Ok(DT),
            "FL" => Ok(FL),
            "FD" => Ok(FD),
            "IS" => Ok(IS),
            "LO" => Ok(LO),
            "LT" => Ok(LT),
            "OB" => Ok(OB),
            "OD" => Ok(OD),
            "OF" => Ok(OF),
            "OL" => Ok(OL),
            "OV" => Ok(OV),
            "OW" => Ok(OW),
            "PN" => Ok(PN),
            "SH" => Ok(SH),
            "SL" => Ok(SL),
            "SQ" => Ok(SQ),
            "SS" => Ok(SS),
            "ST" => Ok(ST),
            "SV" => Ok(SV),
            "TM" => Ok(TM),
            "UC" => Ok(UC),
            "UI" => Ok(UI),
            "UL" => Ok(UL),
            "UN" => Ok(UN),
            "UR" => Ok(UR),
            "US" => Ok(US),
            "UT" => Ok(UT),
            "UV" => Ok(UV),
            _ => Err("no such value representation"),
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(VR::to_string(*self))
    }
}

/// Error type for a value representation code
/// which is not made of two printable ASCII characters.
#[derive(Debug, Snafu)]
#[snafu(display("invalid value representation code {:?}", code))]
pub struct ParseVrError {
    code: String,
}

/// A value representation code as found in the source data,
/// which may or may not be one of the standard [`VR`]s.
#[derive(Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub struct VrCode([u8; 2]);

impl VrCode {
    /// Create a VR code from its two raw bytes.
    ///
    /// Returns `None` if any of the bytes is not a printable ASCII character.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        if chars.iter().all(|c| c.is_ascii_graphic()) {
            Some(VrCode(chars))
        } else {
            None
        }
    }

    /// Retrieve the standard value representation behind this code, if any.
    pub fn to_vr(self) -> Option<VR> {
        VR::from_binary(self.0)
    }

    /// View the code as a string slice.
    pub fn as_str(&self) -> &str {
        // only printable ASCII is ever stored
        from_utf8(&self.0).unwrap_or("??")
    }

    /// Retrieve a copy of the code's two bytes.
    pub fn to_bytes(self) -> [u8; 2] {
        self.0
    }
}

impl From<VR> for VrCode {
    fn from(vr: VR) -> Self {
        VrCode(vr.to_bytes())
    }
}

impl FromStr for VrCode {
    type Err = ParseVrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        ensure!(bytes.len() == 2, ParseVrSnafu { code: s });
        VrCode::from_binary([bytes[0], bytes[1]]).context(ParseVrSnafu { code: s })
    }
}

impl PartialEq<VR> for VrCode {
    fn eq(&self, other: &VR) -> bool {
        self.0 == other.to_bytes()
    }
}

impl fmt::Debug for VrCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "VrCode({})", self.as_str())
    }
}

impl fmt::Display for VrCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_predicates() {
        assert!(Tag(0x0008, 0x0000).is_group_length());
        assert!(!Tag(0x0008, 0x0060).is_group_length());
        assert!(Tag(0x0009, 0x1002).is_private());
        assert!(!Tag(0x0010, 0x0010).is_private());
        assert!(Tag(0x0002, 0x0010).is_file_meta());
        assert!(Tag(0x0002, 0xFFFF).is_file_meta());
        assert!(!Tag(0x0003, 0x0000).is_file_meta());
    }

    #[test]
    fn tag_formatting() {
        let tag = Tag(0x7FE0, 0x0010);
        assert_eq!(tag.to_canonical(), "7fe00010");
        assert_eq!(tag.to_string(), "(7FE0,0010)");
        assert_eq!(format!("{:?}", tag), "Tag(0x7FE0, 0x0010)");
    }

    #[test]
    fn vr_codes_keep_unknown_values() {
        let code: VrCode = "CS".parse().unwrap();
        assert_eq!(code.to_vr(), Some(VR::CS));
        assert_eq!(code, VR::CS);

        let code: VrCode = "XY".parse().unwrap();
        assert_eq!(code.to_vr(), None);
        assert_eq!(code.as_str(), "XY");

        assert!("C".parse::<VrCode>().is_err());
        assert!("CSV".parse::<VrCode>().is_err());
        assert!(VrCode::from_binary([0x00, 0x41]).is_none());
    }
}
