//! The tag octets of a BER-TLV encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::decode::{BytesSource, DecodeError, DecodeErrorKind};


//------------ Tag -----------------------------------------------------------

/// The tag of a BER-TLV encoded value.
///
/// Each value starts with one or more octets called the _identifier
/// octets._ They encode the class of the tag, whether the value uses
/// primitive or constructed encoding, and the tag number. Unlike the tags
/// of ASN.1 proper, tags in BER-TLV data used by smart cards and payment
/// applications are generally treated as opaque octet sequences and
/// written in hex, e.g., `9F02` or `E1`. The `Tag` type follows this
/// convention and keeps the identifier octets as they appear in the data,
/// including the constructed bit.
///
/// # Limitations
///
/// We only support tags of up to two octets. A two-octet tag is stored
/// with its first octet in the upper half of the `u16`, so every value
/// greater than `0xFF` is a two-octet tag.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag(u16);

impl Tag {
    /// The mask for checking the class.
    const CLASS_MASK: u8 = 0xc0;

    /// The mask for checking whether the value is constructed.
    ///
    /// A value of 0 indicates primitive.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The mask for the tag number in the first octet.
    ///
    /// If all these bits are set, the tag number follows in the next octet.
    const SINGLEBYTE_DATA_MASK: u8 = 0x1f;

    /// The mask for the tag number in subsequent octets.
    const MULTIBYTE_DATA_MASK: u8 = 0x7f;

    /// The mask for the continuation bit in subsequent octets.
    ///
    /// It is cleared in the last octet.
    const LAST_OCTET_MASK: u8 = 0x80;
}

impl Tag {
    /// Creates a tag from its identifier octets as an integer.
    pub const fn new(value: u16) -> Self {
        Tag(value)
    }

    /// Returns the identifier octets as an integer.
    pub const fn to_u16(self) -> u16 {
        self.0
    }

    /// Returns the first identifier octet.
    ///
    /// This is the octet that carries the class and the constructed bit.
    pub fn first_octet(self) -> u8 {
        if self.0 > 0xFF {
            (self.0 >> 8) as u8
        }
        else {
            self.0 as u8
        }
    }

    /// Returns the class of the tag.
    pub fn class(self) -> Class {
        Class::from_octet(self.first_octet())
    }

    /// Returns whether the tag marks a constructed value.
    ///
    /// The content of a constructed value is a sequence of nested values.
    pub fn is_constructed(self) -> bool {
        self.first_octet() & Tag::CONSTRUCTED_MASK != 0
    }

    /// Returns whether the tag marks a primitive value.
    pub fn is_primitive(self) -> bool {
        !self.is_constructed()
    }

    /// Returns the number of the tag within its class.
    pub fn number(self) -> u8 {
        if self.0 > 0xFF {
            self.0 as u8 & Tag::MULTIBYTE_DATA_MASK
        }
        else {
            self.0 as u8 & Tag::SINGLEBYTE_DATA_MASK
        }
    }

    /// Returns the number of octets of the encoded form of the tag.
    pub fn encoded_len(self) -> usize {
        if self.0 > 0xFF { 2 } else { 1 }
    }

    /// Appends the encoded tag to the end of `target`.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        if self.0 > 0xFF {
            target.extend_from_slice(&self.0.to_be_bytes())
        }
        else {
            target.push(self.0 as u8)
        }
    }

    /// Takes a tag from the beginning of a source.
    ///
    /// If the five lower bits of the first octet are all set, the tag
    /// continues with a second octet. If that octet has its most
    /// significant bit set, yet another octet would follow which we don’t
    /// support.
    pub fn take_from(source: &mut BytesSource) -> Result<Self, DecodeError> {
        let pos = source.pos();
        let first = source.take_u8()?;
        if first & Tag::SINGLEBYTE_DATA_MASK != Tag::SINGLEBYTE_DATA_MASK {
            return Ok(Tag(u16::from(first)))
        }
        let second = source.take_u8()?;
        if second & Tag::LAST_OCTET_MASK != 0 {
            return Err(DecodeError::new(DecodeErrorKind::UnsupportedTag, pos))
        }
        Ok(Tag(u16::from_be_bytes([first, second])))
    }
}


//--- From

impl From<u16> for Tag {
    fn from(value: u16) -> Self {
        Tag(value)
    }
}

impl From<Tag> for u16 {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}


//--- Display and Debug

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 > 0xFF {
            write!(f, "{:04X}", self.0)
        }
        else {
            write!(f, "{:02X}", self.0)
        }
    }
}

impl fmt::UpperHex for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
///
/// The class is encoded in the two most significant bits of the first
/// identifier octet.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    /// The tag value representing the ‘universal’ class.
    const UNIVERSAL: u8 = 0x00;

    /// The tag value representing the ‘application’ class.
    const APPLICATION: u8 = 0x40;

    /// The tag value representing the ‘context-specific’ class.
    const CONTEXT_SPECIFIC: u8 = 0x80;

    /// The tag value representing the `private` class.
    const PRIVATE: u8 = 0xc0;

    fn from_octet(octet: u8) -> Self {
        match octet & Tag::CLASS_MASK {
            Class::PRIVATE => Class::Private,
            Class::CONTEXT_SPECIFIC => Class::Context,
            Class::APPLICATION => Class::Application,
            _ => Class::Universal,
        }
    }

    /// Returns the class bits as they appear in the first identifier octet.
    pub fn into_u8(self) -> u8 {
        match self {
            Class::Universal => Class::UNIVERSAL,
            Class::Application => Class::APPLICATION,
            Class::Context => Class::CONTEXT_SPECIFIC,
            Class::Private => Class::PRIVATE,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Class::Universal => "universal",
            Class::Application => "application",
            Class::Context => "context-specific",
            Class::Private => "private",
        })
    }
}


//============ Tests =========================================================
