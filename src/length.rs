//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::decode::{BytesSource, DecodeError, DecodeErrorKind};


//------------ Length --------------------------------------------------------

/// The length octets of an encoded value.
///
/// BER-TLV data only uses definite lengths, i.e., the length always gives
/// the number of content octets of the value.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets are one octet long and the remaining bits of this
/// first octet provide the length. Thus, if the first octet is less than
/// 128, it provides the length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length, most significant octet first. We support between one and four
/// following octets, i.e., first octets `0x81` to `0x84`. The indefinite
/// form `0x80` and anything longer are rejected.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Length(u32);

impl Length {
    /// The largest length that can be encoded in the short form.
    const MAX_SHORT: u32 = 0x7F;

    /// The bit marking the long form in the first octet.
    const LONG_FORM_MASK: u8 = 0x80;

    /// Creates a new length.
    pub const fn new(len: u32) -> Self {
        Length(len)
    }

    /// Returns the length as an integer.
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// Returns whether the length is zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Takes the length octets from the beginning of a source.
    pub fn take_from(source: &mut BytesSource) -> Result<Self, DecodeError> {
        let pos = source.pos();
        match source.take_u8()? {
            n if n & Length::LONG_FORM_MASK == 0 => Ok(Length(u32::from(n))),
            n @ 0x81..=0x84 => {
                let mut res = 0u32;
                for _ in 0..(n & !Length::LONG_FORM_MASK) {
                    res = (res << 8) | u32::from(source.take_u8()?);
                }
                Ok(Length(res))
            }
            _ => {
                Err(DecodeError::new(
                    DecodeErrorKind::UnsupportedLengthForm, pos
                ))
            }
        }
    }

    /// Returns the number of octets of the encoded length.
    ///
    /// This is the size of the shortest possible encoding.
    pub fn encoded_len(self) -> usize {
        if self.0 > Length::MAX_SHORT {
            1 + self.significant_octets()
        }
        else {
            1
        }
    }

    /// Appends the encoded length to the end of `target`.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        if self.0 > Length::MAX_SHORT {
            let count = self.significant_octets();
            target.push(Length::LONG_FORM_MASK | count as u8);
            target.extend_from_slice(&self.0.to_be_bytes()[4 - count..])
        }
        else {
            target.push(self.0 as u8)
        }
    }

    /// Returns the number of octets needed for the big-endian length.
    fn significant_octets(self) -> usize {
        4 - (self.0.leading_zeros() / 8) as usize
    }
}


//--- From

impl From<u32> for Length {
    fn from(len: u32) -> Self {
        Length(len)
    }
}

impl From<Length> for u32 {
    fn from(len: Length) -> Self {
        len.0
    }
}


//--- Display

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use super::*;

    fn take_from(src: &[u8]) -> Result<u32, DecodeErrorKind> {
        let mut source = BytesSource::new(Bytes::copy_from_slice(src));
        let res = Length::take_from(&mut source).map_err(|err| err.kind())?;
        assert!(source.is_exhausted(), "trailing data for {:?}", src);
        Ok(res.to_u32())
    }

    #[test]
    fn take_lengths() {
        assert_eq!(take_from(b"\x00"), Ok(0x00));
        assert_eq!(take_from(b"\x12"), Ok(0x12));
        assert_eq!(take_from(b"\x7f"), Ok(0x7f));
        assert_eq!(take_from(b"\x81\x00"), Ok(0));
        assert_eq!(take_from(b"\x81\xF0"), Ok(0xF0));
        assert_eq!(take_from(b"\x82\x00\x00"), Ok(0));
        assert_eq!(take_from(b"\x82\xF0\x0E"), Ok(0xF00E));
        assert_eq!(take_from(b"\x83\x01\x00\x00"), Ok(0x10000));
        assert_eq!(take_from(b"\x84\xFF\xFF\xFF\xFF"), Ok(0xFFFF_FFFF));
    }

    #[test]
    fn take_failures() {
        assert_eq!(
            take_from(b"\x80"), Err(DecodeErrorKind::UnsupportedLengthForm)
        );
        assert_eq!(
            take_from(b"\x85\x00\x00\x00\x00\x01"),
            Err(DecodeErrorKind::UnsupportedLengthForm)
        );
        assert_eq!(
            take_from(b"\xFF"), Err(DecodeErrorKind::UnsupportedLengthForm)
        );
        assert_eq!(take_from(b"\x82\x01"), Err(DecodeErrorKind::TruncatedInput));
        assert_eq!(take_from(b""), Err(DecodeErrorKind::TruncatedInput));
    }

    #[test]
    fn encode() {
        fn step(len: u32, res: &[u8]) {
            let len = Length::new(len);
            let mut vec = Vec::new();
            len.append_encoded(&mut vec);
            assert_eq!(vec.as_slice(), res, "append failed for {:?}", len);
            assert_eq!(len.encoded_len(), res.len());
            assert_eq!(take_from(&vec), Ok(len.to_u32()));
        }

        step(0, b"\x00");
        step(0x12, b"\x12");
        step(0x7f, b"\x7f");
        step(0x80, b"\x81\x80");
        step(0xff, b"\x81\xff");
        step(0x7fff, b"\x82\x7f\xff");
        step(0x8000, b"\x82\x80\x00");
        step(0xdead, b"\x82\xde\xad");
        step(0x01_0000, b"\x83\x01\x00\x00");
        step(0xffff_ffff, b"\x84\xff\xff\xff\xff");
    }
}
