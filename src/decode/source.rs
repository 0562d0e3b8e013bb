//! The source of encoded data.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::{Buf, Bytes};
use super::error::DecodeError;


//------------ BytesSource ---------------------------------------------------

/// A source of encoded data atop a `Bytes` value.
///
/// Every read is checked against the end of the data, so running out of
/// octets results in a truncated input error rather than a panic. Taking
/// a range of octets hands out a slice of the underlying `Bytes` and thus
/// doesn’t copy anything.
///
/// The source keeps track of its position relative to the start of the
/// complete data it was originally created from, including for sources
/// created via [`take_limited`][Self::take_limited].
#[derive(Clone, Debug)]
pub struct BytesSource {
    /// The remaining data.
    data: Bytes,

    /// The position of the first octet of `data`.
    pos: usize,
}

impl BytesSource {
    /// Creates a new source from the given data.
    pub fn new(data: Bytes) -> Self {
        BytesSource { data, pos: 0 }
    }

    /// Returns the current logical position.
    pub fn pos(&self) -> Pos {
        self.pos.into()
    }

    /// Returns the remaining data.
    pub fn remaining(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Returns whether all data has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.data.is_empty()
    }

    /// Skips over all zero octets at the start of the data.
    ///
    /// Returns the number of octets skipped.
    pub fn skip_padding(&mut self) -> usize {
        let len = self.data.iter().take_while(|&&octet| octet == 0).count();
        self.advance(len);
        len
    }

    /// Takes a single octet from the source.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        match self.data.first().copied() {
            Some(octet) => {
                self.advance(1);
                Ok(octet)
            }
            None => Err(DecodeError::truncated(self.pos()))
        }
    }

    /// Takes exactly `len` octets from the source.
    pub fn take_bytes(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        if self.data.len() < len {
            return Err(DecodeError::truncated(self.pos()))
        }
        let res = self.data.split_to(len);
        self.pos += len;
        Ok(res)
    }

    /// Takes exactly `len` octets and returns them as a new source.
    ///
    /// The new source starts at the current position. This source advances
    /// past all the octets whether the new source is used or not.
    pub fn take_limited(&mut self, len: usize) -> Result<Self, DecodeError> {
        let pos = self.pos;
        self.take_bytes(len).map(|data| BytesSource { data, pos })
    }

    /// Converts the source into the remaining data.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    fn advance(&mut self, len: usize) {
        self.data.advance(len);
        self.pos += len;
    }
}


//------------ Pos -----------------------------------------------------------

/// The offset of an octet from the start of the decoded data.
///
/// Positions are only reported in errors and log messages.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//============ Tests =========================================================
