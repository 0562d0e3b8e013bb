//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt};
use super::source::Pos;


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding BER-TLV data.
///
/// The error contains both the kind of problem encountered and the position
/// within the decoded data where it happened. The position is only useful
/// for diagnostics.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeError {
    /// What went wrong.
    kind: DecodeErrorKind,

    /// The position of the offending octets.
    pos: Pos,
}

impl DecodeError {
    /// Creates a new error of the given kind at the given position.
    pub fn new(kind: DecodeErrorKind, pos: Pos) -> Self {
        DecodeError { kind, pos }
    }

    /// Creates an error for data ending before the encoding says it should.
    pub fn truncated(pos: Pos) -> Self {
        Self::new(DecodeErrorKind::TruncatedInput, pos)
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// Returns the position where the error happened.
    pub fn pos(&self) -> Pos {
        self.pos
    }
}


//--- Display and Error

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.pos)
    }
}

impl error::Error for DecodeError { }


//------------ DecodeErrorKind -----------------------------------------------

/// The kinds of problems the decoder can run into.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DecodeErrorKind {
    /// The data ended before a tag, length, or value was complete.
    ///
    /// This includes a nested value running past the end of the content of
    /// the constructed value it is part of.
    TruncatedInput,

    /// The tag needs more than two identifier octets.
    UnsupportedTag,

    /// The first length octet is the indefinite form or announces more
    /// than four length octets.
    UnsupportedLengthForm,

    /// Constructed values are nested deeper than the mode allows.
    ExcessiveDepth,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            DecodeErrorKind::TruncatedInput => "unexpected end of data",
            DecodeErrorKind::UnsupportedTag => "tag longer than two octets",
            DecodeErrorKind::UnsupportedLengthForm => {
                "unsupported length octets"
            }
            DecodeErrorKind::ExcessiveDepth => "nesting too deep",
        })
    }
}


//============ Tests =========================================================
