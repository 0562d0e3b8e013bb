//! The decoding modes.
//!
//! A mode determines how the decoder treats constructed values and how
//! deeply they may be nested. Modes are marker types implementing the
//! [`Mode`] trait, which also provides the decoding entry points.

use bytes::Bytes;
use crate::decode::{self, DecodeError};
use crate::tlv::Tlvs;


/// Basic Encoding Rules as used by BER-TLV data.
///
/// Constructed values only keep their nested values, not the raw content
/// octets.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ber;

/// Basic Encoding Rules with the value handling of older BER-TLV libraries.
///
/// Constructed values keep both their nested values and a copy of the raw
/// content octets as their value. Since values are slices of the decoded
/// data, the copy doesn’t cost an allocation.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Legacy;

/// One of the modes.
pub trait Mode: Sized {
    /// Do constructed values keep their raw content octets as the value?
    const RETAIN_CONSTRUCTED_VALUE: bool;

    /// How many levels of constructed values may be nested?
    ///
    /// The outermost value is at depth zero.
    const MAX_DEPTH: usize = 64;

    /// Decodes a sequence of values, keeping whatever is well-formed.
    ///
    /// See [`decode::decode_bytes`] for the details.
    fn decode(data: &[u8]) -> Tlvs {
        Self::decode_bytes(Bytes::copy_from_slice(data))
    }

    /// Decodes a sequence of values from a bytes value.
    ///
    /// The values of the returned nodes share memory with `data`.
    fn decode_bytes(data: Bytes) -> Tlvs {
        decode::decode_bytes::<Self>(data)
    }

    /// Decodes a sequence of values, failing on any malformed data.
    fn try_decode(data: &[u8]) -> Result<Tlvs, DecodeError> {
        Self::try_decode_bytes(Bytes::copy_from_slice(data))
    }

    /// Decodes a sequence of values from a bytes value or fails.
    fn try_decode_bytes(data: Bytes) -> Result<Tlvs, DecodeError> {
        decode::try_decode_bytes::<Self>(data)
    }
}

impl Mode for Ber {
    const RETAIN_CONSTRUCTED_VALUE: bool = false;
}

impl Mode for Legacy {
    const RETAIN_CONSTRUCTED_VALUE: bool = true;
}
