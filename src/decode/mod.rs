//! Decoding BER-TLV data.
//!
//! Decoding turns a sequence of encoded values into a [`Tlvs`] sequence of
//! [`Tlv`] nodes. Each value starts with its tag and length octets. The
//! length tells where the value ends and the next one begins, so the data
//! can be decoded in a single pass without knowing anything about the
//! meaning of the tags involved. If the tag says the value is constructed,
//! its content is decoded in turn into the nested values of the node.
//!
//! Zero octets before a tag are skipped. They may appear as padding between
//! values, both at the outermost level and inside constructed values.
//!
//! There are two entry points which are also available through the
//! [`Mode`] trait. [`try_decode_bytes`] fails on any malformed data while
//! [`decode_bytes`] never fails and keeps what it can.

pub use self::error::{DecodeError, DecodeErrorKind};
pub use self::source::{BytesSource, Pos};

use std::convert::TryFrom;
use bytes::Bytes;
use crate::length::Length;
use crate::mode::Mode;
use crate::tag::Tag;
use crate::tlv::{Tlv, Tlvs};

mod error;
mod source;
mod test;


//------------ Entry Points --------------------------------------------------

/// Decodes all values in `data`, failing on malformed data.
///
/// If the data doesn’t contain any values at all, i.e., it is empty or
/// consists of padding only, the result contains a single empty node.
pub fn try_decode_bytes<M: Mode>(data: Bytes) -> Result<Tlvs, DecodeError> {
    let mut res = Tlvs::new();
    let mut recovery = Recovery::strict();
    take_all::<M>(&mut BytesSource::new(data), 0, &mut res, &mut recovery)?;
    Ok(finalize(res))
}

/// Decodes as many values in `data` as possible.
///
/// The length of a constructed value marks where it ends, so malformed
/// content only affects the value itself. Such a value is kept with the
/// nested values decoded before the problem but without a value, and
/// decoding continues with its next sibling. A value whose tag or length
/// is malformed or which runs past the end of the data that contains it
/// ends decoding of that data and is dropped.
///
/// The result therefore has to be treated as untrusted: it may be missing
/// values that were present in the data.
///
/// If the data doesn’t contain any values at all, i.e., it is empty or
/// consists of padding only, the result contains a single empty node.
pub fn decode_bytes<M: Mode>(data: Bytes) -> Tlvs {
    let mut res = Tlvs::new();
    let mut recovery = Recovery::lossy();
    let err = take_all::<M>(
        &mut BytesSource::new(data), 0, &mut res, &mut recovery
    ).err().or(recovery.first);
    if let Some(err) = err {
        log::debug!(
            "BER-TLV data is malformed, kept {} outer value(s): {}",
            res.len(), err
        );
    }
    finalize(res)
}

fn finalize(mut res: Tlvs) -> Tlvs {
    if res.is_empty() {
        res.push(Tlv::new())
    }
    res
}


//------------ Recovery ------------------------------------------------------

/// What to do with malformed content of constructed values.
struct Recovery {
    /// Whether to carry on after malformed content.
    lossy: bool,

    /// The first error skipped over.
    first: Option<DecodeError>,
}

impl Recovery {
    fn strict() -> Self {
        Recovery { lossy: false, first: None }
    }

    fn lossy() -> Self {
        Recovery { lossy: true, first: None }
    }

    /// Decides whether `err` in delimited content ends decoding.
    fn recover(&mut self, err: DecodeError) -> Result<(), DecodeError> {
        if !self.lossy {
            return Err(err)
        }
        log::trace!("skipping malformed content: {}", err);
        if self.first.is_none() {
            self.first = Some(err)
        }
        Ok(())
    }
}


//------------ Decoding ------------------------------------------------------

/// Takes all values from `source` and appends them to `target`.
///
/// The values are at nesting level `depth`.
fn take_all<M: Mode>(
    source: &mut BytesSource, depth: usize, target: &mut Tlvs,
    recovery: &mut Recovery,
) -> Result<(), DecodeError> {
    loop {
        source.skip_padding();
        if source.is_exhausted() {
            return Ok(())
        }
        take_one::<M>(source, depth, target, recovery)?;
    }
}

/// Takes a single value from `source` and appends it to `target`.
///
/// If the content of a constructed value fails to decode or is nested too
/// deeply, the value is still appended with the nested values decoded so
/// far. Whether the error is returned is up to `recovery`.
fn take_one<M: Mode>(
    source: &mut BytesSource, depth: usize, target: &mut Tlvs,
    recovery: &mut Recovery,
) -> Result<(), DecodeError> {
    let start = source.pos();
    let tag = Tag::take_from(source)?;
    let length = Length::take_from(source)?;
    let mut tlv = Tlv::with_tag(tag);
    tlv.set_length(length.to_u32());

    if length.is_zero() {
        log::trace!("{}: {} at depth {}, empty", start, tag, depth);
        target.push(tlv);
        return Ok(())
    }

    let content_len = match usize::try_from(length.to_u32()) {
        Ok(len) => len,
        Err(_) => return Err(DecodeError::truncated(source.pos())),
    };
    let content = source.take_limited(content_len)?;
    log::trace!(
        "{}: {} at depth {}, {} content octets",
        start, tag, depth, length
    );

    if tag.is_constructed() {
        let res = if depth >= M::MAX_DEPTH {
            Err(DecodeError::new(DecodeErrorKind::ExcessiveDepth, start))
        }
        else {
            let mut nested = content.clone();
            take_all::<M>(
                &mut nested, depth + 1, tlv.children_mut(), recovery
            )
        };
        match res {
            Ok(()) => {
                if M::RETAIN_CONSTRUCTED_VALUE {
                    tlv.set_raw_value(content.into_bytes());
                }
                target.push(tlv);
                Ok(())
            }
            Err(err) => {
                target.push(tlv);
                recovery.recover(err)
            }
        }
    }
    else {
        tlv.set_raw_value(content.into_bytes());
        target.push(tlv);
        Ok(())
    }
}
