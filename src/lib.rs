//! Handling of BER-TLV data.
//!
//! BER-TLV is the flavour of the Basic Encoding Rules used by smart cards
//! and payment applications, e.g., in the data objects exchanged with an
//! EMV card. Each value is encoded as its tag, its length, and its content.
//! The content of a constructed value is itself a sequence of encoded
//! values, so the data forms a tree.
//!
//! This crate decodes such data into a tree of [`Tlv`] nodes without any
//! knowledge of the meaning of individual tags. The simplest way is the
//! [`decode()`] function:
//!
//! ```
//! use bertlv::{Class, Tag};
//!
//! let tlvs = bertlv::decode(
//!     b"\xE1\x0B\xC1\x03\x01\x02\x03\xC2\x00\xC3\x02\xAA\xBB"
//! );
//! let root = tlvs.first().unwrap();
//! assert_eq!(root.tag(), Tag::new(0xE1));
//! assert_eq!(root.class(), Class::Private);
//! assert!(root.is_constructed());
//! assert_eq!(root.children().len(), 3);
//! assert_eq!(tlvs.length(Tag::new(0xC3)), Ok(2));
//! ```
//!
//! How constructed values are handled is determined by the [`Mode`] which
//! also provides variants of the decoding functions. The
//! [`decode`][mod@decode] module has all the details.
//!
//! Encoding values is not supported.

pub use self::decode::{DecodeError, DecodeErrorKind};
pub use self::length::Length;
pub use self::mode::{Ber, Legacy, Mode};
pub use self::tag::{Class, Tag};
pub use self::tlv::{AccessError, Siblings, Tlv, Tlvs};

pub mod decode;
pub mod mode;

mod length;
mod tag;
mod tlv;


/// Decodes BER-TLV data in BER mode.
///
/// This never fails but stops at the first malformed value, keeping
/// everything decoded so far. Use [`Mode::try_decode`] to learn about
/// malformed data.
pub fn decode(data: &[u8]) -> Tlvs {
    Ber::decode(data)
}
