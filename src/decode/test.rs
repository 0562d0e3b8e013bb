#![cfg(test)]

use bytes::Bytes;
use crate::length::Length;
use crate::mode::{Ber, Legacy, Mode};
use crate::tag::{Class, Tag};
use crate::tlv::{Tlv, Tlvs};
use super::*;

/// The sample object: a private constructed value with three primitives.
const SAMPLE: &[u8] =
    b"\xE1\x0B\xC1\x03\x01\x02\x03\xC2\x00\xC3\x02\xAA\xBB";

fn prim(tag: u16, content: &[u8]) -> Vec<u8> {
    let mut res = Vec::new();
    Tag::new(tag).append_encoded(&mut res);
    Length::new(content.len() as u32).append_encoded(&mut res);
    res.extend_from_slice(content);
    res
}

fn cons(tag: u16, content: &[Vec<u8>]) -> Vec<u8> {
    prim(tag, &content.concat())
}

fn value(tlv: &Tlv) -> Option<&[u8]> {
    tlv.value().map(|value| value.as_ref())
}

fn assert_empty(tlvs: &Tlvs) {
    assert_eq!(tlvs.len(), 1);
    let node = tlvs.first().unwrap();
    assert_eq!(node.tag(), Tag::new(0));
    assert_eq!(node.length(), 0);
    assert!(node.value().is_none());
    assert!(node.children().is_empty());
}

#[test]
fn sample_object() {
    let tlvs = Ber::try_decode(SAMPLE).unwrap();
    assert_eq!(tlvs.len(), 1);

    let root = tlvs.first().unwrap();
    assert_eq!(root.tag(), Tag::new(0xE1));
    assert_eq!(root.class(), Class::Private);
    assert!(root.is_constructed());
    assert_eq!(root.length(), 11);
    assert!(root.value().is_none());

    let children: Vec<_> = root.children().iter().collect();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].tag(), Tag::new(0xC1));
    assert_eq!(children[0].length(), 3);
    assert_eq!(value(children[0]), Some(b"\x01\x02\x03".as_ref()));
    assert_eq!(children[1].tag(), Tag::new(0xC2));
    assert_eq!(children[1].length(), 0);
    assert_eq!(value(children[1]), None);
    assert_eq!(children[2].tag(), Tag::new(0xC3));
    assert_eq!(children[2].length(), 2);
    assert_eq!(value(children[2]), Some(b"\xAA\xBB".as_ref()));
    for child in &children {
        assert_eq!(child.class(), Class::Private);
        assert!(child.is_primitive());
    }

    // Lookups reach into the nested values.
    assert_eq!(tlvs.tag_class(Tag::new(0xE1)), Ok(Class::Private));
    assert_eq!(tlvs.length(Tag::new(0xC1)), Ok(3));
    assert!(tlvs.is_constructed(Tag::new(0xE1)));
    assert!(tlvs.is_primitive(Tag::new(0xC3)));

    // The lossy variant gives the same thing.
    assert_eq!(crate::decode(SAMPLE), tlvs);
}

#[test]
fn legacy_keeps_constructed_content() {
    let tlvs = Legacy::try_decode(SAMPLE).unwrap();
    let root = tlvs.first().unwrap();
    assert_eq!(value(root), Some(&SAMPLE[2..]));
    assert_eq!(root.children().len(), 3);
}

#[test]
fn empty_input() {
    assert_empty(&Ber::try_decode(b"").unwrap());
    assert_empty(&Ber::decode(b""));
    assert_empty(&Legacy::decode(b""));
    assert_empty(&Ber::decode(b"\0\0\0"));
}

#[test]
fn siblings_and_padding() {
    let mut data = vec![0, 0];
    data.extend(prim(0x5A, b"\x41\x11\x11\x11"));
    data.extend(prim(0x5F24, b"\x25\x12\x31"));
    data.push(0);
    data.extend(cons(0x70, &[prim(0x9F02, b"\x00\x00\x00\x00\x10\x00")]));
    data.extend([0, 0, 0].iter());

    let tlvs = Ber::try_decode(&data).unwrap();
    let tags: Vec<_> = tlvs.iter().map(Tlv::tag).collect();
    assert_eq!(tags, [Tag::new(0x5A), Tag::new(0x5F24), Tag::new(0x70)]);
    assert_eq!(tlvs.tag_class(Tag::new(0x5F24)), Ok(Class::Application));
    assert_eq!(tlvs.length(Tag::new(0x9F02)), Ok(6));

    let first = tlvs.first().unwrap();
    let second = tlvs.next_sibling(first).unwrap();
    assert_eq!(value(second), Some(b"\x25\x12\x31".as_ref()));
}

#[test]
fn padding_inside_constructed() {
    let data = cons(0xE1, &[
        vec![0],
        prim(0xC1, b"\x01"),
        vec![0, 0],
        prim(0xC2, b"\x02"),
        vec![0],
    ]);
    let tlvs = Ber::try_decode(&data).unwrap();
    let root = tlvs.first().unwrap();
    assert_eq!(root.children().len(), 2);
    assert_eq!(tlvs.length(Tag::new(0xC2)), Ok(1));
}

#[test]
fn nested_constructed() {
    let data = [
        cons(0x6F, &[
            prim(0x84, b"\xA0\x00\x00\x00\x03\x10\x10"),
            cons(0xA5, &[
                prim(0x50, b"VISA"),
                cons(0xBF0C, &[prim(0x9F4D, b"\x0B\x0A")]),
            ]),
        ]),
        prim(0x90, b""),
    ].concat();
    let tlvs = Ber::try_decode(&data).unwrap();
    assert_eq!(tlvs.len(), 2);

    let fci = tlvs.first().unwrap();
    assert_eq!(fci.children().len(), 2);
    let prop = fci.children().get(1).unwrap();
    assert_eq!(prop.tag(), Tag::new(0xA5));
    assert_eq!(prop.class(), Class::Context);
    let disc = prop.children().get(1).unwrap();
    assert_eq!(disc.tag(), Tag::new(0xBF0C));
    assert!(disc.is_constructed());
    assert_eq!(
        disc.children().first().and_then(value), Some(b"\x0B\x0A".as_ref())
    );
    assert_eq!(
        tlvs.value(Tag::new(0x50)).unwrap().map(|value| value.as_ref()),
        Some(b"VISA".as_ref())
    );
    assert_eq!(tlvs.get(1).map(Tlv::length), Some(0));
}

#[test]
fn long_form_lengths() {
    let content = vec![0x42; 0x1234];
    let data = [
        cons(0xE1, &[prim(0xC1, &content), prim(0xC2, &[0x01; 0x80])]),
        prim(0xC3, &[0x02; 0x7F]),
    ].concat();
    assert_eq!(&data[..4], b"\xE1\x82\x12\xBB");
    let tlvs = Ber::try_decode(&data).unwrap();
    assert_eq!(tlvs.length(Tag::new(0xE1)), Ok(0x12BB));
    assert_eq!(tlvs.length(Tag::new(0xC1)), Ok(0x1234));
    assert_eq!(tlvs.length(Tag::new(0xC2)), Ok(0x80));
    assert_eq!(tlvs.length(Tag::new(0xC3)), Ok(0x7F));
    assert_eq!(
        tlvs.value(Tag::new(0xC1)).unwrap().map(Bytes::len), Some(0x1234)
    );

    // Non-minimal length octets are fine, too.
    let tlvs = Ber::try_decode(
        b"\xC1\x84\x00\x00\x00\x02\xAA\xBB\xC2\x81\x01\xCC"
    ).unwrap();
    assert_eq!(tlvs.length(Tag::new(0xC1)), Ok(2));
    assert_eq!(tlvs.length(Tag::new(0xC2)), Ok(1));
}

#[test]
fn values_share_input() {
    let data = Bytes::from(prim(0xC1, b"\x01\x02\x03"));
    let tlvs = Ber::decode_bytes(data.clone());
    let value = tlvs.first().and_then(Tlv::value).unwrap();
    assert_eq!(value.as_ref(), &data[2..]);
    assert_eq!(value.as_ptr(), data[2..].as_ptr());
}

#[test]
fn truncated_input() {
    fn kind(data: &[u8]) -> DecodeErrorKind {
        Ber::try_decode(data).unwrap_err().kind()
    }

    // Value runs past the end.
    assert_eq!(kind(b"\xC1\x03\x01\x02"), DecodeErrorKind::TruncatedInput);
    // Length octets missing.
    assert_eq!(kind(b"\xC1"), DecodeErrorKind::TruncatedInput);
    assert_eq!(kind(b"\xC1\x82\x01"), DecodeErrorKind::TruncatedInput);
    // Second tag octet missing.
    assert_eq!(kind(b"\x9F"), DecodeErrorKind::TruncatedInput);
    // Nested value runs past the end of its parent.
    assert_eq!(
        kind(b"\xE1\x03\xC1\x02\x01\x02"), DecodeErrorKind::TruncatedInput
    );

    let err = Ber::try_decode(b"\xC1\x01\x01\xC2\x05\x01").unwrap_err();
    assert_eq!(err.pos(), Pos::from(5));
}

#[test]
fn unsupported_forms() {
    assert_eq!(
        Ber::try_decode(b"\xC1\x80\x01\x00\x00").unwrap_err().kind(),
        DecodeErrorKind::UnsupportedLengthForm
    );
    assert_eq!(
        Ber::try_decode(b"\xC1\x85\x00\x00\x00\x00\x01\xFF")
            .unwrap_err().kind(),
        DecodeErrorKind::UnsupportedLengthForm
    );
    assert_eq!(
        Ber::try_decode(b"\xDF\x81\x0C\x01\x00").unwrap_err().kind(),
        DecodeErrorKind::UnsupportedTag
    );
}

#[test]
fn lossy_keeps_complete_values() {
    // The second sibling is truncated and dropped.
    let tlvs = Ber::decode(b"\xC1\x01\x01\xC2\x05\x01");
    assert_eq!(tlvs.len(), 1);
    assert_eq!(tlvs.length(Tag::new(0xC1)), Ok(1));
    assert!(tlvs.find(Tag::new(0xC2)).is_none());
    assert!(tlvs.length(Tag::new(0xC2)).is_err());

    // A constructed value with broken content keeps what came before.
    let data = [
        &b"\xE1\x08"[..],
        &prim(0xC1, b"\x01\x02")[..],
        &b"\xC2\x80\xAA\xBB"[..],
    ].concat();
    let tlvs = Ber::decode(&data);
    let root = tlvs.first().unwrap();
    assert_eq!(root.tag(), Tag::new(0xE1));
    assert_eq!(root.length(), 8);
    assert_eq!(root.children().len(), 1);
    assert!(Legacy::decode(&data).first().unwrap().value().is_none());

    // Nothing usable at all still gives the empty node.
    assert_empty(&Ber::decode(b"\xC1\x05\x01"));
    assert_empty(&Ber::decode(b"\xC1"));

    // A constructed value longer than the data is dropped as well.
    let tlvs = Ber::decode(b"\xC1\x01\x01\xE1\x05\xC2\x01\x02");
    assert_eq!(tlvs.len(), 1);
    assert!(tlvs.find(Tag::new(0xE1)).is_none());
    assert!(tlvs.find(Tag::new(0xC2)).is_none());
}

#[test]
fn lossy_continues_after_broken_content() {
    // Outer level: the sibling after a broken constructed value stays.
    let data = b"\xE1\x03\xC1\x80\x00\xC3\x01\xAA";
    let tlvs = Ber::decode(data);
    let tags: Vec<_> = tlvs.iter().map(Tlv::tag).collect();
    assert_eq!(tags, [Tag::new(0xE1), Tag::new(0xC3)]);
    assert!(tlvs.first().unwrap().children().is_empty());
    assert_eq!(
        tlvs.value(Tag::new(0xC3)).unwrap().map(|value| value.as_ref()),
        Some(b"\xAA".as_ref())
    );
    assert_eq!(
        Ber::try_decode(data).unwrap_err().kind(),
        DecodeErrorKind::UnsupportedLengthForm
    );

    // Nested: the broken value and its sibling stay in their parent.
    let data = b"\xE1\x07\xE2\x02\xC1\x80\xC3\x01\xAA";
    let tlvs = Ber::decode(data);
    assert_eq!(tlvs.len(), 1);
    let root = tlvs.first().unwrap();
    let tags: Vec<_> = root.children().iter().map(Tlv::tag).collect();
    assert_eq!(tags, [Tag::new(0xE2), Tag::new(0xC3)]);
    assert_eq!(tlvs.length(Tag::new(0xC3)), Ok(1));
    assert!(Ber::try_decode(data).is_err());

    // Only the broken values lose their raw content.
    let tlvs = Legacy::decode(data);
    assert_eq!(value(tlvs.first().unwrap()), Some(&data[2..]));
    assert!(tlvs.find(Tag::new(0xE2)).unwrap().value().is_none());

    // Too deep nesting is skipped the same way.
    let mut deep = prim(0xC1, b"\x01");
    for _ in 0..=Ber::MAX_DEPTH {
        deep = cons(0xE1, &[deep]);
    }
    deep.extend(prim(0xC2, b"\x02"));
    let tlvs = Ber::decode(&deep);
    assert_eq!(tlvs.len(), 2);
    assert_eq!(tlvs.length(Tag::new(0xC2)), Ok(1));
}

#[test]
fn excessive_depth() {
    fn nested(depth: usize) -> Vec<u8> {
        let mut res = prim(0xC1, b"\x01");
        for _ in 0..depth {
            res = cons(0xE1, &[res]);
        }
        res
    }

    // Constructed values at depth 0 to MAX_DEPTH - 1 may have content.
    let tlvs = Ber::try_decode(&nested(Ber::MAX_DEPTH)).unwrap();
    assert_eq!(tlvs.length(Tag::new(0xC1)), Ok(1));

    let data = nested(Ber::MAX_DEPTH + 1);
    assert_eq!(
        Ber::try_decode(&data).unwrap_err().kind(),
        DecodeErrorKind::ExcessiveDepth
    );
    let tlvs = Ber::decode(&data);
    assert!(tlvs.find(Tag::new(0xC1)).is_none());
    assert_eq!(tlvs.first().map(Tlv::tag), Some(Tag::new(0xE1)));
}

#[test]
fn classification_ignores_content() {
    for &tag in &[0x01u16, 0x30, 0x5A, 0x61, 0x84, 0xA5, 0xC2, 0xE1] {
        let short = prim(tag, b"");
        let long = prim(tag, b"\xC1\x00");
        let expected_class = Tag::new(tag).class();
        for data in &[short, long] {
            let tlvs = Ber::decode(data);
            assert_eq!(tlvs.tag_class(Tag::new(tag)), Ok(expected_class));
            assert_eq!(
                tlvs.is_constructed(Tag::new(tag)), tag & 0x20 != 0
            );
        }
    }
}
