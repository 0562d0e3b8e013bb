//! Decoded values and sequences of them.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt, mem, ptr, slice};
use std::convert::TryFrom;
use std::iter::FromIterator;
use bytes::Bytes;
use smallvec::SmallVec;
use crate::mode::{Ber, Mode};
use crate::tag::{Class, Tag};


//------------ Tlv -----------------------------------------------------------

/// A single tag-length-value node.
///
/// A node has a [`Tag`], a length, and optionally a value. If the node was
/// decoded from a constructed value, it also has the nested values as its
/// [`children`][Self::children].
///
/// The value is always exactly as long as the length says. It is missing if
/// the length is zero. Whether a constructed node also has its raw content
/// octets as the value depends on the [`Mode`][crate::Mode] used for
/// decoding.
///
/// Nodes can also be assembled by hand: [`Tlv::new`] creates an empty node
/// with tag 0 and no value which then can be filled via
/// [`set_tag`][Self::set_tag], [`set_value`][Self::set_value], and
/// [`push_child`][Self::push_child].
///
/// Dropping, cloning, and comparing nodes walks the nested nodes without
/// recursion, so even absurdly deep nesting won’t exhaust the stack. The
/// `Debug` output does recurse once per nesting level.
#[derive(Default)]
pub struct Tlv {
    /// The tag of the node.
    tag: Tag,

    /// The length of the value.
    length: u32,

    /// The value.
    ///
    /// If present, this is exactly `length` octets long.
    value: Option<Bytes>,

    /// The nested nodes of a constructed node.
    children: Tlvs,
}

impl Tlv {
    /// Creates a new, empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new node with the given tag and no value.
    pub fn with_tag(tag: Tag) -> Self {
        let mut res = Self::default();
        res.tag = tag;
        res
    }

    /// Returns the tag of the node.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Changes the tag of the node.
    pub fn set_tag(&mut self, tag: Tag) {
        self.tag = tag
    }

    /// Returns the class of the node’s tag.
    pub fn class(&self) -> Class {
        self.tag.class()
    }

    /// Returns whether the node’s tag is constructed.
    pub fn is_constructed(&self) -> bool {
        self.tag.is_constructed()
    }

    /// Returns whether the node’s tag is primitive.
    pub fn is_primitive(&self) -> bool {
        self.tag.is_primitive()
    }

    /// Returns the length of the value.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Returns the value if there is one.
    pub fn value(&self) -> Option<&Bytes> {
        self.value.as_ref()
    }

    /// Replaces the value with a copy of the given octets.
    ///
    /// The length of the node is updated to the length of `value`. An empty
    /// value is rejected as is a value longer than `u32::MAX` octets.
    pub fn set_value(&mut self, value: &[u8]) -> Result<(), AccessError> {
        if value.is_empty() {
            return Err(AccessError::InvalidParameter)
        }
        let length = match u32::try_from(value.len()) {
            Ok(length) => length,
            Err(_) => return Err(AccessError::InvalidParameter)
        };
        let mut buf = Vec::new();
        buf.try_reserve_exact(value.len()).map_err(|_| {
            AccessError::OutOfMemory
        })?;
        buf.extend_from_slice(value);
        self.value = Some(buf.into());
        self.length = length;
        Ok(())
    }

    /// Returns the nested nodes.
    ///
    /// This is empty for primitive nodes.
    pub fn children(&self) -> &Tlvs {
        &self.children
    }

    /// Returns a mutable reference to the nested nodes.
    pub fn children_mut(&mut self) -> &mut Tlvs {
        &mut self.children
    }

    /// Appends a nested node.
    pub fn push_child(&mut self, child: Tlv) {
        self.children.push(child)
    }

    /// Returns the first node with the given tag.
    ///
    /// The node itself is checked first, then its nested nodes in
    /// depth-first order.
    pub fn find(&self, tag: Tag) -> Option<&Tlv> {
        if self.tag == tag {
            Some(self)
        }
        else {
            self.children.find(tag)
        }
    }

    /// Returns a copy of the node without its nested nodes.
    fn clone_shallow(&self) -> Self {
        let mut res = Tlv::with_tag(self.tag);
        res.length = self.length;
        res.value = self.value.clone();
        res
    }

    /// Returns whether two nodes are equal ignoring their nested nodes.
    fn eq_shallow(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.length == other.length
            && self.value == other.value
            && self.children.len() == other.children.len()
    }

    pub(crate) fn set_length(&mut self, length: u32) {
        self.length = length
    }

    /// Sets a value taken directly from decoded data.
    pub(crate) fn set_raw_value(&mut self, value: Bytes) {
        debug_assert_eq!(value.len() as u64, u64::from(self.length));
        self.value = Some(value)
    }
}


//--- Drop

impl Drop for Tlv {
    fn drop(&mut self) {
        // Move all descendants onto a work list so that each node is
        // dropped with its children already taken.
        let mut pending = mem::take(&mut self.children.nodes);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children.nodes);
        }
    }
}


//--- Clone, PartialEq, and Eq

impl Clone for Tlv {
    fn clone(&self) -> Self {
        let mut res = self.clone_shallow();
        res.children = self.children.clone();
        res
    }
}

impl PartialEq for Tlv {
    fn eq(&self, other: &Self) -> bool {
        self.eq_shallow(other) && self.children == other.children
    }
}

impl Eq for Tlv { }


//--- Debug

impl fmt::Debug for Tlv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut res = f.debug_struct("Tlv");
        res.field("tag", &self.tag);
        res.field("length", &self.length);
        if let Some(value) = self.value.as_ref() {
            res.field("value", value);
        }
        if !self.children.is_empty() {
            res.field("children", &self.children);
        }
        res.finish()
    }
}


//------------ Tlvs ----------------------------------------------------------

/// An ordered sequence of nodes.
///
/// This is what decoding produces: the values found at the outermost level
/// of the data in the order they appear. The next sibling of a node is
/// simply the next node in the sequence. The nested nodes of a constructed
/// node are a `Tlvs`, too.
///
/// The lookup methods taking a tag search the whole tree in depth-first
/// order, i.e., a node is visited before its nested nodes and those before
/// its next sibling. The first node found wins.
#[derive(Default)]
pub struct Tlvs {
    nodes: Vec<Tlv>,
}

impl Tlvs {
    /// Creates a new, empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a sequence of values in BER mode.
    ///
    /// This never fails. See [`decode_bytes`][crate::decode::decode_bytes]
    /// for how malformed data is dealt with.
    pub fn decode(data: &[u8]) -> Self {
        Ber::decode(data)
    }

    /// Returns the number of nodes at this level.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether there are no nodes at this level.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the first node.
    pub fn first(&self) -> Option<&Tlv> {
        self.nodes.first()
    }

    /// Returns the node at the given index.
    pub fn get(&self, idx: usize) -> Option<&Tlv> {
        self.nodes.get(idx)
    }

    /// Returns an iterator over the nodes at this level.
    pub fn iter(&self) -> Siblings {
        Siblings { iter: self.nodes.iter() }
    }

    /// Returns the node following `node` in this sequence.
    ///
    /// The node is identified by its address, not by comparing its
    /// content. If `node` is not part of this sequence or is its last
    /// node, returns `None`.
    pub fn next_sibling(&self, node: &Tlv) -> Option<&Tlv> {
        let idx = self.nodes.iter().position(|item| ptr::eq(item, node))?;
        self.nodes.get(idx + 1)
    }

    /// Returns the first node with the given tag anywhere in the tree.
    pub fn find(&self, tag: Tag) -> Option<&Tlv> {
        let mut stack: SmallVec<[slice::Iter<Tlv>; 4]> = SmallVec::new();
        stack.push(self.nodes.iter());
        while let Some(iter) = stack.last_mut() {
            match iter.next() {
                Some(node) => {
                    if node.tag == tag {
                        return Some(node)
                    }
                    if !node.children.is_empty() {
                        stack.push(node.children.nodes.iter());
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }
        None
    }

    /// Returns a mutable reference to the first node with the given tag.
    pub fn find_mut(&mut self, tag: Tag) -> Option<&mut Tlv> {
        let mut stack: SmallVec<[slice::IterMut<Tlv>; 4]> = SmallVec::new();
        stack.push(self.nodes.iter_mut());
        while let Some(iter) = stack.last_mut() {
            match iter.next() {
                Some(node) => {
                    if node.tag == tag {
                        return Some(node)
                    }
                    stack.push(node.children.nodes.iter_mut());
                }
                None => {
                    stack.pop();
                }
            }
        }
        None
    }

    /// Returns the node with the given tag or an error.
    fn require(&self, tag: Tag) -> Result<&Tlv, AccessError> {
        self.find(tag).ok_or(AccessError::TagNotFound(tag))
    }

    /// Returns the class of the first node with the given tag.
    pub fn tag_class(&self, tag: Tag) -> Result<Class, AccessError> {
        self.require(tag).map(Tlv::class)
    }

    /// Returns the length of the first node with the given tag.
    pub fn length(&self, tag: Tag) -> Result<u32, AccessError> {
        self.require(tag).map(Tlv::length)
    }

    /// Returns the value of the first node with the given tag.
    ///
    /// The inner option is `None` if the node exists but has no value.
    pub fn value(&self, tag: Tag) -> Result<Option<&Bytes>, AccessError> {
        self.require(tag).map(Tlv::value)
    }

    /// Returns whether the first node with the given tag is constructed.
    ///
    /// Returns `false` if there is no such node.
    pub fn is_constructed(&self, tag: Tag) -> bool {
        self.find(tag).map(Tlv::is_constructed).unwrap_or(false)
    }

    /// Returns whether the first node with the given tag is primitive.
    ///
    /// Returns `true` if there is no such node.
    pub fn is_primitive(&self, tag: Tag) -> bool {
        self.find(tag).map(Tlv::is_primitive).unwrap_or(true)
    }

    /// Appends a node to the end of the sequence.
    pub fn push(&mut self, node: Tlv) {
        self.nodes.push(node)
    }

    /// Appends a new node with the given tag and returns it.
    pub fn append_sibling(&mut self, tag: Tag) -> &mut Tlv {
        let idx = self.nodes.len();
        self.nodes.push(Tlv::with_tag(tag));
        &mut self.nodes[idx]
    }

    /// Replaces the value of the first node with the given tag.
    pub fn set_value(
        &mut self, tag: Tag, value: &[u8]
    ) -> Result<(), AccessError> {
        match self.find_mut(tag) {
            Some(node) => node.set_value(value),
            None => Err(AccessError::TagNotFound(tag))
        }
    }

    /// Encodes the sequence.
    ///
    /// Encoding isn’t available yet, so this always fails.
    pub fn serialize(&self) -> Result<Vec<u8>, AccessError> {
        Err(AccessError::Unsupported)
    }

    /// Releases all nodes.
    ///
    /// This is the same as dropping the sequence.
    pub fn release(self) { }
}


//--- FromIterator and IntoIterator

impl FromIterator<Tlv> for Tlvs {
    fn from_iter<I: IntoIterator<Item = Tlv>>(iter: I) -> Self {
        Tlvs { nodes: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Tlvs {
    type Item = &'a Tlv;
    type IntoIter = Siblings<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


//--- Debug

//--- Clone, PartialEq, and Eq

impl Clone for Tlvs {
    fn clone(&self) -> Self {
        // A copy under construction with the originals still to copy.
        struct Frame<'a> {
            node: Tlv,
            pending: slice::Iter<'a, Tlv>,
            copied: Vec<Tlv>,
        }

        let mut res = Vec::new();
        let mut stack = vec![Frame {
            node: Tlv::new(),
            pending: self.nodes.iter(),
            copied: Vec::with_capacity(self.len()),
        }];
        while let Some(frame) = stack.last_mut() {
            match frame.pending.next() {
                Some(node) if node.children.is_empty() => {
                    frame.copied.push(node.clone_shallow());
                }
                Some(node) => {
                    stack.push(Frame {
                        node: node.clone_shallow(),
                        pending: node.children.nodes.iter(),
                        copied: Vec::with_capacity(node.children.len()),
                    });
                }
                None => {
                    if let Some(Frame { mut node, copied, .. }) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => {
                                node.children.nodes = copied;
                                parent.copied.push(node);
                            }
                            None => res = copied,
                        }
                    }
                }
            }
        }
        Tlvs { nodes: res }
    }
}

impl PartialEq for Tlvs {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false
        }
        let mut stack: SmallVec<[(slice::Iter<Tlv>, slice::Iter<Tlv>); 4]>
            = SmallVec::new();
        stack.push((self.nodes.iter(), other.nodes.iter()));
        while let Some((left, right)) = stack.last_mut() {
            match (left.next(), right.next()) {
                (Some(left), Some(right)) => {
                    if !left.eq_shallow(right) {
                        return false
                    }
                    if !left.children.is_empty() {
                        stack.push((
                            left.children.nodes.iter(),
                            right.children.nodes.iter(),
                        ));
                    }
                }
                _ => {
                    stack.pop();
                }
            }
        }
        true
    }
}

impl Eq for Tlvs { }


//--- Debug

impl fmt::Debug for Tlvs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}


//------------ Siblings ------------------------------------------------------

/// An iterator over the nodes of one level of a [`Tlvs`] sequence.
#[derive(Clone, Debug)]
pub struct Siblings<'a> {
    iter: slice::Iter<'a, Tlv>,
}

impl<'a> Iterator for Siblings<'a> {
    type Item = &'a Tlv;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a> DoubleEndedIterator for Siblings<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back()
    }
}

impl<'a> ExactSizeIterator for Siblings<'a> { }


//------------ AccessError ---------------------------------------------------

/// An error happened while accessing or changing nodes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessError {
    /// An argument was not acceptable.
    InvalidParameter,

    /// Memory for a value could not be allocated.
    OutOfMemory,

    /// There is no node with the given tag.
    TagNotFound(Tag),

    /// The operation is not available.
    Unsupported,
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AccessError::InvalidParameter => f.write_str("invalid parameter"),
            AccessError::OutOfMemory => f.write_str("out of memory"),
            AccessError::TagNotFound(tag) => {
                write!(f, "tag {} not found", tag)
            }
            AccessError::Unsupported => {
                f.write_str("operation not available")
            }
        }
    }
}

impl error::Error for AccessError { }


//============ Tests =========================================================
