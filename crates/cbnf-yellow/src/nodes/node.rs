//! Node storage and child references.

use text_size::TextRange;

use crate::{FieldName, SyntaxKind};

/// Raw node stored in the tree arena.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) parent: Option<u32>,
    pub(crate) kind: SyntaxKind,
    pub(crate) range: TextRange,
    /// Slice of `TreeInner::children`.
    pub(crate) children_start: u32,
    pub(crate) children_len: u32,
    /// Child position per field, indexed by `FieldName::index`.
    pub(crate) fields: [Option<u32>; FieldName::COUNT],
}

/// A child slot: an index into either the node or the token array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Child {
    Node(u32),
    Token(u32),
}
