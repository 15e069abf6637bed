//! Token storage.

use text_size::TextSize;

use crate::SyntaxKind;

/// Raw token stored in the tree arena.
///
/// Only the end offset is stored: a token starts where the previous one ends,
/// so the token array tiles the source text by construction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Token {
    pub(crate) kind: SyntaxKind,
    pub(crate) end: TextSize,
    pub(crate) parent: u32,
}

impl Token {
    /// Occupies index 0 so that every real token has a predecessor.
    pub(crate) const SENTINEL: Self =
        Self { kind: SyntaxKind::TOMBSTONE, end: TextSize::new(0), parent: 0 };
}
