//! Trivia pieces attached to tokens.

use text_size::TextSize;

use crate::SyntaxKind;

/// Kinds of trivia stored alongside tokens.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriviaPieceKind {
    Whitespace,
    Comment,
}

impl TriviaPieceKind {
    /// The token kind a piece turns into once it is placed in the tree.
    pub const fn syntax_kind(self) -> SyntaxKind {
        match self {
            TriviaPieceKind::Whitespace => SyntaxKind::WHITESPACE,
            TriviaPieceKind::Comment => SyntaxKind::COMMENT,
        }
    }
}

/// A trivia fragment with its kind and length.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TriviaPiece {
    pub kind: TriviaPieceKind,
    pub len: TextSize,
}

impl TriviaPiece {
    /// Creates a new trivia piece with the given kind and length.
    pub fn new(kind: TriviaPieceKind, len: TextSize) -> Self {
        Self { kind, len }
    }
}
