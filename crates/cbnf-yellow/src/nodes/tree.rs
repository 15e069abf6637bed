use text_size::{TextRange, TextSize};

use super::{Child, Node, Token};

pub(crate) struct TreeInner {
    pub(crate) text: Box<str>,
    /// Always starts with `Token::SENTINEL`.
    pub(crate) tokens: Box<[Token]>,
    /// The root is always at index 0.
    pub(crate) nodes: Box<[Node]>,
    pub(crate) children: Box<[Child]>,
}

impl TreeInner {
    #[inline]
    pub(crate) fn node(&self, index: u32) -> &Node {
        &self.nodes[index as usize]
    }

    #[inline]
    pub(crate) fn token(&self, index: u32) -> &Token {
        &self.tokens[index as usize]
    }

    #[inline]
    pub(crate) fn token_range(&self, index: u32) -> TextRange {
        let start = self.tokens[index as usize - 1].end;
        TextRange::new(start, self.token(index).end)
    }

    #[inline]
    pub(crate) fn children_of(&self, index: u32) -> &[Child] {
        let node = self.node(index);
        let start = node.children_start as usize;
        &self.children[start..start + node.children_len as usize]
    }

    /// Index of the first real token whose range ends after `offset`.
    pub(crate) fn token_index_after(&self, offset: TextSize) -> Option<u32> {
        let index = self.tokens[1..].partition_point(|token| token.end <= offset) + 1;
        (index < self.tokens.len()).then_some(index as u32)
    }
}
