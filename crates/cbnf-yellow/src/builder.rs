//! Incremental builder for the immutable syntax tree.

use text_size::{TextRange, TextSize};

use crate::nodes::{Child, Node, Token, TreeInner};
use crate::{FieldName, SyntaxKind, SyntaxTree, TriviaPiece};

/// Builds a `SyntaxTree` from parser events.
///
/// Nodes are numbered in the order they are started, so the root is node 0
/// and a parent always precedes its children.
pub struct Builder {
    nodes: Vec<Node>,
    node_children: Vec<Child>,
    tokens: Vec<Token>,
    text: Box<str>,

    children_pool: Vec<Vec<Child>>,
    opened: Vec<Opened>,
    pending_field: Option<FieldName>,
    text_len: TextSize,
}

struct Opened {
    node: usize,
    children: Vec<Child>,
}

impl Drop for Builder {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

const DEFAULT_TREE_DEPTH: usize = 32;
const DEFAULT_TREE_SIZE: usize = 256;
const DEFAULT_CHILDREN_LEN: usize = 8;

impl Builder {
    /// Creates a new builder for `text`.
    pub fn new(text: &str) -> Self {
        let mut tokens = Vec::with_capacity(DEFAULT_TREE_SIZE);
        tokens.push(Token::SENTINEL);

        Self {
            nodes: Vec::with_capacity(DEFAULT_TREE_SIZE),
            node_children: Vec::with_capacity(DEFAULT_TREE_SIZE),
            tokens,
            text: text.into(),

            children_pool: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            pending_field: None,
            text_len: TextSize::new(0),
        }
    }

    /// Retrieves a recycled children buffer or allocates a new one.
    fn new_children_vec(&mut self) -> Vec<Child> {
        self.children_pool.pop().unwrap_or_else(|| Vec::with_capacity(DEFAULT_CHILDREN_LEN))
    }

    /// Returns a children buffer to the pool.
    fn recycle_children_vec(&mut self, vec: Vec<Child>) {
        self.children_pool.push(vec);
    }

    /// Appends `child` to the innermost open node, resolving a pending field.
    #[track_caller]
    fn attach(&mut self, child: Child, takes_field: bool) -> u32 {
        let Some(parent) = self.opened.last_mut() else {
            panic!("expected an opened node");
        };

        if takes_field && let Some(field) = self.pending_field.take() {
            self.nodes[parent.node].fields[field.index()] = Some(parent.children.len() as u32);
        }

        parent.children.push(child);
        parent.node as u32
    }

    /// Starts a new node of the given kind.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        let new_node = self.nodes.len();

        let parent = if self.opened.is_empty() {
            assert!(self.nodes.is_empty(), "the tree must have a single root");
            None
        } else {
            Some(self.attach(Child::Node(new_node as u32), true))
        };

        self.nodes.push(Node {
            parent,
            kind,
            range: TextRange::empty(self.text_len),
            children_start: 0,
            children_len: 0,
            fields: [None; FieldName::COUNT],
        });

        let children = self.new_children_vec();
        self.opened.push(Opened { node: new_node, children });
    }

    /// Finishes the most recently started node.
    pub fn finish_node(&mut self) {
        debug_assert!(self.pending_field.is_none(), "field was never attached to a child");

        let Some(Opened { node, mut children }) = self.opened.pop() else {
            panic!("no opened nodes?");
        };

        let node = &mut self.nodes[node];
        node.range = TextRange::new(node.range.start(), self.text_len);
        node.children_start = self.node_children.len() as u32;
        node.children_len = children.len() as u32;
        self.node_children.append(&mut children);
        self.recycle_children_vec(children);
    }

    /// Marks the next non-trivia child of the current node with `field`.
    pub fn field(&mut self, field: FieldName) {
        debug_assert!(self.pending_field.is_none(), "two fields for one child");
        self.pending_field = Some(field);
    }

    /// Adds a token of `len` bytes to the current node.
    pub fn token(&mut self, kind: SyntaxKind, len: TextSize) {
        self.text_len += len;
        assert!(self.text.is_char_boundary(usize::from(self.text_len)));

        let token = self.tokens.len() as u32;
        let parent = self.attach(Child::Token(token), !kind.is_trivia());
        self.tokens.push(Token { kind, end: self.text_len, parent });
    }

    /// Adds a trivia piece as a token of the current node.
    pub fn trivia(&mut self, piece: TriviaPiece) {
        self.token(piece.kind.syntax_kind(), piece.len);
    }

    /// Finishes building and returns the immutable `SyntaxTree`.
    ///
    /// Panics unless the tokens cover the whole text.
    pub fn finish(mut self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "unfinished nodes");
        assert!(!self.nodes.is_empty(), "the tree has no root");
        assert_eq!(
            usize::from(self.text_len),
            self.text.len(),
            "tokens must cover the whole text"
        );

        let tree = TreeInner {
            text: std::mem::take(&mut self.text),
            tokens: std::mem::take(&mut self.tokens).into_boxed_slice(),
            nodes: std::mem::take(&mut self.nodes).into_boxed_slice(),
            children: std::mem::take(&mut self.node_children).into_boxed_slice(),
        };

        SyntaxTree { tree }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;
    use crate::TriviaPieceKind;

    fn len(n: u32) -> TextSize {
        TextSize::new(n)
    }

    #[test]
    fn records_fields_and_ranges() {
        let mut builder = Builder::new("a { b };");
        builder.start_node(SYNTAX);
        builder.start_node(SYNTAX_RULE);
        builder.field(FieldName::Name);
        builder.token(IDENT, len(1));
        builder.trivia(TriviaPiece::new(TriviaPieceKind::Whitespace, len(1)));
        builder.token(LEFT_BRACE, len(1));
        builder.trivia(TriviaPiece::new(TriviaPieceKind::Whitespace, len(1)));
        builder.field(FieldName::Definition);
        builder.start_node(LIST);
        builder.token(IDENT, len(1));
        builder.trivia(TriviaPiece::new(TriviaPieceKind::Whitespace, len(1)));
        builder.finish_node();
        builder.token(RIGHT_BRACE, len(1));
        builder.token(SEMICOLON, len(1));
        builder.finish_node();
        builder.finish_node();

        let tree = builder.finish();
        let rule = tree.root().children().next().unwrap();
        assert_eq!(rule.kind(), SYNTAX_RULE);
        assert_eq!(rule.field_of(0), Some(FieldName::Name));
        assert_eq!(rule.field_of(1), None);

        let definition = rule.child_by_field(FieldName::Definition).unwrap();
        assert_eq!(definition.kind(), LIST);
        assert_eq!(definition.text_range(), TextRange::new(4.into(), 6.into()));
        assert_eq!(rule.child_by_field_name("name").unwrap().kind(), IDENT);
    }

    #[test]
    fn trivia_does_not_take_a_field() {
        let mut builder = Builder::new(" x");
        builder.start_node(SYNTAX);
        builder.field(FieldName::Name);
        builder.trivia(TriviaPiece::new(TriviaPieceKind::Whitespace, len(1)));
        builder.token(IDENT, len(1));
        builder.finish_node();

        let tree = builder.finish();
        assert_eq!(tree.root().field_of(1), Some(FieldName::Name));
    }

    #[test]
    #[should_panic(expected = "tokens must cover the whole text")]
    fn rejects_partial_coverage() {
        let mut builder = Builder::new("ab");
        builder.start_node(SYNTAX);
        builder.token(IDENT, len(1));
        builder.finish_node();
        builder.finish();
    }
}
