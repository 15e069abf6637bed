//! Public syntax tree API built on immutable, index-linked nodes.

use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};

use text_size::{TextRange, TextSize};

use crate::nodes::{Child, TreeInner};
use crate::{FieldName, SyntaxKind};

/// Owned syntax tree for a single source text.
pub struct SyntaxTree {
    pub(crate) tree: TreeInner,
}

impl SyntaxTree {
    /// Returns the root syntax node.
    #[inline]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { tree: &self.tree, index: 0 }
    }

    /// Returns the full source text for this tree.
    #[inline]
    pub fn text(&self) -> &str {
        &self.tree.text
    }

    /// Returns `true` if any node or token is error-marked.
    pub fn has_errors(&self) -> bool {
        self.tree.nodes.iter().any(|node| node.kind.is_error())
            || self.tree.tokens.iter().any(|token| token.kind.is_error())
    }

    /// Renders the tree as an indented `KIND@start..end` listing.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, self.root(), None, 0);
        out
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree").field("text_len", &self.text().len()).finish_non_exhaustive()
    }
}

fn write_node(out: &mut String, node: SyntaxNode<'_>, field: Option<FieldName>, depth: usize) {
    write_line(out, depth, field, node.kind(), node.text_range(), None);

    for (index, child) in node.children_with_tokens().enumerate() {
        let field = node.field_of(index);
        match child {
            NodeOrToken::Node(child) => write_node(out, child, field, depth + 1),
            NodeOrToken::Token(token) => write_line(
                out,
                depth + 1,
                field,
                token.kind(),
                token.text_range(),
                Some(token.text()),
            ),
        }
    }
}

fn write_line(
    out: &mut String,
    depth: usize,
    field: Option<FieldName>,
    kind: SyntaxKind,
    range: TextRange,
    text: Option<&str>,
) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    if let Some(field) = field {
        out.push_str(field.as_str());
        out.push_str(": ");
    }
    _ = write!(out, "{kind:?}@{}..{}", u32::from(range.start()), u32::from(range.end()));
    if let Some(text) = text {
        _ = write!(out, " {text:?}");
    }
    out.push('\n');
}

/// Token handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    tree: &'a TreeInner,
    index: u32,
}

impl<'a> SyntaxToken<'a> {
    /// Returns this token's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.token(self.index).kind
    }

    /// Returns `true` if this token is trivia.
    #[inline]
    pub fn is_trivia(self) -> bool {
        self.kind().is_trivia()
    }

    /// Returns `true` if this token is error-marked.
    #[inline]
    pub fn is_error(self) -> bool {
        self.kind().is_error()
    }

    /// Returns the byte range of this token.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.token_range(self.index)
    }

    /// Returns the raw source text of this token.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the previous token in source order, if any.
    #[inline]
    pub fn prev_token(self) -> Option<Self> {
        (self.index > 1).then(|| Self { tree: self.tree, index: self.index - 1 })
    }

    /// Returns the next token in source order, if any.
    #[inline]
    pub fn next_token(self) -> Option<Self> {
        let index = self.index + 1;
        ((index as usize) < self.tree.tokens.len()).then_some(Self { tree: self.tree, index })
    }

    /// Returns the parent node.
    #[inline]
    pub fn parent(self) -> SyntaxNode<'a> {
        SyntaxNode { tree: self.tree, index: self.tree.token(self.index).parent }
    }

    /// Returns an iterator of parent nodes, starting from the immediate parent.
    #[inline]
    pub fn parent_ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        self.parent().ancestors()
    }
}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxToken<'_> {}

impl Hash for SyntaxToken<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.tree, state);
        self.index.hash(state);
    }
}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.text_range();
        write!(
            f,
            "{:?}@{}..{} {:?}",
            self.kind(),
            u32::from(range.start()),
            u32::from(range.end()),
            self.text()
        )
    }
}

impl fmt::Display for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Node handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a TreeInner,
    index: u32,
}

impl<'a> SyntaxNode<'a> {
    /// Returns this node's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.node(self.index).kind
    }

    /// Returns the text range covered by this node, trivia included.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.node(self.index).range
    }

    /// Returns the range with leading/trailing trivia trimmed away.
    #[inline]
    pub fn trimmed_range(self) -> TextRange {
        non_trivia_range(self)
    }

    /// Returns the text slice covered by this node.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the text slice excluding leading/trailing trivia.
    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        &self.tree.text[self.trimmed_range()]
    }

    /// Returns the parent node if any.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        let parent = self.tree.node(self.index).parent?;
        Some(Self { tree: self.tree, index: parent })
    }

    /// Returns an iterator of ancestors starting from this node.
    #[inline]
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        std::iter::successors(Some(self), |it| it.parent())
    }

    /// Iterates all children, tokens and trivia included.
    #[inline]
    pub fn children_with_tokens(self) -> ChildrenWithTokens<'a> {
        ChildrenWithTokens { tree: self.tree, children: self.tree.children_of(self.index).iter() }
    }

    /// Iterates child nodes, skipping tokens.
    #[inline]
    pub fn children(self) -> impl DoubleEndedIterator<Item = SyntaxNode<'a>> + Clone {
        self.children_with_tokens().filter_map(SyntaxElement::into_node)
    }

    /// Returns the number of children, tokens and trivia included.
    #[inline]
    pub fn child_count(self) -> usize {
        self.tree.children_of(self.index).len()
    }

    /// Returns the child at `index` among all children.
    #[inline]
    pub fn child(self, index: usize) -> Option<SyntaxElement<'a>> {
        let child = *self.tree.children_of(self.index).get(index)?;
        Some(element(self.tree, child))
    }

    /// Returns the child designated by `field`, or `None` if the node has no
    /// such field.
    #[inline]
    pub fn child_by_field(self, field: FieldName) -> Option<SyntaxElement<'a>> {
        let index = self.tree.node(self.index).fields[field.index()]?;
        self.child(index as usize)
    }

    /// Same as `child_by_field`, looking the field up by its name.
    pub fn child_by_field_name(self, name: &str) -> Option<SyntaxElement<'a>> {
        self.child_by_field(FieldName::from_name(name)?)
    }

    /// Returns the field naming the child at `index`, if any.
    pub fn field_of(self, index: usize) -> Option<FieldName> {
        let fields = &self.tree.node(self.index).fields;
        FieldName::ALL.into_iter().find(|field| fields[field.index()] == Some(index as u32))
    }

    /// Returns the first token inside this node, trivia included.
    pub fn first_token(self) -> Option<SyntaxToken<'a>> {
        self.children_with_tokens().find_map(|child| match child {
            NodeOrToken::Node(node) => node.first_token(),
            NodeOrToken::Token(token) => Some(token),
        })
    }

    /// Returns the last token inside this node, trivia included.
    pub fn last_token(self) -> Option<SyntaxToken<'a>> {
        self.children_with_tokens().rev().find_map(|child| match child {
            NodeOrToken::Node(node) => node.last_token(),
            NodeOrToken::Token(token) => Some(token),
        })
    }

    /// Returns `true` if this node or any descendant is error-marked.
    pub fn has_errors(self) -> bool {
        self.preorder_with_tokens().any(|event| match event {
            WalkEventWithTokens::EnterNode(node) => node.kind().is_error(),
            WalkEventWithTokens::Token(token) => token.is_error(),
            WalkEventWithTokens::LeaveNode(_) => false,
        })
    }

    /// Returns the token at the given offset, if any.
    pub fn token_at_offset(self, offset: TextSize) -> TokenAtOffset<SyntaxToken<'a>> {
        let range = self.text_range();
        if !range.contains_inclusive(offset) {
            return TokenAtOffset::None;
        }

        let Some(index) = self.tree.token_index_after(offset) else {
            return TokenAtOffset::None;
        };
        let right = SyntaxToken { tree: self.tree, index };
        if !range.contains_range(right.text_range()) {
            return TokenAtOffset::None;
        }

        match right.prev_token() {
            Some(left)
                if left.text_range().end() == offset
                    && right.text_range().start() == offset
                    && range.contains_range(left.text_range()) =>
            {
                TokenAtOffset::Between(left, right)
            }
            _ => TokenAtOffset::Single(right),
        }
    }

    /// Returns the smallest element that fully covers `range`, if `range`
    /// lies inside this node.
    pub fn covering_element(self, range: TextRange) -> Option<SyntaxElement<'a>> {
        let token = self.token_at_offset(range.start()).right_biased()?;
        if token.text_range().contains_range(range) {
            return Some(NodeOrToken::Token(token));
        }

        let node = token.parent_ancestors().find(|ancestor| {
            ancestor.text_range().contains_range(range) && self.text_range().contains_range(ancestor.text_range())
        })?;
        Some(NodeOrToken::Node(node))
    }

    /// Returns a preorder iterator over nodes.
    #[inline]
    pub fn preorder(self) -> Preorder<'a> {
        Preorder::new(self)
    }

    /// Returns a preorder iterator over nodes and tokens.
    #[inline]
    pub fn preorder_with_tokens(self) -> PreorderWithTokens<'a> {
        PreorderWithTokens::new(self)
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxNode<'_> {}

impl Hash for SyntaxNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.tree, state);
        self.index.hash(state);
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.text_range();
        write!(f, "{:?}@{}..{}", self.kind(), u32::from(range.start()), u32::from(range.end()))
    }
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

fn non_trivia_range(node: SyntaxNode<'_>) -> TextRange {
    let mut tokens = node.preorder_with_tokens().filter_map(|event| match event {
        WalkEventWithTokens::Token(token) if !token.is_trivia() => Some(token),
        _ => None,
    });

    match tokens.next() {
        Some(first) => {
            let last = tokens.last().unwrap_or(first);
            TextRange::new(first.text_range().start(), last.text_range().end())
        }
        None => TextRange::empty(node.text_range().start()),
    }
}

/// Node or token element inside the tree.
pub type SyntaxElement<'a> = NodeOrToken<SyntaxNode<'a>, SyntaxToken<'a>>;

impl<'a> SyntaxElement<'a> {
    /// Returns the element's kind.
    pub fn kind(self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    /// Returns the element's byte range.
    pub fn text_range(self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }

    /// Returns the element's source text.
    pub fn text(self) -> &'a str {
        match self {
            NodeOrToken::Node(node) => node.text(),
            NodeOrToken::Token(token) => token.text(),
        }
    }
}

#[inline]
fn element(tree: &TreeInner, child: Child) -> SyntaxElement<'_> {
    match child {
        Child::Node(index) => NodeOrToken::Node(SyntaxNode { tree, index }),
        Child::Token(index) => NodeOrToken::Token(SyntaxToken { tree, index }),
    }
}

/// Iterator over children including tokens.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    tree: &'a TreeInner,
    children: std::slice::Iter<'a, Child>,
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxElement<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.children.next().map(|&child| element(self.tree, child))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl DoubleEndedIterator for ChildrenWithTokens<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.children.next_back().map(|&child| element(self.tree, child))
    }
}

impl ExactSizeIterator for ChildrenWithTokens<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.children.len()
    }
}

/// Preorder traversal over nodes.
#[derive(Clone)]
pub struct Preorder<'a> {
    inner: PreorderWithTokens<'a>,
}

impl<'a> Preorder<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> Preorder<'a> {
        Preorder { inner: PreorderWithTokens::new(start) }
    }

    /// Skips the current subtree during traversal.
    #[inline]
    pub fn skip_subtree(&mut self) {
        self.inner.skip_subtree();
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = WalkEvent<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|item| match item {
            WalkEventWithTokens::EnterNode(it) => Some(WalkEvent::Enter(it)),
            WalkEventWithTokens::LeaveNode(it) => Some(WalkEvent::Leave(it)),
            WalkEventWithTokens::Token(_) => None,
        })
    }
}

/// Preorder walk event for nodes.
#[derive(Clone, Copy, Debug)]
pub enum WalkEvent<'a> {
    Enter(SyntaxNode<'a>),
    Leave(SyntaxNode<'a>),
}

/// Preorder traversal over nodes and tokens.
#[derive(Clone)]
pub struct PreorderWithTokens<'a> {
    stack: Vec<(SyntaxNode<'a>, ChildrenWithTokens<'a>)>,
    root: Option<SyntaxNode<'a>>,
}

impl<'a> PreorderWithTokens<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> PreorderWithTokens<'a> {
        PreorderWithTokens { stack: Vec::with_capacity(16), root: Some(start) }
    }

    /// Skips the current subtree during traversal.
    #[inline]
    pub fn skip_subtree(&mut self) {
        assert!(self.stack.pop().is_some(), "must have a subtree to skip");
    }
}

impl<'a> Iterator for PreorderWithTokens<'a> {
    type Item = WalkEventWithTokens<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root, root.children_with_tokens()));
            return Some(WalkEventWithTokens::EnterNode(root));
        };

        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push((child, child.children_with_tokens()));
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(WalkEventWithTokens::LeaveNode(exited_node))
            }
        }
    }
}

/// Preorder walk event including tokens.
#[derive(Clone, Copy, Debug)]
pub enum WalkEventWithTokens<'a> {
    EnterNode(SyntaxNode<'a>),
    LeaveNode(SyntaxNode<'a>),
    Token(SyntaxToken<'a>),
}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            NodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}

/// There might be zero, one or two tokens at a given offset.
#[derive(Clone, Debug)]
pub enum TokenAtOffset<T> {
    /// No tokens at offset.
    None,
    /// Only a single token at offset.
    Single(T),
    /// Offset is exactly between two tokens.
    Between(T, T),
}

impl<T> TokenAtOffset<T> {
    /// Convert to option, preferring the right token in case of a tie.
    pub fn right_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(token) => Some(token),
            Self::Between(_, right) => Some(right),
        }
    }

    /// Convert to option, preferring the left token in case of a tie.
    pub fn left_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(token) => Some(token),
            Self::Between(left, _) => Some(left),
        }
    }
}
