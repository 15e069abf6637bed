//! Lossless, immutable CBNF syntax tree with parent links and named fields.
//!
//! The tree is built once by the parser and then navigated by lightweight
//! handles borrowing from it, without allocation or refcounting.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod field;
mod nodes;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod trivia;

/// Incremental builder for constructing a `SyntaxTree`.
pub use builder::Builder;
/// Named child slots of rule nodes.
pub use field::FieldName;
/// Primary syntax tree API types and adapters.
pub use syntax::{
    ChildrenWithTokens, NodeOrToken, Preorder, PreorderWithTokens, SyntaxElement, SyntaxNode,
    SyntaxToken, SyntaxTree, TokenAtOffset, WalkEvent, WalkEventWithTokens,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
/// Trivia pieces produced by the tokenizer.
pub use trivia::{TriviaPiece, TriviaPieceKind};
