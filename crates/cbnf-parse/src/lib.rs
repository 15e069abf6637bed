//! Parser for CBNF grammar descriptions.
//!
//! `parse` never fails: malformed input yields a tree with `ERROR` nodes and
//! error-marked tokens, plus the diagnostics describing them.

use std::fmt::Write as _;

use cbnf_errors::Diagnostic;
use cbnf_yellow::ast::{self, Node as _};
use cbnf_yellow::SyntaxTree;

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

/// The result of parsing one document.
#[derive(Debug)]
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Lexical and syntax diagnostics, ordered by offset.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty() || self.tree.has_errors()
    }

    /// Typed view of the root node.
    pub fn syntax(&self) -> ast::Syntax<'_> {
        match ast::Syntax::cast(self.tree.root()) {
            Some(syntax) => syntax,
            None => unreachable!("the root is always a `SYNTAX` node"),
        }
    }

    /// The tree dump followed by an `Errors:` section.
    pub fn debug_dump(&self) -> String {
        let mut out = self.tree.debug_dump();
        out.push_str("Errors:\n");
        for diagnostic in &self.diagnostics {
            _ = writeln!(out, "  {diagnostic}");
        }
        out
    }
}

pub fn parse(text: &str) -> Parse {
    let mut parser = parser::Parser::new(text);
    grammar::syntax(&mut parser);
    let (tree, diagnostics) = parser.build_tree();

    log::debug!(
        "parsed {} bytes into {} top-level nodes with {} diagnostics",
        text.len(),
        tree.root().children().count(),
        diagnostics.len()
    );

    Parse { tree, diagnostics }
}
