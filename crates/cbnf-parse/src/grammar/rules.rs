use cbnf_yellow::FieldName;
use cbnf_yellow::SyntaxKind::*;

use super::{RULE_END, TERM_FIRST, exprs};
use crate::parser::Parser;

pub(super) fn syntax_rule(p: &mut Parser<'_>) {
    let m = p.start();
    p.field(FieldName::Name);
    p.advance();

    match p.peek_kind() {
        SEMICOLON => p.advance(),
        LEFT_BRACE => match rule_body(p) {
            BodyEnd::Closed => p.expect(SEMICOLON, "expected `;` after rule definition"),
            BodyEnd::Terminated => {}
            BodyEnd::Unclosed => {
                p.eat(SEMICOLON);
            }
        },
        IDENT | META => p.missing("expected `;`"),
        _ => {
            p.err_recover("expected `{` or `;` after rule name", &RULE_END);
            p.eat(SEMICOLON);
        }
    }

    m.complete(p, SYNTAX_RULE);
}

enum BodyEnd {
    /// The closing `}` was found.
    Closed,
    /// A `;` stood in for the missing `}` and ended the rule.
    Terminated,
    /// Recovery stopped at a `;` or the end of input without a `}`.
    Unclosed,
}

/// Parses `{ expression }`.
fn rule_body(p: &mut Parser<'_>) -> BodyEnd {
    debug_assert!(p.at(LEFT_BRACE));
    p.advance();

    if p.at_ts(&TERM_FIRST) {
        p.field(FieldName::Definition);
        exprs::expression(p);
    } else {
        p.missing("expected expression");
    }

    match p.peek_kind() {
        RIGHT_BRACE => {
            p.advance();
            BodyEnd::Closed
        }
        EOF => {
            p.missing("expected `}`");
            BodyEnd::Unclosed
        }
        // A stray `;` ends the rule unless `}` follows it.
        SEMICOLON => {
            let m = p.start();
            p.error("expected `}`");
            p.advance();
            m.complete(p, ERROR);

            if p.eat(RIGHT_BRACE) { BodyEnd::Closed } else { BodyEnd::Terminated }
        }
        _ => {
            p.err_recover("expected `}`", &RULE_END);
            if p.eat(RIGHT_BRACE) { BodyEnd::Closed } else { BodyEnd::Unclosed }
        }
    }
}

/// Skips top-level garbage through the next `;` or `}`.
pub(super) fn stray_tokens(p: &mut Parser<'_>) {
    let m = p.start();
    p.error("expected a rule name");

    while !p.at(EOF) {
        let kind = p.peek_kind();
        p.advance();
        if RULE_END.contains(kind) {
            break;
        }
    }

    m.complete(p, ERROR);
}
