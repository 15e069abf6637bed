use cbnf_yellow::SyntaxKind::*;
use cbnf_yellow::SyntaxSet;

use super::{TERM_FIRST, strings};
use crate::parser::{CompletedMarker, Parser};

/// Groups deeper than this are skipped as a single `ERROR`.
const MAX_GROUP_NESTING: u32 = 256;
const GROUP_RECOVERY: SyntaxSet = SyntaxSet::new([RIGHT_PAREN, SEMICOLON, RIGHT_BRACE]);

/// `list ('or' list)*`; a single list is not wrapped.
pub(super) fn expression(p: &mut Parser<'_>) {
    let first = list(p);
    if !p.at(OR_KW) {
        return;
    }

    let m = first.precede(p);
    while p.eat(OR_KW) {
        if p.at_ts(&TERM_FIRST) {
            list(p);
        } else {
            p.missing("expected alternative after `or`");
        }
    }
    m.complete(p, OR);
}

fn list(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert!(p.at_ts(&TERM_FIRST));
    let m = p.start();
    while term(p) {}
    m.complete(p, LIST)
}

fn term(p: &mut Parser<'_>) -> bool {
    match p.peek_kind() {
        IDENT | META => p.advance(),
        NIL_KW | EXCEPT_KW => {
            let m = p.start();
            p.advance();
            m.complete(p, KEYWORD);
        }
        DOUBLE_QUOTE | SINGLE_QUOTE => strings::string(p),
        LEFT_PAREN => group(p),
        // Already reported by the tokenizer.
        UNKNOWN => {
            let m = p.start();
            p.advance();
            m.complete(p, ERROR);
        }
        _ => return false,
    }
    true
}

fn group(p: &mut Parser<'_>) {
    if p.nesting() >= MAX_GROUP_NESTING {
        p.err_recover("groups are nested too deeply", &GROUP_RECOVERY);
        return;
    }

    let m = p.start();
    p.advance();

    if p.at_ts(&TERM_FIRST) {
        p.enter_group();
        expression(p);
        p.exit_group();
    } else {
        p.missing("expected expression");
    }

    p.expect(RIGHT_PAREN, "expected `)`");
    m.complete(p, GROUP);
}
