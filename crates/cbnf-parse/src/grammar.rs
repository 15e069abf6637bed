use cbnf_yellow::SyntaxKind::*;
use cbnf_yellow::SyntaxSet;

use crate::parser::Parser;

mod exprs;
mod rules;
mod strings;

/// Tokens that can start a rule.
const RULE_FIRST: SyntaxSet = SyntaxSet::new([IDENT, META]);
/// Synchronizing tokens for error recovery.
const RULE_END: SyntaxSet = SyntaxSet::new([SEMICOLON, RIGHT_BRACE]);
/// Tokens that can start a term. `UNKNOWN` is taken in so that a stray
/// character does not end the list it appears in.
const TERM_FIRST: SyntaxSet =
    SyntaxSet::new([IDENT, META, NIL_KW, EXCEPT_KW, DOUBLE_QUOTE, SINGLE_QUOTE, LEFT_PAREN, UNKNOWN]);

pub(crate) fn syntax(p: &mut Parser<'_>) {
    let m = p.start();

    while !p.at(EOF) {
        if p.at_ts(&RULE_FIRST) {
            rules::syntax_rule(p);
        } else {
            rules::stray_tokens(p);
        }
    }

    p.eat_eof();
    m.complete(p, SYNTAX);
}
