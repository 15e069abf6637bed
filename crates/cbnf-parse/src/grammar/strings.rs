use cbnf_yellow::SyntaxKind::*;

use crate::parser::Parser;

pub(super) fn string(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();

    loop {
        match p.peek_kind() {
            STRING_CONTENT | ESCAPE_SEQUENCE | MALFORMED_ESCAPE => p.advance(),
            // The tokenizer only yields a quote inside a string when it
            // matches the opening one.
            DOUBLE_QUOTE | SINGLE_QUOTE | UNTERMINATED_STRING => {
                p.advance();
                break;
            }
            _ => {
                p.error("expected closing quote");
                break;
            }
        }
    }

    m.complete(p, STRING);
}
