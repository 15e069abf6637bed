//! Context-sensitive CBNF tokenizer.
//!
//! Tokens are produced on demand. Whitespace and comments are collected as
//! trivia pieces and attached to the neighbouring token instead of being
//! emitted on their own: trivia on the same line as a token trails it, the
//! rest leads the next token.

mod cursor;

use cbnf_errors::Diagnostic;
pub use cbnf_yellow::SyntaxKind;
use cbnf_yellow::SyntaxKind::*;
use cbnf_yellow::{TriviaPiece, TriviaPieceKind};
use cursor::Cursor;
use text_size::{TextRange, TextSize};

/// Indices into the tokenizer's trivia piece buffer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TriviaRange {
    start: u32,
    end: u32,
}

impl TriviaRange {
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    fn new(start: usize, end: usize) -> Self {
        Self { start: start as u32, end: end as u32 }
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Resolves the range against the buffer returned by `Tokenizer::finish`.
    pub fn pieces(self, all: &[TriviaPiece]) -> &[TriviaPiece] {
        &all[self.start as usize..self.end as usize]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub leading: TriviaRange,
    pub kind: SyntaxKind,
    pub kind_range: TextRange,
    pub trailing: TriviaRange,
}

impl Token {
    const EOF: Self = Self {
        kind: EOF,
        kind_range: TextRange::empty(TextSize::new(0)),
        leading: TriviaRange::EMPTY,
        trailing: TriviaRange::EMPTY,
    };
}

/// Lexing context. Inside a string only content, escapes and the matching
/// quote are recognised.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    TopLevel,
    String { quote: char },
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    mode: Mode,
    current: Token,
    trivia_pieces: Vec<TriviaPiece>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new(text),
            mode: Mode::TopLevel,
            current: Token::EOF,
            trivia_pieces: Vec::with_capacity(16),
            diagnostics: Vec::new(),
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Trivia collected so far, addressed by `TriviaRange`.
    pub fn trivia_pieces(&self) -> &[TriviaPiece] {
        &self.trivia_pieces
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the tokenizer, handing out the trivia buffer and the lexical
    /// diagnostics.
    pub fn finish(self) -> (Vec<TriviaPiece>, Vec<Diagnostic>) {
        (self.trivia_pieces, self.diagnostics)
    }

    fn offset(&self) -> TextSize {
        TextSize::new(self.text.len() as u32) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn text(&self) -> &'a str {
        &self.text[self.range()]
    }

    /// Returns the current token and lexes the next one.
    pub fn next_token(&mut self) -> Token {
        let leading = match self.mode {
            Mode::TopLevel => self.trivia(true),
            Mode::String { .. } => TriviaRange::EMPTY,
        };

        let kind = match self.mode {
            Mode::TopLevel => self.top_level(),
            Mode::String { quote } => self.string_part(quote),
        };
        let kind_range = self.range();
        self.cursor.reset_pos_within_token();

        let trailing = match self.mode {
            Mode::TopLevel if kind != EOF => self.trivia(false),
            _ => TriviaRange::EMPTY,
        };

        std::mem::replace(&mut self.current, Token { leading, kind, kind_range, trailing })
    }

    /// Collects whitespace and comments. Trailing trivia stops at a newline.
    fn trivia(&mut self, leading: bool) -> TriviaRange {
        let start = self.trivia_pieces.len();

        loop {
            let kind = match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                '#' => {
                    self.cursor.advance_while(|c| c != '\n');
                    TriviaPieceKind::Comment
                }
                ' ' | '\t' | '\r' => {
                    self.cursor.advance_while(|c| matches!(c, ' ' | '\t' | '\r') || (leading && c == '\n'));
                    TriviaPieceKind::Whitespace
                }
                '\n' if leading => {
                    self.cursor.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                    TriviaPieceKind::Whitespace
                }
                _ => break,
            };

            self.trivia_pieces.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
            self.cursor.reset_pos_within_token();
        }

        TriviaRange::new(start, self.trivia_pieces.len())
    }

    fn top_level(&mut self) -> SyntaxKind {
        let Some(first_char) = self.cursor.advance() else {
            return EOF;
        };

        match first_char {
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            ';' => SEMICOLON,
            '"' => {
                self.mode = Mode::String { quote: '"' };
                DOUBLE_QUOTE
            }
            '\'' => {
                self.mode = Mode::String { quote: '\'' };
                SINGLE_QUOTE
            }
            '$' => {
                if self.cursor.is_eof() || !is_ident_start(self.cursor.peek()) {
                    self.error("expected an identifier after `$`");
                    return UNKNOWN;
                }
                self.cursor.advance_while(is_ident_continue);
                META
            }
            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);

                match self.text() {
                    "or" => OR_KW,
                    "nil" => NIL_KW,
                    "except" => EXCEPT_KW,
                    _ => IDENT,
                }
            }
            c => {
                self.error(format!("unexpected character `{}`", c.escape_debug()));
                UNKNOWN
            }
        }
    }

    fn string_part(&mut self, quote: char) -> SyntaxKind {
        if self.cursor.is_eof() || self.cursor.matches('\n') {
            return self.unterminated();
        }

        match self.cursor.peek() {
            c if c == quote => {
                self.cursor.advance();
                self.mode = Mode::TopLevel;
                if quote == '"' { DOUBLE_QUOTE } else { SINGLE_QUOTE }
            }
            '\\' => {
                self.cursor.advance();
                self.escape()
            }
            '#' => {
                self.cursor.advance();
                STRING_CONTENT
            }
            _ => {
                self.cursor.advance_while(|c| !matches!(c, '\\' | '#' | '\n') && c != quote);
                if self.cursor.is_eof() || self.cursor.matches('\n') {
                    return self.unterminated();
                }
                STRING_CONTENT
            }
        }
    }

    fn unterminated(&mut self) -> SyntaxKind {
        self.mode = Mode::TopLevel;
        self.error("unterminated string literal");
        UNTERMINATED_STRING
    }

    /// Lexes an escape sequence; the backslash is already consumed.
    fn escape(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() || self.cursor.matches('\n') {
            return self.malformed("incomplete escape sequence");
        }

        match self.cursor.advance() {
            Some('x') => {
                if self.cursor.advance_up_to(2, is_hex) == 2 {
                    ESCAPE_SEQUENCE
                } else {
                    self.malformed("expected two hex digits after `\\x`")
                }
            }
            Some('u') if self.cursor.matches('{') => {
                self.cursor.advance();
                let digits = self.cursor.advance_up_to(usize::MAX, is_hex);

                if !self.cursor.matches('}') {
                    return self.malformed("expected `}` to close the unicode escape");
                }
                self.cursor.advance();

                if (1..=6).contains(&digits) {
                    ESCAPE_SEQUENCE
                } else {
                    self.malformed("expected one to six hex digits in a unicode escape")
                }
            }
            Some('u') => {
                if self.cursor.advance_up_to(4, is_hex) == 4 {
                    ESCAPE_SEQUENCE
                } else {
                    self.malformed("expected four hex digits after `\\u`")
                }
            }
            _ => ESCAPE_SEQUENCE,
        }
    }

    fn malformed(&mut self, message: &str) -> SyntaxKind {
        self.error(message);
        MALFORMED_ESCAPE
    }

    /// Reports a lexical error over the token scanned so far.
    fn error(&mut self, message: impl Into<String>) {
        let diagnostic = Diagnostic::lexical(message, self.range());
        log::trace!("lexical error at {:?}: {}", diagnostic.range(), diagnostic.message());
        self.diagnostics.push(diagnostic);
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}
