/// Every token, trivia, error and node kind of the CBNF grammar.
///
/// Token kinds come first so that `SyntaxSet` can address them with a single
/// machine word.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_BRACE,
    RIGHT_BRACE,
    LEFT_PAREN,
    RIGHT_PAREN,
    SEMICOLON,
    DOUBLE_QUOTE,
    SINGLE_QUOTE,

    OR_KW,
    NIL_KW,
    EXCEPT_KW,
    IDENT,
    META,

    STRING_CONTENT,
    ESCAPE_SEQUENCE,

    WHITESPACE,
    COMMENT,

    MALFORMED_ESCAPE,
    UNTERMINATED_STRING,
    UNKNOWN,
    EOF,

    SYNTAX,
    SYNTAX_RULE,
    OR,
    LIST,
    GROUP,
    STRING,
    KEYWORD,
    ERROR,
    TOMBSTONE,
}

impl SyntaxKind {
    /// The node-kind name exposed to consumers of the tree.
    pub const fn name(self) -> &'static str {
        use SyntaxKind::*;

        match self {
            LEFT_BRACE => "{",
            RIGHT_BRACE => "}",
            LEFT_PAREN => "(",
            RIGHT_PAREN => ")",
            SEMICOLON => ";",
            DOUBLE_QUOTE => "\"",
            SINGLE_QUOTE => "'",
            OR_KW => "or",
            NIL_KW => "nil",
            EXCEPT_KW => "except",
            IDENT => "identifier",
            META => "meta",
            STRING_CONTENT => "string_content",
            ESCAPE_SEQUENCE | MALFORMED_ESCAPE => "escape_sequence",
            WHITESPACE => "whitespace",
            COMMENT => "comment",
            UNTERMINATED_STRING | UNKNOWN | ERROR => "ERROR",
            EOF => "end",
            SYNTAX => "syntax",
            SYNTAX_RULE => "syntax_rule",
            OR => "or",
            LIST => "list",
            GROUP => "group",
            STRING => "string",
            KEYWORD => "keyword",
            TOMBSTONE => "tombstone",
        }
    }

    /// Named kinds are grammar symbols; the rest are punctuation, reserved
    /// words and raw string runs.
    pub const fn is_named(self) -> bool {
        use SyntaxKind::*;

        matches!(
            self,
            IDENT
                | META
                | ESCAPE_SEQUENCE
                | MALFORMED_ESCAPE
                | COMMENT
                | UNTERMINATED_STRING
                | UNKNOWN
                | SYNTAX
                | SYNTAX_RULE
                | OR
                | LIST
                | GROUP
                | STRING
                | KEYWORD
                | ERROR
        )
    }

    pub const fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::WHITESPACE | SyntaxKind::COMMENT)
    }

    /// Error nodes and error-marked tokens.
    pub const fn is_error(self) -> bool {
        use SyntaxKind::*;

        matches!(self, MALFORMED_ESCAPE | UNTERMINATED_STRING | UNKNOWN | ERROR)
    }

    pub const fn is_token(self) -> bool {
        (self as u16) <= (SyntaxKind::EOF as u16)
    }
}
