use std::str::Chars;

use text_size::{TextLen, TextSize};

pub(crate) const EOF_CHAR: char = '\0';

/// Character cursor tracking how far into the current token it has moved.
pub(crate) struct Cursor<'a> {
    chars: Chars<'a>,
    len: TextSize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { chars: text.chars(), len: text.text_len() }
    }

    /// Bytes left to consume.
    pub(crate) fn len(&self) -> TextSize {
        TextSize::new(self.chars.as_str().len() as u32)
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub(crate) fn pos_within_token(&self) -> TextSize {
        self.len - self.len()
    }

    pub(crate) fn reset_pos_within_token(&mut self) {
        self.len = self.len();
    }

    /// Next character, or `EOF_CHAR` at the end. A literal NUL in the input
    /// also reads as `EOF_CHAR`, so callers check `is_eof` before trusting it.
    pub(crate) fn peek(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn matches(&self, c: char) -> bool {
        !self.is_eof() && self.peek() == c
    }

    pub(crate) fn advance(&mut self) -> Option<char> {
        self.chars.next()
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(char) -> bool + Copy) {
        while !self.is_eof() && f(self.peek()) {
            self.advance();
        }
    }

    /// Consumes up to `max` characters matching `f`, returning how many were eaten.
    pub(crate) fn advance_up_to(&mut self, max: usize, f: impl Fn(char) -> bool + Copy) -> usize {
        let mut eaten = 0;
        while eaten < max && !self.is_eof() && f(self.peek()) {
            self.advance();
            eaten += 1;
        }
        eaten
    }
}
