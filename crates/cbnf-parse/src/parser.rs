use cbnf_errors::Diagnostic;
use cbnf_tokenizer::{Token, Tokenizer, TriviaRange};
use cbnf_yellow::{Builder, FieldName, SyntaxKind, SyntaxSet, SyntaxTree};
use drop_bomb::DropBomb;

pub(crate) struct Parser<'a> {
    text: &'a str,
    tokenizer: Tokenizer<'a>,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
    nesting: u32,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            tokenizer: Tokenizer::new(text),
            events: Vec::new(),
            diagnostics: Vec::new(),
            nesting: 0,
        }
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.tokenizer.peek().kind
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_ts(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    pub(crate) fn advance(&mut self) {
        if self.at(SyntaxKind::EOF) {
            return;
        }

        let token = self.tokenizer.next_token();
        self.events.push(Event::Token(token));
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.advance();
        true
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind, message: &str) {
        if !self.eat(kind) {
            self.missing(message);
        }
    }

    /// Records the end-of-input token so the trivia in front of it lands in
    /// the tree.
    pub(crate) fn eat_eof(&mut self) {
        debug_assert!(self.at(SyntaxKind::EOF));
        let token = self.tokenizer.next_token();
        self.events.push(Event::Token(token));
    }

    /// Current number of open groups.
    pub(crate) fn nesting(&self) -> u32 {
        self.nesting
    }

    pub(crate) fn enter_group(&mut self) {
        self.nesting += 1;
    }

    pub(crate) fn exit_group(&mut self) {
        debug_assert!(self.nesting > 0);
        self.nesting -= 1;
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    /// Names the next node or non-trivia token of the current node.
    pub(crate) fn field(&mut self, field: FieldName) {
        self.events.push(Event::Field(field));
    }

    /// Reports an error at the current token. A second error at the same
    /// offset is dropped.
    pub(crate) fn error(&mut self, message: &str) {
        let range = self.tokenizer.peek().kind_range;
        if self.diagnostics.last().is_some_and(|last| last.range().start() == range.start()) {
            return;
        }

        log::trace!("syntax error at {range:?}: {message}");
        self.diagnostics.push(Diagnostic::syntax(message, range));
    }

    /// Reports a missing construct as an empty `ERROR` node.
    pub(crate) fn missing(&mut self, message: &str) {
        let m = self.start();
        self.error(message);
        m.complete(self, SyntaxKind::ERROR);
    }

    /// Wraps tokens into an `ERROR` node until one in `recovery` shows up.
    /// At least one token is consumed unless the input is exhausted.
    pub(crate) fn err_recover(&mut self, message: &str, recovery: &SyntaxSet) {
        let m = self.start();
        self.error(message);

        self.advance();
        while !self.at(SyntaxKind::EOF) && !self.at_ts(recovery) {
            self.advance();
        }

        log::trace!("recovered before {:?}", self.tokenizer.peek().kind_range);
        m.complete(self, SyntaxKind::ERROR);
    }

    pub(crate) fn build_tree(self) -> (SyntaxTree, Vec<Diagnostic>) {
        let Parser { text, tokenizer, mut events, diagnostics, .. } = self;
        let (trivia, mut all_diagnostics) = tokenizer.finish();
        let mut builder = Builder::new(text);
        let mut forward_parents = Vec::new();
        let mut depth = 0usize;

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == SyntaxKind::TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != SyntaxKind::TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    // Trivia in front of a node belongs to its parent.
                    if depth > 0 {
                        let leading = take_leading_trivia(&mut events[i + 1..]);
                        for &piece in leading.pieces(&trivia) {
                            builder.trivia(piece);
                        }
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                        depth += 1;
                    }
                }
                Event::Finish => {
                    builder.finish_node();
                    depth -= 1;
                }
                Event::Field(field) => builder.field(field),
                Event::Token(Token { leading, kind, kind_range, trailing }) => {
                    for &piece in leading.pieces(&trivia) {
                        builder.trivia(piece);
                    }

                    if kind != SyntaxKind::EOF {
                        builder.token(kind, kind_range.len());
                        for &piece in trailing.pieces(&trivia) {
                            builder.trivia(piece);
                        }
                    }
                }
            }
        }

        all_diagnostics.extend(diagnostics);
        all_diagnostics.sort_by_key(|diagnostic| diagnostic.range().start());

        (builder.finish(), all_diagnostics)
    }
}

/// Detaches the leading trivia of the first token a node is about to open
/// with. An empty node leaves it in place.
fn take_leading_trivia(events: &mut [Event]) -> TriviaRange {
    for event in events {
        match event {
            Event::Start { .. } | Event::Field(_) => {}
            Event::Token(token) => return std::mem::take(&mut token.leading),
            Event::Finish => break,
        }
    }
    TriviaRange::EMPTY
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token(Token),
    Field(FieldName),
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Event::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Marker {
        Marker {
            position: pos,
            bomb: DropBomb::new("Marker must be completed"),
        }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }
}

pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        CompletedMarker { pos }
    }

    /// Starts a node that will become the parent of this one.
    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
