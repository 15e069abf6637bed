use crate::SyntaxKind::*;
use crate::{FieldName, NodeOrToken, SyntaxElement, SyntaxNode, SyntaxToken};

pub trait Node<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>
    where
        Self: Sized;

    fn syntax(self) -> SyntaxNode<'a>;
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> Node<'a> for $name<'a> {
            fn cast(syntax: SyntaxNode<'a>) -> Option<Self>
            where
                Self: Sized,
            {
                (syntax.kind() == $kind).then_some(Self(syntax))
            }

            fn syntax(self) -> SyntaxNode<'a> {
                self.0
            }
        }
    };
}

ast_node!(Syntax, SYNTAX);
ast_node!(SyntaxRule, SYNTAX_RULE);
ast_node!(Or, OR);
ast_node!(List, LIST);
ast_node!(Group, GROUP);
ast_node!(StringLit, STRING);
ast_node!(Keyword, KEYWORD);

impl<'a> Syntax<'a> {
    pub fn rules(self) -> impl Iterator<Item = SyntaxRule<'a>> {
        self.0.children().filter_map(SyntaxRule::cast)
    }
}

impl<'a> SyntaxRule<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        self.0.child_by_field(FieldName::Name)?.into_token()
    }

    /// The rule name without the `$` sigil of meta rules.
    pub fn name_text(self) -> Option<&'a str> {
        let name = self.name()?;
        Some(name.text().strip_prefix('$').unwrap_or(name.text()))
    }

    pub fn is_meta(self) -> bool {
        self.name().is_some_and(|name| name.kind() == META)
    }

    pub fn definition(self) -> Option<Expression<'a>> {
        Expression::cast(self.0.child_by_field(FieldName::Definition)?.into_node()?)
    }

    /// `name;` and nothing else: no braced body and no recovered tokens.
    pub fn is_declaration(self) -> bool {
        let mut rest =
            self.0.children_with_tokens().map(SyntaxElement::kind).filter(|kind| !kind.is_trivia()).skip(1);
        rest.next() == Some(SEMICOLON) && rest.next().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expression<'a> {
    Or(Or<'a>),
    List(List<'a>),
}

impl<'a> Node<'a> for Expression<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>
    where
        Self: Sized,
    {
        match syntax.kind() {
            OR => Expression::Or(Or(syntax)).into(),
            LIST => Expression::List(List(syntax)).into(),
            _ => None,
        }
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Expression::Or(or) => or.0,
            Expression::List(list) => list.0,
        }
    }
}

impl<'a> Or<'a> {
    /// The lists separated by `or`, in source order.
    pub fn alternatives(self) -> impl Iterator<Item = List<'a>> {
        self.0.children().filter_map(List::cast)
    }
}

impl<'a> List<'a> {
    pub fn terms(self) -> impl Iterator<Item = Term<'a>> {
        self.0.children_with_tokens().filter_map(Term::cast)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term<'a> {
    Identifier(SyntaxToken<'a>),
    Meta(SyntaxToken<'a>),
    String(StringLit<'a>),
    Keyword(Keyword<'a>),
    Group(Group<'a>),
}

impl<'a> Term<'a> {
    pub fn cast(element: SyntaxElement<'a>) -> Option<Self> {
        match element {
            NodeOrToken::Token(token) => match token.kind() {
                IDENT => Term::Identifier(token).into(),
                META => Term::Meta(token).into(),
                _ => None,
            },
            NodeOrToken::Node(node) => match node.kind() {
                STRING => Term::String(StringLit(node)).into(),
                KEYWORD => Term::Keyword(Keyword(node)).into(),
                GROUP => Term::Group(Group(node)).into(),
                _ => None,
            },
        }
    }
}

impl<'a> Group<'a> {
    pub fn expression(self) -> Option<Expression<'a>> {
        self.0.children().find_map(Expression::cast)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringPart<'a> {
    Content(SyntaxToken<'a>),
    Escape(SyntaxToken<'a>),
}

impl<'a> StringLit<'a> {
    /// The opening quote character.
    pub fn quote(self) -> Option<char> {
        match self.0.first_token()?.kind() {
            DOUBLE_QUOTE => Some('"'),
            SINGLE_QUOTE => Some('\''),
            _ => None,
        }
    }

    pub fn parts(self) -> impl Iterator<Item = StringPart<'a>> {
        self.0.children_with_tokens().filter_map(NodeOrToken::into_token).filter_map(|token| {
            match token.kind() {
                STRING_CONTENT => Some(StringPart::Content(token)),
                ESCAPE_SEQUENCE | MALFORMED_ESCAPE => Some(StringPart::Escape(token)),
                _ => None,
            }
        })
    }

    pub fn is_terminated(self) -> bool {
        let mut quotes = self
            .0
            .children_with_tokens()
            .filter(|child| matches!(child.kind(), DOUBLE_QUOTE | SINGLE_QUOTE));
        quotes.next().is_some() && quotes.next().is_some()
    }
}

impl<'a> Keyword<'a> {
    pub fn token(self) -> Option<SyntaxToken<'a>> {
        self.0.children_with_tokens().filter_map(NodeOrToken::into_token).find(|token| !token.is_trivia())
    }

    pub fn is_nil(self) -> bool {
        self.token().is_some_and(|token| token.kind() == NIL_KW)
    }
}
