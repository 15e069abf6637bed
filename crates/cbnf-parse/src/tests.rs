use std::fs;
use std::path::{Path, PathBuf};

use cbnf_yellow::SyntaxKind::{self, *};
use cbnf_yellow::ast::{Expression, Node as _, StringPart, Term};
use cbnf_yellow::{FieldName, SyntaxTree, WalkEvent, WalkEventWithTokens};
use expect_test::expect_file;
use text_size::TextSize;

use crate::parse;

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TestCase {
    input: PathBuf,
    expected: PathBuf,
    text: String,
}

impl TestCase {
    fn list() -> Vec<Self> {
        let test_data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");

        let mut cases = fs::read_dir(&test_data_dir)
            .unwrap_or_else(|err| {
                panic!("Cannot read directory {}: {err}", test_data_dir.display())
            })
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? == "cbnf" {
                    let expected = path.with_extension("ir");
                    let text = fs::read_to_string(&path).ok()?;
                    Some(Self { input: path, expected, text })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        cases.sort();
        cases
    }
}

#[test]
fn parse_test_data() {
    let test_cases = TestCase::list();
    assert!(!test_cases.is_empty());

    for case in test_cases {
        let actual = parse(&case.text).debug_dump();
        expect_file![&case.expected].assert_eq(&actual);
    }
}

/// Asserts that the leaf tokens tile the source text exactly.
fn assert_tiled(tree: &SyntaxTree) {
    let mut offset = TextSize::new(0);
    for event in tree.root().preorder_with_tokens() {
        if let WalkEventWithTokens::Token(token) = event {
            assert_eq!(token.text_range().start(), offset, "gap or overlap at {token:?}");
            offset = token.text_range().end();
        }
    }
    assert_eq!(offset, TextSize::of(tree.text()), "{}", tree.debug_dump());
}

fn only_term(expression: Option<Expression<'_>>) -> Term<'_> {
    let Some(Expression::List(list)) = expression else {
        panic!("expected a list, got {expression:?}");
    };
    let terms = list.terms().collect::<Vec<_>>();
    assert_eq!(terms.len(), 1, "{terms:?}");
    terms[0]
}

fn string_parts(term: Term<'_>) -> Vec<(SyntaxKind, String)> {
    let Term::String(string) = term else {
        panic!("expected a string, got {term:?}");
    };
    string
        .parts()
        .map(|part| match part {
            StringPart::Content(token) | StringPart::Escape(token) => {
                (token.kind(), token.text().to_owned())
            }
        })
        .collect()
}

#[test]
fn string_rule_with_stray_semicolon() {
    let parse = parse(r#"rule { "abc"; };"#);
    let rules = parse.syntax().rules().collect::<Vec<_>>();
    assert_eq!(rules.len(), 1);

    let rule = rules[0];
    let name = rule.name().unwrap();
    assert_eq!((name.kind(), name.text()), (IDENT, "rule"));
    assert_eq!(
        string_parts(only_term(rule.definition())),
        [(STRING_CONTENT, "abc".to_owned())]
    );

    assert!(rule.syntax().children().any(|child| child.kind() == ERROR));
    assert_eq!(parse.diagnostics().len(), 1);
    assert_tiled(parse.tree());
}

#[test]
fn alternation() {
    let parse = parse(r#"r { "a" or "b" }; "#);
    assert!(!parse.has_errors(), "{}", parse.debug_dump());

    let rule = parse.syntax().rules().next().unwrap();
    let Some(Expression::Or(or)) = rule.definition() else {
        panic!("expected an alternation");
    };

    let alternatives = or.alternatives().collect::<Vec<_>>();
    assert_eq!(alternatives.len(), 2);
    for (alternative, text) in alternatives.into_iter().zip(["a", "b"]) {
        let terms = alternative.terms().collect::<Vec<_>>();
        assert_eq!(terms.len(), 1);
        assert_eq!(string_parts(terms[0]), [(STRING_CONTENT, text.to_owned())]);
    }
}

#[test]
fn group() {
    let parse = parse(r#"r { ("a" "b") };"#);
    assert!(!parse.has_errors(), "{}", parse.debug_dump());

    let rule = parse.syntax().rules().next().unwrap();
    let Term::Group(group) = only_term(rule.definition()) else {
        panic!("expected a group");
    };
    let Some(Expression::List(inner)) = group.expression() else {
        panic!("expected a list inside the group");
    };

    let terms = inner.terms().collect::<Vec<_>>();
    assert_eq!(terms.len(), 2);
    assert!(terms.iter().all(|term| matches!(term, Term::String(_))));
}

#[test]
fn keyword() {
    let parse = parse("r { nil };");
    assert!(!parse.has_errors());

    let rule = parse.syntax().rules().next().unwrap();
    let Term::Keyword(keyword) = only_term(rule.definition()) else {
        panic!("expected a keyword");
    };
    assert!(keyword.is_nil());
    assert_eq!(keyword.syntax().text_trimmed(), "nil");
    assert_eq!(keyword.syntax().kind().name(), "keyword");
}

#[test]
fn missing_closing_brace() {
    let text = r#"r { "a" ;"#;
    let parse = parse(text);
    assert!(parse.has_errors());

    let rules = parse.syntax().rules().collect::<Vec<_>>();
    assert_eq!(rules.len(), 1);

    let error = rules[0].syntax().children().find(|child| child.kind() == ERROR).unwrap();
    assert_eq!(error.text_range().start(), TextSize::new(8));
    assert_eq!(error.text_range().end(), TextSize::of(text));

    let messages = parse.diagnostics().iter().map(|d| d.message()).collect::<Vec<_>>();
    assert_eq!(messages, ["expected `}`"]);
    assert_tiled(parse.tree());
}

#[test]
fn unicode_escape_is_kept_raw() {
    let parse = parse(r#"s { "\u{41}" };"#);
    assert!(!parse.has_errors());

    let rule = parse.syntax().rules().next().unwrap();
    assert_eq!(
        string_parts(only_term(rule.definition())),
        [(ESCAPE_SEQUENCE, r"\u{41}".to_owned())]
    );
}

#[test]
fn forward_declaration() {
    let parse = parse("$ws;\nrule;");
    assert!(!parse.has_errors());

    let rules = parse.syntax().rules().collect::<Vec<_>>();
    assert_eq!(rules.len(), 2);

    assert!(rules[0].is_meta());
    assert_eq!(rules[0].name_text(), Some("ws"));
    assert!(rules[0].is_declaration());
    assert!(rules[0].definition().is_none());
    assert!(rules[0].syntax().child_by_field_name("definition").is_none());

    assert!(!rules[1].is_meta());
    assert_eq!(rules[1].name_text(), Some("rule"));
}

#[test]
fn reserved_word_prefixes() {
    let parse = parse("r { nilable orchard excepted };");
    assert!(!parse.has_errors());

    let rule = parse.syntax().rules().next().unwrap();
    let Some(Expression::List(list)) = rule.definition() else {
        panic!("expected a list");
    };
    let names = list
        .terms()
        .map(|term| match term {
            Term::Identifier(token) => token.text(),
            other => panic!("expected an identifier, got {other:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(names, ["nilable", "orchard", "excepted"]);
}

#[test]
fn fields() {
    let parse = parse("r { a };");
    let rule = parse.tree().root().children().next().unwrap();

    let name = rule.child_by_field(FieldName::Name).unwrap();
    assert_eq!(name.kind(), IDENT);
    let definition = rule.child_by_field_name("definition").unwrap();
    assert_eq!(definition.kind(), LIST);
    assert_eq!(definition.text_range(), rule.child(4).unwrap().text_range());
}

#[test]
fn empty_input() {
    for text in ["", "  \n", "# only a comment\n"] {
        let parse = parse(text);
        assert!(!parse.has_errors());
        assert_eq!(parse.syntax().rules().count(), 0);
        assert_eq!(parse.tree().root().text_range().len(), TextSize::of(text));
        assert_tiled(parse.tree());
    }
}

#[test]
fn semicolon_in_place_of_closing_brace_ends_the_rule() {
    let parse = parse("a { \"x\" ;\nb { \"y\" };\nc;");
    let names = parse.syntax().rules().map(|rule| rule.name_text()).collect::<Vec<_>>();
    assert_eq!(names, [Some("a"), Some("b"), Some("c")], "{}", parse.debug_dump());

    let messages = parse.diagnostics().iter().map(|d| d.message()).collect::<Vec<_>>();
    assert_eq!(messages, ["expected `}`"]);
    assert_tiled(parse.tree());
}

#[test]
fn recovery_inside_a_body_stops_at_the_semicolon() {
    let parse = parse("r { a ) ; s;");
    let messages = parse.diagnostics().iter().map(|d| d.message()).collect::<Vec<_>>();
    assert_eq!(messages, ["expected `}`"]);

    let kinds = parse.tree().root().children().map(|node| node.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [SYNTAX_RULE, SYNTAX_RULE], "{}", parse.debug_dump());
    assert_tiled(parse.tree());
}

#[test]
fn recovered_rules_are_not_declarations() {
    let parse = parse("r ) ;\n$ws;\na b;");
    let rules = parse
        .syntax()
        .rules()
        .map(|rule| (rule.name_text(), rule.is_declaration()))
        .collect::<Vec<_>>();
    assert_eq!(
        rules,
        [(Some("r"), false), (Some("ws"), true), (Some("a"), false), (Some("b"), true)]
    );
}

#[test]
fn deeply_nested_groups() {
    let depth = 100_000;
    let inputs = [
        "(".repeat(depth),
        format!("r {{ {}", "(".repeat(depth)),
        format!("r {{ {}a{} }};", "(".repeat(depth), ")".repeat(depth)),
    ];

    for text in &inputs {
        let parse = parse(text);
        assert_eq!(parse.tree().root().kind(), SYNTAX);
        assert!(parse.has_errors());
        assert_tiled(parse.tree());
    }

    let parse = parse(&inputs[2]);
    assert_eq!(parse.syntax().rules().count(), 1);
    assert!(parse.diagnostics().iter().any(|d| d.message() == "groups are nested too deeply"));
}

#[test]
fn moderately_nested_groups_parse_cleanly() {
    let depth = 200;
    let parse = parse(&format!("r {{ {}a{} }};", "(".repeat(depth), ")".repeat(depth)));
    assert!(!parse.has_errors(), "{:?}", parse.diagnostics());

    let groups = parse
        .tree()
        .root()
        .preorder()
        .filter(|event| matches!(event, WalkEvent::Enter(node) if node.kind() == GROUP))
        .count();
    assert_eq!(groups, depth);
}

#[test]
fn missing_semicolon_between_rules() {
    let parse = parse("a b;");
    assert_eq!(parse.syntax().rules().count(), 2);

    let messages = parse.diagnostics().iter().map(|d| d.message()).collect::<Vec<_>>();
    assert_eq!(messages, ["expected `;`"]);
}

#[test]
fn stray_tokens_at_top_level() {
    let parse = parse("} ; r;");
    let kinds = parse.tree().root().children().map(|node| node.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [ERROR, ERROR, SYNTAX_RULE]);
    assert_eq!(parse.syntax().rules().count(), 1);
}

#[test]
fn empty_body_and_alternative() {
    let parse = parse("r { };\ns { a or };");
    let messages = parse.diagnostics().iter().map(|d| d.message()).collect::<Vec<_>>();
    assert_eq!(messages, ["expected expression", "expected alternative after `or`"]);
    assert_eq!(parse.syntax().rules().count(), 2);
}

#[test]
fn lexical_and_syntax_errors_are_merged_in_order() {
    let parse = parse("r { \"a\\x\" } s { @ };");
    let messages = parse.diagnostics().iter().map(|d| d.message()).collect::<Vec<_>>();
    assert_eq!(
        messages,
        ["expected two hex digits after `\\x`", "expected `;` after rule definition", "unexpected character `@`"]
    );
}

#[test]
fn malformed_input_terminates_with_a_tiled_tree() {
    let inputs = [
        "{{{",
        ")))",
        "r {",
        "r { ( ( ",
        "r { (a ; }",
        "'",
        "\"\\",
        ";;;",
        "r { a or or }",
        "r r r",
        "@#$",
        "r { \"unterminated\n}; s;",
        "r { 'a' \"b\" } t { $ } ;",
        "$ r x { } ;; } )",
        "r\n{\n  a # trailing\n  # own line\n  or b\n}\n;\n",
    ];

    for text in inputs {
        let parse = parse(text);
        assert_eq!(parse.tree().root().kind(), SYNTAX);
        assert_tiled(parse.tree());
    }
}

#[test]
fn parsing_is_idempotent() {
    let text = "# c\n$ws;\nrule { a ('b' or \"\\u{63}\") nil except $ws };\nbad { ;\n";
    assert_eq!(parse(text).debug_dump(), parse(text).debug_dump());
}

#[test]
fn comments_between_rules_belong_to_the_root() {
    let parse = parse("a;\n# about b\nb;");
    let root = parse.tree().root();
    let comment = root
        .children_with_tokens()
        .filter_map(|child| child.into_token())
        .find(|token| token.kind() == COMMENT)
        .unwrap();
    assert_eq!(comment.text(), "# about b");

    let b = root.children().nth(1).unwrap();
    assert_eq!(b.text(), "b;");
}
