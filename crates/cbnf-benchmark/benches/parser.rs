use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};

static SIMPLE: &str = r#"rule { "a" or ('b' nil) };"#;

static GRAMMAR: &str = r#"
# a small grammar for a grammar notation
$ws;
syntax { syntax_rule };
syntax_rule { (identifier or meta) ("{" expression "}" or nil) ";" };
expression { or or list };
or { list "or" list };
list { term };
term { identifier or group or string or keyword };
group { "(" expression ")" };
string { '"' (content or escape) '"' or "'" (content or escape) "'" };
escape { "\\" ("x" hex hex or "u{" hex "}" or except "\n") };
keyword { "nil" or "except" };
"#;

static BROKEN: &str = r#"
rule { "abc"; };
r { "a" ;
s { ( "\xZ" or };
} ) @ $ ;
t { 'unterminated
};
"#;

fn benchmark_parser(c: &mut Criterion) {
    let large = GRAMMAR.repeat(64);
    let inputs = [("Simple", SIMPLE), ("Grammar", GRAMMAR), ("Large", large.as_str()), ("Broken", BROKEN)];

    let mut group = c.benchmark_group("parse");
    for (name, text) in inputs {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, &text| {
            b.iter(|| black_box(cbnf_parse::parse(text)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
