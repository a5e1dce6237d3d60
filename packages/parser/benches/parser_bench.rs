use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stache_parser::parse;

fn parse_scalar_template(c: &mut Criterion) {
    let source = "Hello, {{name}}! You have {{count}} new messages.";

    c.bench_function("parse_scalar_template", |b| {
        b.iter(|| parse(black_box(source)))
    });
}

fn parse_section_template(c: &mut Criterion) {
    let source = r#"
        {{#users}}
          {{name}} ({{contact.email}})
          {{#roles}}{{.}}{{/roles}}
          {{^roles}}no roles{{/roles}}
        {{/users}}
        {{> _footer}}
    "#;

    c.bench_function("parse_section_template", |b| {
        b.iter(|| parse(black_box(source)))
    });
}

fn parse_large_file(c: &mut Criterion) {
    // Simulate a large template with many repeated blocks
    let mut source = String::new();

    for i in 0..200 {
        source.push_str(&format!(
            "{{{{#block{i}}}}}\n  {{{{title}}}} by {{{{meta.author}}}}\n  {{{{> _row}}}}\n{{{{/block{i}}}}}\n"
        ));
    }

    c.bench_function("parse_large_file", |b| b.iter(|| parse(black_box(&source))));
}

criterion_group!(
    benches,
    parse_scalar_template,
    parse_section_template,
    parse_large_file
);
criterion_main!(benches);
