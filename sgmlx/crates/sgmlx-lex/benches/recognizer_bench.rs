//! Recognizer benchmarks.
//!
//! Run with: `cargo bench --package sgmlx-lex`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sgmlx_lex::{ClassTable, CompiledSyntax, SyntaxConfig, Xchar};
use sgmlx_util::Handler;

fn reference() -> CompiledSyntax {
    SyntaxConfig::reference()
        .and_then(|config| config.compile())
        .expect("reference syntax compiles")
}

fn token_count(syntax: &CompiledSyntax, source: &str) -> usize {
    let handler = Handler::new();
    syntax.tokenize(source, &handler).count()
}

fn bench_class_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("class_table");
    let syntax = reference();
    let table: Arc<ClassTable> = Arc::clone(syntax.table());

    let ascii: Vec<Xchar> = "<doc attr=\"value\">text</doc>".chars().map(Xchar::from).collect();
    group.throughput(Throughput::Elements(ascii.len() as u64));
    group.bench_function("lookup_dense", |b| {
        b.iter(|| ascii.iter().map(|&x| table.lookup(black_box(x)) as u32).sum::<u32>())
    });

    let astral: Vec<Xchar> = (0x1F600..0x1F640).filter_map(char::from_u32).map(Xchar::from).collect();
    group.throughput(Throughput::Elements(astral.len() as u64));
    group.bench_function("lookup_sparse", |b| {
        b.iter(|| astral.iter().map(|&x| table.lookup(black_box(x)) as u32).sum::<u32>())
    });

    group.finish();
}

fn bench_recognizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("recognizer");
    let syntax = reference();

    let markup = r#"<!DOCTYPE doc [
  <!ENTITY % common "title">
]>
<doc version="1">
  <title   >Benchmarks</title>
  <para id='p1' class="x">Some &amp; text with &#38; references.</para>
  <!-- a comment -->
  <?pi data?>
</doc>
"#
    .repeat(16);
    group.throughput(Throughput::Bytes(markup.len() as u64));
    group.bench_function("markup", |b| {
        b.iter(|| token_count(&syntax, black_box(&markup)))
    });

    let blanks = format!("<p{}>", " ".repeat(60)).repeat(64);
    group.throughput(Throughput::Bytes(blanks.len() as u64));
    group.bench_function("blank_runs", |b| {
        b.iter(|| token_count(&syntax, black_box(&blanks)))
    });

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let config = SyntaxConfig::reference().expect("reference syntax parses");
    c.bench_function("compile_reference", |b| {
        b.iter(|| black_box(&config).compile().map(|s| s.partition().class_count()))
    });
}

criterion_group!(benches, bench_class_table, bench_recognizer, bench_compile);
criterion_main!(benches);
