use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sortcheck_core::{normalize_xml, NormalizeOptions, SortProfile};

const CONFIG: &str = include_str!("../../../tests/fixtures/checkstyle-unsorted.xml");

fn bench_normalize(c: &mut Criterion) {
    let sorted = NormalizeOptions::default();
    let compressed = NormalizeOptions {
        compress: true,
        ..NormalizeOptions::default()
    };
    let checkstyle = NormalizeOptions {
        profile: SortProfile::Checkstyle,
        collapse_values: true,
        ..NormalizeOptions::default()
    };

    c.bench_function("normalize_sorted", |b| {
        b.iter(|| normalize_xml(black_box(CONFIG), &sorted))
    });
    c.bench_function("normalize_compressed", |b| {
        b.iter(|| normalize_xml(black_box(CONFIG), &compressed))
    });
    c.bench_function("normalize_checkstyle_profile", |b| {
        b.iter(|| normalize_xml(black_box(CONFIG), &checkstyle))
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
