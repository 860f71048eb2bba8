//! Benchmarks for the Danish formatters and the refresh scan
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use elpris_page::page::{PageDocument, PageElement};
use elpris_page::{format_price, DateTimeFormatter, DisplayZone};

fn bench_format_price(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_price");

    for (name, value) in [("small", 0.145), ("typical", 2.4567), ("large", 1_234_567.891)] {
        group.bench_function(name, |b| b.iter(|| format_price(black_box(value)).unwrap()));
    }

    group.finish();
}

fn bench_format_date_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_date_time");
    let copenhagen = DateTimeFormatter::new(DisplayZone::Copenhagen);
    let utc = DateTimeFormatter::new(DisplayZone::Utc);

    group.bench_function("rfc3339_copenhagen", |b| {
        b.iter(|| copenhagen.format(black_box("2024-01-15T09:05:00Z")).unwrap())
    });

    group.bench_function("naive_utc", |b| {
        b.iter(|| utc.format(black_box("2025-09-21T13:00:00")).unwrap())
    });

    group.finish();
}

fn bench_refresh_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh_scan");

    for size in [10, 100, 1000] {
        let mut document = PageDocument::new();
        for i in 0..size {
            let mut element = PageElement::new(format!("el-{}", i));
            if i % 2 == 0 {
                element = element.auto_refresh();
            }
            if i % 3 == 0 {
                element = element.hx_get(format!("/api/fragment/{}", i));
            }
            document.insert(element);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("targets_{}", size), |b| {
            b.iter(|| black_box(&document).refresh_targets())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_format_price, bench_format_date_time, bench_refresh_scan);
criterion_main!(benches);
