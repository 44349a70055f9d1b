use std::hint::black_box;
use std::path::PathBuf;

use chrono::{Local, TimeZone};
use criterion::{Criterion, criterion_group, criterion_main};

use dater::date_rename::{RenameConfig, compute_plan, strip_date_prefix};

fn bench_compute_plan(c: &mut Criterion) {
    let modified = Local
        .with_ymd_and_hms(2024, 3, 5, 12, 0, 0)
        .single()
        .expect("unambiguous local time");
    let config = RenameConfig::default();
    let titleize = RenameConfig {
        titleize: true,
        ..Default::default()
    };
    let paths: Vec<PathBuf> = (0..1000)
        .map(|index| PathBuf::from(format!("photos/holiday/2021.07.{:02} -- beach day {index}.jpg", index % 28 + 1)))
        .collect();

    c.bench_function("compute_plan", |b| {
        b.iter(|| {
            for path in &paths {
                black_box(compute_plan(black_box(path), modified, &config));
            }
        });
    });

    c.bench_function("compute_plan titleize", |b| {
        b.iter(|| {
            for path in &paths {
                black_box(compute_plan(black_box(path), modified, &titleize));
            }
        });
    });
}

fn bench_strip_date_prefix(c: &mut Criterion) {
    c.bench_function("strip_date_prefix", |b| {
        b.iter(|| {
            black_box(strip_date_prefix(black_box("2024.03.05 -- quarterly report")));
            black_box(strip_date_prefix(black_box("quarterly report")));
        });
    });
}

criterion_group!(benches, bench_compute_plan, bench_strip_date_prefix);
criterion_main!(benches);
