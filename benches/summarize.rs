//! Summarizer throughput over synthetic datasets
//!
//! Run with: cargo bench --bench summarize

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use npbkit::{parse_csv, render_text, EnergyModelConfig, Summary};

const KERNELS: [&str; 8] = ["BT", "CG", "EP", "FT", "IS", "LU", "MG", "SP"];

fn synthetic_csv(rows: usize) -> String {
    let mut csv = String::from(
        "BENCHMARK,CLASS,ARCH,INIT_TIME,RUN_TIME,OPS_MOPS_S,MEM_BW_RD_GB_S,MEM_BW_WR_GB_S,\n",
    );
    for i in 0..rows {
        let kernel = KERNELS[i % KERNELS.len()];
        let arch = if i % 2 == 0 { "cpu" } else { "gpu" };
        let rate = 1000.0 + (i as f64) * 37.5;
        csv.push_str(&format!(
            "{kernel},{},{arch},0.5,10.0,{rate:.2},{:.2},{:.2},\n",
            i / KERNELS.len(),
            20.0 + (i % 13) as f64,
            5.0 + (i % 7) as f64,
        ));
    }
    csv
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");
    let cfg = EnergyModelConfig::default();

    for rows in [16usize, 256, 4096] {
        let csv = synthetic_csv(rows);
        let records = parse_csv(csv.as_bytes()).unwrap();

        group.bench_with_input(BenchmarkId::new("parse", rows), &csv, |b, csv| {
            b.iter(|| parse_csv(black_box(csv.as_bytes())).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("build", rows), &records, |b, records| {
            b.iter(|| Summary::build(black_box(records), &cfg).unwrap());
        });

        let summary = Summary::build(&records, &cfg).unwrap();
        group.bench_with_input(BenchmarkId::new("render_text", rows), &summary, |b, s| {
            b.iter(|| render_text(black_box(s)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_summarize);
criterion_main!(benches);
