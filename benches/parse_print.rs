//! Benchmark: parse, print, and parse+print round trip over a mix of descriptor kinds.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quantdsl::{parse, print};

const DESCRIPTORS: &[&str] = &[
    "any<i8:f32>",
    "uniform<i8<-127:127>:f32, 0.0078125:-3>",
    "uniform<u8:f32:1, {2.0:128,0.25,0.5:3,1.0:7,0.125:-1,4.0:9,8.0,16.0:2}>",
    "quantile<u4:f16:f32, {-1.0,-0.696,-0.525,-0.394,-0.284,-0.184,-0.091,0.0,0.079,0.16,0.246,0.337,0.44,0.562,0.722,1.0}:0.05>",
    "quantile<u4:f16:f32:0, {-1.0,-0.5,0.5,1.0}:{0.1:1,0.2:2,0.3:3,0.4:4}>",
    "calibrated<f32<-6.5:6.5>>",
];

fn per_axis_wide(channels: usize) -> String {
    let scales: Vec<String> = (0..channels)
        .map(|i| format!("{:?}:{}", 0.001 * (i + 1) as f64, i as i64 - 64))
        .collect();
    format!("uniform<i8:f32:0, {{{}}}>", scales.join(","))
}

fn bench_parse_print(c: &mut Criterion) {
    let parsed: Vec<_> = DESCRIPTORS.iter().map(|s| parse(s).expect("parse")).collect();
    let wide = per_axis_wide(1024);

    c.bench_function("parse_mixed", |b| {
        b.iter(|| {
            for s in DESCRIPTORS {
                black_box(parse(black_box(s)).expect("parse"));
            }
        })
    });

    c.bench_function("print_mixed", |b| {
        b.iter(|| {
            for t in &parsed {
                black_box(print(black_box(t)));
            }
        })
    });

    c.bench_function("round_trip_per_axis_1024", |b| {
        b.iter(|| {
            let t = parse(black_box(&wide)).expect("parse");
            black_box(print(&t))
        })
    });
}

criterion_group!(benches, bench_parse_print);
criterion_main!(benches);
