use numstrconv::{format_f64, format_u64, parse_f32, parse_f64, parse_u64};
use numstrconv::format_f16;

fn test_parse_int() {
    for text in ["18446744073709551615", "0xdeadbeef", "0755", "0b1011"] {
        black_box(parse_u64(black_box(text.as_bytes())).ok());
    }
}

fn test_format_int() {
    let mut buf = [0u8; 80];
    for val in [u64::MAX, 0xdead_beef, 493, 0] {
        for radix in [2, 8, 10, 16] {
            black_box(format_u64(black_box(val), &mut buf, radix, 0, true).ok());
        }
    }
}

fn test_parse_double() {
    for text in [
        "3.141592653589793",
        "2.2250738585072014e-308",
        "9007199254740993",
        "0x1.fffffffffffffp1023",
        "1e-300",
    ] {
        black_box(parse_f64(black_box(text.as_bytes())).ok());
    }
}

fn test_parse_long_double() {
    let text = "1.00000000000000011102230246251565404236316680908203125";
    black_box(parse_f64(black_box(text.as_bytes())).ok());
    black_box(parse_f32(black_box(text.as_bytes())).ok());
}

fn test_format_double() {
    let mut buf = [0u8; 32];
    for val in [
        0.1,
        1.0 / 3.0,
        123456.789,
        f64::MAX,
        f64::MIN_POSITIVE,
        5e-324,
        1e21,
        -2.5e-7,
    ] {
        black_box(format_f64(black_box(val), &mut buf, false).ok());
    }
}

fn test_format_half() {
    let mut buf = [0u8; 32];
    for bits in (0..0x7c00).step_by(97) {
        black_box(format_f16(bits, &mut buf, true).ok());
    }
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("test_parse_int", |b| b.iter(test_parse_int));
    c.bench_function("test_format_int", |b| b.iter(test_format_int));
    c.bench_function("test_parse_double", |b| b.iter(test_parse_double));
    c.bench_function("test_parse_long_double", |b| {
        b.iter(test_parse_long_double)
    });
    c.bench_function("test_format_double", |b| b.iter(test_format_double));
    c.bench_function("test_format_half", |b| b.iter(test_format_half));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
