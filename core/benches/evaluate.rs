//! Evaluate benchmarks — the dispatch hot path.
//!
//! Measures: literal and destructure arms, first-match-wins over many arms,
//! captures and guards, miss-heavy workloads, and trace overhead.

use pmatch::prelude::*;

fn main() {
    divan::main();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test fixtures
// ═══════════════════════════════════════════════════════════════════════════════

fn int(b: &Bindings<'_>, c: &Capture) -> i64 {
    b[c].as_int().unwrap_or(0)
}

fn calculator() -> Match<'static, i64> {
    let i = Capture::new("i");
    let j = Capture::new("j");
    Match::new()
        .arm(ds!['/', 0, Pattern::wildcard()], |_| 0)
        .arm(ds!['*', &i, &j], {
            let (i, j) = (i.clone(), j.clone());
            move |b| int(b, &i) * int(b, &j)
        })
        .arm(ds!['+', &i, &j], {
            let (i, j) = (i.clone(), j.clone());
            move |b| int(b, &i) + int(b, &j)
        })
        .arm(Pattern::wildcard(), |_| -1)
}

fn literal_arms(n: usize) -> Match<'static, usize> {
    (0..n).fold(Match::new(), |m, k| {
        m.arm(Pattern::literal(i64::try_from(k).unwrap_or(i64::MAX)), move |_| k)
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Core scenario: literal match (baseline)
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench]
fn literal_hit(bencher: divan::Bencher) {
    let m = Match::new()
        .arm(1, |_| "one")
        .arm(Pattern::wildcard(), |_| "other");
    let subject = Value::from(1);

    bencher.bench_local(|| m.evaluate(divan::black_box(&subject)));
}

#[divan::bench]
fn literal_miss(bencher: divan::Bencher) {
    let m = Match::new().arm(1, |_| "one");
    let subject = Value::from(2);

    bencher.bench_local(|| m.evaluate(divan::black_box(&subject)));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Destructure and captures
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench]
fn calculator_multiply(bencher: divan::Bencher) {
    let m = calculator();
    let subject = Value::from(('*', 6, 7));

    bencher.bench_local(|| m.evaluate(divan::black_box(&subject)));
}

#[divan::bench]
fn calculator_fallthrough(bencher: divan::Bencher) {
    let m = calculator();
    let subject = Value::from(('-', 6, 7));

    bencher.bench_local(|| m.evaluate(divan::black_box(&subject)));
}

#[divan::bench]
fn repeated_capture(bencher: divan::Bencher) {
    let x = Capture::new("x");
    let pattern = ds![&x, ds![Pattern::wildcard(), &x]];
    let subject = Value::from((2, (1, 2)));

    bencher.bench_local(|| pattern.is_match(divan::black_box(&subject)));
}

#[divan::bench]
fn borrowed_vs_owned_capture(bencher: divan::Bencher) {
    let owned = Capture::new("owned");
    let borrowed = Capture::borrowed("borrowed");
    let pattern = ds![&owned, &borrowed];
    let payload = "x".repeat(1024);
    let subject = Value::from((payload.as_str(), payload.as_str()));

    bencher.bench_local(|| pattern.is_match(divan::black_box(&subject)));
}

#[divan::bench]
fn guarded_arm(bencher: divan::Bencher) {
    let i = Capture::new("i");
    let j = Capture::new("j");
    let m = Match::new()
        .arm(
            ds![&i, &j].when({
                let (i, j) = (i.clone(), j.clone());
                move |b| int(b, &i) + int(b, &j) == 10
            }),
            |_| 3,
        )
        .arm(ds![Pattern::lt(5), Pattern::wildcard()], |_| 5)
        .arm(Pattern::wildcard(), |_| 1);
    let subject = Value::from((1, 7));

    bencher.bench_local(|| m.evaluate(divan::black_box(&subject)));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Scaling: arm count
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [1, 10, 50, 100, 200])]
fn arm_count_last_match(bencher: divan::Bencher, n: usize) {
    let m = literal_arms(n);
    let subject = Value::from(i64::try_from(n - 1).unwrap_or(0));

    bencher.bench_local(|| m.evaluate(divan::black_box(&subject)));
}

#[divan::bench(args = [1, 10, 50, 100, 200])]
fn arm_count_miss(bencher: divan::Bencher, n: usize) {
    let m = literal_arms(n);
    let subject = Value::from(-1);

    bencher.bench_local(|| m.evaluate_or(divan::black_box(&subject), usize::MAX));
}

#[divan::bench(args = [1, 4, 8, 16])]
fn depth_nested_destructure(bencher: divan::Bencher, depth: usize) {
    let mut pattern = Pattern::literal(0);
    let mut subject = Value::from(0);
    for _ in 0..depth {
        pattern = ds![pattern];
        subject = Value::Tuple(vec![subject]);
    }

    bencher.bench_local(|| pattern.is_match(divan::black_box(&subject)));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Trace overhead
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench]
fn trace_overhead_evaluate(bencher: divan::Bencher) {
    let m = calculator();
    let subject = Value::from(('+', 6, 7));

    bencher.bench_local(|| m.evaluate(divan::black_box(&subject)));
}

#[divan::bench]
fn trace_overhead_with_trace(bencher: divan::Bencher) {
    let m = calculator();
    let subject = Value::from(('+', 6, 7));

    bencher.bench_local(|| m.evaluate_with_trace(divan::black_box(&subject)));
}
