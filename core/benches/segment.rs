//! Segment search benchmarks.
//!
//! A single segment is a linear scan; every extra segment adds a level of
//! backtracking. Pruning on the first failing position should keep a miss
//! cheaper than a full scan.

use pmatch::prelude::*;

fn main() {
    divan::main();
}

fn rest() -> Pattern {
    Pattern::segment(Pattern::wildcard())
}

fn ints(len: usize, last: i64) -> Value {
    let mut items: Vec<Value> = (0..len.saturating_sub(1)).map(|_| Value::from(1)).collect();
    items.push(Value::from(last));
    Value::Tuple(items)
}

#[divan::bench(args = [4, 16, 64, 256, 1024])]
fn single_segment_hit(bencher: divan::Bencher, len: usize) {
    let pattern = ds![rest(), 3];
    let subject = ints(len, 3);

    bencher.bench_local(|| pattern.is_match(divan::black_box(&subject)));
}

#[divan::bench(args = [4, 16, 64, 256, 1024])]
fn single_segment_miss(bencher: divan::Bencher, len: usize) {
    let pattern = ds![rest(), 3];
    let subject = ints(len, 4);

    bencher.bench_local(|| pattern.is_match(divan::black_box(&subject)));
}

#[divan::bench(args = [4, 16, 64, 256, 1024])]
fn pruned_segment(bencher: divan::Bencher, len: usize) {
    // The second element fails the segment's pattern: the search stops there.
    let pattern = ds![Pattern::segment(1), 3];
    let mut items = vec![Value::from(1), Value::from(2)];
    items.extend((2..len).map(|_| Value::from(1)));
    let subject = Value::Tuple(items);

    bencher.bench_local(|| pattern.is_match(divan::black_box(&subject)));
}

#[divan::bench(args = [8, 32, 128])]
fn two_segments_backtrack(bencher: divan::Bencher, len: usize) {
    // Zeros only at the very end force the outer segment through every length.
    let pattern = ds![rest(), 0, rest(), 0];
    let mut items: Vec<Value> = (0..len.saturating_sub(2)).map(|_| Value::from(1)).collect();
    items.extend([Value::from(0), Value::from(0)]);
    let subject = Value::Tuple(items);

    bencher.bench_local(|| pattern.is_match(divan::black_box(&subject)));
}

#[divan::bench(args = [8, 32, 128])]
fn segment_of_capture(bencher: divan::Bencher, len: usize) {
    let h = Capture::new("h");
    let pattern = ds![Pattern::segment(&h), 3];
    let subject = ints(len, 3);

    bencher.bench_local(|| pattern.is_match(divan::black_box(&subject)));
}
