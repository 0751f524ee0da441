use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use recursion_guard::{ExecutionContext, ObjectId, Unwind};
use std::convert::Infallible;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn id(n: u64) -> ObjectId {
    ObjectId::from_raw(n as usize >> 4)
}

fn ok() -> Result<(), Infallible> {
    Ok(())
}

fn bench_fresh(c: &mut Criterion) {
    c.bench_function("detect_recursion_fresh", |b| {
        let cx = ExecutionContext::new();
        let mut ids = lcg(1).map(id);
        b.iter(|| {
            let o = ids.next().unwrap();
            black_box(cx.detect_recursion(&o, ok))
        })
    });
}

fn bench_promote(c: &mut Criterion) {
    c.bench_function("detect_pair_recursion_promote", |b| {
        let cx = ExecutionContext::new();
        let o = ObjectId::from_raw(1);
        let (p1, p2) = (ObjectId::from_raw(2), ObjectId::from_raw(3));
        b.iter(|| {
            black_box(cx.detect_pair_recursion(&o, &p1, || {
                cx.detect_pair_recursion(&o, &p2, ok)?;
                Ok::<(), Infallible>(())
            }))
        })
    });
}

// Walk a linear chain of 256 distinct objects, each frame nested in the last.
fn chain(cx: &ExecutionContext, ids: &[ObjectId]) -> Result<bool, Infallible> {
    match ids.split_first() {
        Some((o, rest)) => cx.detect_recursion(o, || {
            chain(cx, rest)?;
            Ok::<(), Infallible>(())
        }),
        None => Ok(false),
    }
}

fn bench_deep_chain(c: &mut Criterion) {
    c.bench_function("detect_recursion_chain_256", |b| {
        b.iter_batched(
            || {
                let ids: Vec<_> = lcg(7).take(256).map(id).collect();
                (ExecutionContext::with_capacity(256), ids)
            },
            |(cx, ids)| black_box(chain(&cx, &ids)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_outermost_collapse(c: &mut Criterion) {
    fn walk(cx: &ExecutionContext, depth: usize) -> Result<(), Unwind<Infallible>> {
        // Depth 64 revisits the root and collapses the whole walk.
        let o = ObjectId::from_raw(if depth == 64 { 0 } else { depth });
        cx.detect_outermost_recursion(&o, || walk(cx, depth + 1))?;
        Ok(())
    }
    c.bench_function("detect_outermost_collapse_64", |b| {
        let cx = ExecutionContext::new();
        b.iter(|| black_box(cx.detect_outermost_recursion(&ObjectId::from_raw(0), || walk(&cx, 1))))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_fresh, bench_promote, bench_deep_chain, bench_outermost_collapse
}
criterion_main!(benches);
