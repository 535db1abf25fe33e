//! Criterion benchmarks for the typed buffer accessors and bulk
//! operations across the concrete backings.
//!
//! Run with:
//!   cargo bench --bench buffer

use ballast::{
    AlignedBuffer, ByteOrder, DirectBuffer, ExpandableBuffer, HeapBuffer, MutableBuffer,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_typed_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_access");
    const FIELDS: usize = 1024;
    group.throughput(Throughput::Bytes((FIELDS * 8) as u64));

    group.bench_function("put_get_i64_heap", |b| {
        let mut buffer = HeapBuffer::new(FIELDS * 8);
        b.iter(|| {
            let mut total = 0i64;
            for i in 0..FIELDS {
                buffer.put_i64(i * 8, i as i64).unwrap();
                total = total.wrapping_add(buffer.get_i64(i * 8).unwrap());
            }
            total
        })
    });

    group.bench_function("put_get_i64_aligned", |b| {
        let mut buffer = AlignedBuffer::new_cache_aligned(FIELDS * 8).unwrap();
        b.iter(|| {
            let mut total = 0i64;
            for i in 0..FIELDS {
                buffer.put_i64(i * 8, i as i64).unwrap();
                total = total.wrapping_add(buffer.get_i64(i * 8).unwrap());
            }
            total
        })
    });

    group.bench_function("put_get_i64_swapped", |b| {
        let mut buffer = HeapBuffer::new(FIELDS * 8);
        let order = match ByteOrder::NATIVE {
            ByteOrder::LittleEndian => ByteOrder::BigEndian,
            ByteOrder::BigEndian => ByteOrder::LittleEndian,
        };
        b.iter(|| {
            let mut total = 0i64;
            for i in 0..FIELDS {
                buffer.put_i64_order(i * 8, i as i64, order).unwrap();
                total = total.wrapping_add(buffer.get_i64_order(i * 8, order).unwrap());
            }
            total
        })
    });
    group.finish();
}

fn bench_bulk_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_copy");
    for &size in &[64usize, 1024, 65_536] {
        let payload = vec![0x5Au8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("put_bytes", size), &payload, |b, src| {
            let mut buffer = HeapBuffer::new(size);
            b.iter(|| buffer.put_bytes(0, src).unwrap())
        });
        group.bench_with_input(
            BenchmarkId::new("expandable_put_bytes", size),
            &payload,
            |b, src| {
                let mut buffer = ExpandableBuffer::with_initial_capacity(size);
                b.iter(|| buffer.put_bytes(0, src).unwrap())
            },
        );
    }
    group.finish();
}

fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");
    let text = "quick brown fox jumps over the lazy dog";
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("ascii_roundtrip", |b| {
        let mut buffer = HeapBuffer::new(256);
        b.iter(|| {
            buffer.put_string_ascii(0, text).unwrap();
            buffer.get_string_ascii(0).unwrap()
        })
    });

    group.bench_function("utf8_roundtrip", |b| {
        let mut buffer = HeapBuffer::new(256);
        b.iter(|| {
            buffer.put_string_utf8(0, Some(text)).unwrap();
            buffer.get_string_utf8(0).unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_typed_access, bench_bulk_copy, bench_strings);
criterion_main!(benches);
