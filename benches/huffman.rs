use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use huffpack::compression::{
    build_tree, compress, decompress, generate_codes, rebuild_tree, FrequencyTable,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sample_text(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..len)
        .map(|_| {
            let a: u8 = rng.gen_range(b' '..=b'~');
            let b: u8 = rng.gen_range(b' '..=b'~');
            a.min(b)
        })
        .collect()
}

fn bench_huffman(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman");

    for size in [1_000, 10_000, 100_000] {
        let data = sample_text(size);
        let freq = FrequencyTable::count(data.iter().copied());
        let tree = build_tree(&freq).unwrap();
        let codes = generate_codes(&tree);
        let archive = compress(data.iter().copied(), &codes).unwrap();

        group.bench_with_input(BenchmarkId::new("build_tree", size), &freq, |b, freq| {
            b.iter(|| build_tree(black_box(freq)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("compress", size), &data, |b, data| {
            b.iter(|| compress(black_box(data).iter().copied(), &codes).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decompress", size), &archive, |b, archive| {
            b.iter(|| decompress(black_box(&archive.bytes), archive.padding, &tree).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("rebuild_tree", size), &codes, |b, codes| {
            b.iter(|| rebuild_tree(black_box(codes)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_huffman);
criterion_main!(benches);
