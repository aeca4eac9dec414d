// Performance benchmarks for the Drapex engine
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use drapex_core::{Condition, Garment, GarmentIndex, IndexConfig, Vector};
use drapex_similarity::{OutfitGenerator, OutfitRequest, ProfileBuilder, CompatibilityScorer};
use rand::prelude::*;

const DIM: usize = 128;

const CATEGORIES: &[&str] = &["shirt", "trousers", "dress", "coat", "boots", "skirt", "sweater"];
const COLORS: &[&str] = &["black", "white", "navy", "camel", "red", "olive", "cream"];
const TAGS: &[&str] = &["minimalist", "classic", "bohemian", "streetwear", "romantic"];

fn generate_random_vector(rng: &mut impl Rng, dim: usize) -> Vector {
    let data: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect();
    Vector::new(data)
}

fn generate_random_garment(rng: &mut impl Rng, id: usize) -> Garment {
    Garment::new(id as u64, *CATEGORIES.choose(rng).unwrap_or(&"top"), Condition::Good)
        .with_colors([*COLORS.choose(rng).unwrap_or(&"black")])
        .with_style_tags([*TAGS.choose(rng).unwrap_or(&"classic")])
        .with_occasions(["work"])
        .with_embedding(generate_random_vector(rng, DIM))
}

fn index_with(size: usize) -> GarmentIndex {
    let mut rng = rand::rng();
    let index = GarmentIndex::new(IndexConfig {
        name: "bench".to_string(),
        embedding_dim: DIM,
        lock_stripes: 64,
    });
    for i in 0..size {
        index.upsert(generate_random_garment(&mut rng, i)).unwrap();
    }
    index
}

fn benchmark_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("upsert", size), size, |b, &size| {
            let mut rng = rand::rng();
            let garments: Vec<Garment> = (0..size).map(|i| generate_random_garment(&mut rng, i)).collect();
            b.iter(|| {
                let index = GarmentIndex::new(IndexConfig {
                    name: "bench".to_string(),
                    embedding_dim: DIM,
                    lock_stripes: 64,
                });
                index.upsert_batch(garments.clone()).unwrap();
            });
        });
    }

    group.finish();
}

fn benchmark_visual_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("visual_search");
    let mut rng = rand::rng();

    for size in [1000, 10000].iter() {
        let index = index_with(*size);
        let query = generate_random_vector(&mut rng, DIM);
        for k in [10, 50].iter() {
            group.bench_with_input(BenchmarkId::new(format!("corpus_{}", size), k), k, |b, &k| {
                b.iter(|| {
                    black_box(index.search(&query, k, None).unwrap());
                });
            });
        }
    }

    group.finish();
}

fn benchmark_profile_scoring(c: &mut Criterion) {
    let mut rng = rand::rng();
    let wardrobe: Vec<Garment> = (0..200).map(|i| generate_random_garment(&mut rng, i)).collect();
    let candidates: Vec<Garment> = (0..1000).map(|i| generate_random_garment(&mut rng, i)).collect();
    let builder = ProfileBuilder::default();
    let scorer = CompatibilityScorer::default();

    c.bench_function("profile_build_200", |b| {
        b.iter(|| black_box(builder.build(&wardrobe, &[])));
    });

    let profile = builder.build(&wardrobe, &[]);
    c.bench_function("compatibility_1000", |b| {
        b.iter(|| {
            for g in &candidates {
                black_box(scorer.score(&profile, g));
            }
        });
    });
}

fn benchmark_outfits(c: &mut Criterion) {
    let mut group = c.benchmark_group("outfits");
    let mut rng = rand::rng();
    let generator = OutfitGenerator::default();

    for size in [10, 40].iter() {
        let wardrobe: Vec<Garment> = (0..*size).map(|i| generate_random_garment(&mut rng, i)).collect();
        group.bench_with_input(BenchmarkId::new("generate", size), &wardrobe, |b, wardrobe| {
            b.iter(|| black_box(generator.generate(wardrobe, &OutfitRequest::for_occasion("work"))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_visual_search,
    benchmark_profile_scoring,
    benchmark_outfits
);
criterion_main!(benches);
