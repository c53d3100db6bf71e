use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hotel_catalog::{CatalogConfig, CatalogLister, HotelFilters, MemoryStore, Timers};
use rand::{seq::SliceRandom, thread_rng, Rng};
use std::sync::Arc;

const ROOM_TYPES: [&str; 3] = ["Maison", "Appartement", "Studio"];

// Random catalog around Paris
fn build_store(hotels: u64) -> Arc<MemoryStore> {
    let mut rng = thread_rng();
    let store = MemoryStore::new();

    for id in 1..=hotels {
        store
            .add_principal(id, &format!("Hotel {id}"))
            .add_principal_meta(id, "address_city", "Paris")
            .add_principal_meta(id, "geo_lat", &(48.85 + rng.gen_range(-0.3..0.3)).to_string())
            .add_principal_meta(id, "geo_lng", &(2.35 + rng.gen_range(-0.3..0.3)).to_string());

        for r in 0..rng.gen_range(1..6u64) {
            let room_id = id * 100 + r;
            store
                .add_post(room_id, id, "room", "Chambre")
                .add_post_meta(room_id, "price", &rng.gen_range(40..400).to_string())
                .add_post_meta(room_id, "surface", &rng.gen_range(10..120).to_string())
                .add_post_meta(room_id, "bedrooms_count", &rng.gen_range(0..5).to_string())
                .add_post_meta(room_id, "bathrooms_count", &rng.gen_range(0..3).to_string())
                .add_post_meta(room_id, "type", ROOM_TYPES.choose(&mut rng).copied().unwrap_or("Maison"));
        }

        for r in 0..rng.gen_range(0..4u64) {
            let review_id = id * 100 + 50 + r;
            store
                .add_post(review_id, id, "review", "Avis")
                .add_post_meta(review_id, "rating", &rng.gen_range(1..=5).to_string());
        }
    }

    Arc::new(store)
}

pub fn catalog_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("catalog_list");

    let filters = HotelFilters {
        lat: Some(48.85),
        lng: Some(2.35),
        distance: Some(20.0),
        bedrooms: Some(1),
        ..Default::default()
    };

    for hotels in [10u64, 100, 500].iter() {
        let store = build_store(*hotels);

        for (label, config) in [
            ("per_field", CatalogConfig::default()),
            (
                "batched",
                CatalogConfig {
                    batch_attributes: true,
                    ..Default::default()
                },
            ),
            (
                "concurrent",
                CatalogConfig {
                    batch_attributes: true,
                    concurrency: 8,
                    ..Default::default()
                },
            ),
        ] {
            let lister = CatalogLister::new(store.clone(), Arc::new(Timers::new()), config);
            group.bench_with_input(BenchmarkId::new(label, hotels), hotels, |b, _| {
                b.iter(|| {
                    let hotels = runtime.block_on(lister.list(black_box(&filters))).unwrap();
                    black_box(hotels);
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, catalog_benchmark);
criterion_main!(benches);
