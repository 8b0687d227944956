//! Performance benchmarks for the Service Record Engine.
//!
//! This benchmark suite measures:
//! - Pure classification (time class and extension tiering)
//! - Single record derivation against the in-memory store
//! - A single HTTP request through the router
//! - Batches of 100 and 1000 events
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use service_record_engine::api::{create_router, AppState};
use service_record_engine::calculation::{classify_duration, compute_extension};
use service_record_engine::config::EngineConfig;
use service_record_engine::derivation::RecordDeriver;
use service_record_engine::models::{AttendanceEvent, UsageStatus};
use service_record_engine::store::MemoryStore;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Creates a deriver over a fresh seeded store.
fn create_deriver() -> RecordDeriver {
    let store = Arc::new(
        MemoryStore::from_seed_file("./config/default/seed.json").expect("Failed to load seed"),
    );
    RecordDeriver::new(store.clone(), store.clone(), store, EngineConfig::default())
}

/// Creates `count` distinct events, cycling users and statuses.
fn create_events(count: usize) -> Vec<AttendanceEvent> {
    let start = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    (0..count)
        .map(|i| AttendanceEvent {
            date: start + Duration::days((i / 10) as i64),
            user_id: format!("U{}", i % 10),
            user_name: format!("Child {}", i % 10),
            status: match i % 3 {
                0 => UsageStatus::AfterSchool,
                1 => UsageStatus::NonSchoolDay,
                _ => UsageStatus::Absence,
            },
            start_time: Some("13:00".to_string()),
            end_time: Some("17:45".to_string()),
            extension_minutes_override: None,
            absence_reason: None,
        })
        .collect()
}

/// Benchmark: pure classification functions.
fn bench_classification(c: &mut Criterion) {
    let hours = Decimal::new(25, 1);

    c.bench_function("classify_duration", |b| {
        b.iter(|| classify_duration(black_box(Some(hours))))
    });

    c.bench_function("compute_extension", |b| {
        b.iter(|| {
            compute_extension(
                black_box(UsageStatus::AfterSchool),
                black_box(Some("13:00")),
                black_box(Some("17:45")),
            )
        })
    });
}

/// Benchmark: one derivation into an empty store.
fn bench_single_derivation(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let event = create_events(1).remove(0);

    c.bench_function("single_derivation", |b| {
        b.to_async(&rt).iter(|| async {
            // Fresh store each time so the event is never skipped.
            let deriver = create_deriver();
            black_box(deriver.derive(&event).await.unwrap())
        })
    });
}

/// Benchmark: one POST /records through the router.
fn bench_single_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let body = serde_json::to_string(&create_events(1)[0]).unwrap();

    c.bench_function("single_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = create_router(AppState::new(create_deriver()));
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/records")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: batches of distinct events.
fn bench_batches(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("batch_derivation");
    // Reduce sample size for large batches to keep benchmark time reasonable
    group.sample_size(10);

    for count in [100usize, 1000].iter() {
        let events = create_events(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("events", count), count, |b, _| {
            b.to_async(&rt).iter(|| async {
                let deriver = create_deriver();
                black_box(deriver.derive_batch(&events).await)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_classification,
    bench_single_derivation,
    bench_single_request,
    bench_batches,
);
criterion_main!(benches);
