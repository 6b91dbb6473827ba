//! This bench test validates a generated database of requirements spread over
//! nested folders.

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use reqdb::{Database, DirectoryPolicy, RecordKind};
use tempfile::TempDir;

fn preseed_database() -> (TempDir, Database) {
    let tmp_dir = TempDir::new().unwrap();
    let policy = DirectoryPolicy::new(tmp_dir.path(), true, true).unwrap();
    let database = Database::new(policy, RecordKind::Requirement);
    database.generate_fixture_set(500, 10).unwrap();
    (tmp_dir, database)
}

fn validate_database(c: &mut Criterion) {
    let (_tmp_dir, database) = preseed_database();

    c.bench_function("validate database", |b| {
        b.iter(|| {
            let report = database.validate().unwrap();
            assert!(report.is_all_files_valid());
        });
    });
}

fn export_database(c: &mut Criterion) {
    let (_tmp_dir, database) = preseed_database();

    c.bench_function("export database", |b| {
        b.iter_batched(
            || TempDir::new().unwrap(),
            |target| {
                database.export_as_documents(target.path()).unwrap();
                target
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, validate_database, export_database);
criterion_main!(benches);
