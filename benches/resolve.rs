//! Benchmarks for member resolution.
//!
//! Measures resolution over a generated module of 200 types with 10 methods and 2 events each:
//! - Cold resolution on a freshly parsed image
//! - Warm resolution of already cached members
//! - Range ownership lookups (method to declaring type)
//! - Parallel resolution of whole tables
//! - Writing the module back out

extern crate cilgraph;

use cilgraph::prelude::*;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::{hint::black_box, sync::Arc};

const TYPES: u32 = 200;
const METHODS: u32 = 10;
const EVENTS: u32 = 2;

fn generate() -> Arc<MetadataImage> {
    let handler = TypeRef::new(None, "System", "EventHandler").unwrap();

    let mut writer = MetadataWriter::new();
    writer.add_type_ref(&handler);

    for index in 0..TYPES {
        let ty = TypeDef::new("Bench", &format!("Type{index}"), TypeAttributes::PUBLIC).unwrap();
        for method in 0..METHODS {
            let method = MethodDef::new(
                &format!("Method{method}"),
                MethodAttributes::PUBLIC,
                vec![0x20, 0x00, 0x01],
            )
            .unwrap();
            ty.methods().push(method).unwrap();
        }
        writer.add_type_def(&ty);

        let map = EventMap::new(&ty);
        let methods = ty.methods().items();
        for event in 0..EVENTS {
            let event = Event::new(
                &format!("Event{event}"),
                handler.clone().into(),
                EventAttributes::empty(),
            )
            .unwrap();
            event
                .semantics()
                .push(MethodSemantics::new(
                    MethodSemanticsAttributes::ADD_ON,
                    methods[0].clone(),
                ))
                .unwrap();
            map.events().push(event).unwrap();
        }
        writer.add_event_map(&map);
    }

    writer.finish().unwrap()
}

/// Bytes of the generated module: tables stream, strings heap, blob heap
fn generate_bytes() -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let image = generate();
    (
        image.to_bytes().unwrap(),
        image.strings().data().to_vec(),
        image.blobs().data().to_vec(),
    )
}

/// Benchmark the full name of one event on a freshly parsed image, which resolves the event,
/// its map and the declaring type.
fn bench_cold_event_full_name(c: &mut Criterion) {
    let (tables, strings, blobs) = generate_bytes();
    let token = Token::from_parts(TableId::Event, TYPES * EVENTS / 2);

    c.bench_function("resolve_cold_event_full_name", |b| {
        b.iter_batched(
            || MetadataImage::from_bytes(&tables, &strings, &blobs).unwrap(),
            |image| {
                let member = image.resolve_member(black_box(token)).unwrap();
                black_box(member.full_name())
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark resolving a token that is already cached.
fn bench_warm_resolve(c: &mut Criterion) {
    let image = generate();
    let token = Token::from_parts(TableId::MethodDef, TYPES * METHODS / 2);
    let _ = image.resolve_member(token).unwrap();

    c.bench_function("resolve_warm_method", |b| {
        b.iter(|| black_box(image.resolve_member(black_box(token)).unwrap()));
    });
}

/// Benchmark the closest key search that finds the owner of a method range.
fn bench_range_owner_lookup(c: &mut Criterion) {
    let image = generate();
    let tables = image.tables();

    c.bench_function("range_owner_lookup", |b| {
        b.iter(|| {
            let row = tables
                .get_row_closest_to_key(TableId::TypeDef, 5, black_box(TYPES * METHODS - 3))
                .unwrap();
            black_box(row.rid)
        });
    });
}

/// Benchmark resolving every method of the module, in parallel.
fn bench_resolve_all_methods(c: &mut Criterion) {
    let (tables, strings, blobs) = generate_bytes();

    c.bench_function("resolve_all_methods", |b| {
        b.iter_batched(
            || MetadataImage::from_bytes(&tables, &strings, &blobs).unwrap(),
            |image| black_box(image.members(TableId::MethodDef).len()),
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark encoding an already loaded module back into a new image.
fn bench_write_back(c: &mut Criterion) {
    let image = generate();
    let types = image.members_of::<TypeDef>();
    let maps = image.members_of::<EventMap>();
    let type_refs = image.members_of::<TypeRef>();

    c.bench_function("write_back", |b| {
        b.iter(|| {
            let mut writer = MetadataWriter::new();
            for ty in &type_refs {
                writer.add_type_ref(ty);
            }
            for ty in &types {
                writer.add_type_def(ty);
            }
            for map in &maps {
                writer.add_event_map(map);
            }
            black_box(writer.finish().unwrap())
        });
    });
}

criterion_group!(
    benches,
    bench_cold_event_full_name,
    bench_warm_resolve,
    bench_range_owner_lookup,
    bench_resolve_all_methods,
    bench_write_back
);
criterion_main!(benches);
