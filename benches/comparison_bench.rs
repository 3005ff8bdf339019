//! Comparison benchmarks between tagwire and other serialization libraries
//!
//! Run with: cargo bench --bench comparison_bench

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use tagwire::messages::namespace_listing::{self, NamespaceListing};
use tagwire::{Codec, CodecConfig, FieldType, Record, StructSchema, Value};

// Test data structure
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
struct Listing {
    name: String,
    is_namespace: bool,
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
struct Directory {
    id: i64,
    path: String,
    size: Option<i64>,
    children: Vec<Listing>,
}

impl Directory {
    fn new(children: usize) -> Self {
        Self {
            id: 1_700_000_000_000,
            path: "/warehouse/logs".to_string(),
            size: (children > 0).then_some(children as i64 * 4096),
            children: (0..children)
                .map(|i| Listing {
                    name: format!("child-{i}"),
                    is_namespace: i % 2 == 0,
                })
                .collect(),
        }
    }
}

struct Tagwire {
    codec: Codec,
    schema: StructSchema,
}

impl Tagwire {
    fn new(config: CodecConfig) -> Self {
        let listing = Arc::new(namespace_listing::schema().unwrap());
        let schema = StructSchema::builder("Directory")
            .required(1, "id", FieldType::I64)
            .required(2, "path", FieldType::String)
            .optional(3, "size", FieldType::I64)
            .required(4, "children", FieldType::list(FieldType::structure(listing)))
            .build()
            .unwrap();
        Self {
            codec: Codec::new(config),
            schema,
        }
    }

    fn encode(&self, dir: &Directory) -> Vec<u8> {
        let children = dir
            .children
            .iter()
            .map(|c| Value::Struct(NamespaceListing::new(c.name.as_str(), c.is_namespace).to_record()))
            .collect();
        let mut record = Record::new()
            .with(1, dir.id)
            .with(2, dir.path.as_str())
            .with(4, Value::List(children));
        if let Some(size) = dir.size {
            record.set(3, size);
        }
        self.codec.encode(&record, &self.schema).unwrap()
    }

    fn decode(&self, bytes: &[u8]) -> Directory {
        let record = self.codec.decode(bytes, &self.schema).unwrap();
        Directory {
            id: record.get(1).and_then(Value::as_i64).unwrap(),
            path: record.get(2).and_then(Value::as_str).unwrap().to_string(),
            size: record.get(3).and_then(Value::as_i64),
            children: record
                .get(4)
                .and_then(Value::as_elements)
                .unwrap()
                .iter()
                .map(|v| {
                    let l = NamespaceListing::from_record(v.as_struct().unwrap()).unwrap();
                    Listing {
                        name: l.name,
                        is_namespace: l.is_namespace,
                    }
                })
                .collect(),
        }
    }
}

fn test_cases() -> [(&'static str, Directory); 3] {
    [
        ("empty", Directory::new(0)),
        ("small", Directory::new(4)),
        ("large", Directory::new(64)),
    ]
}

fn bench_encoding_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding_comparison");
    let binary = Tagwire::new(CodecConfig::binary());
    let compact = Tagwire::new(CodecConfig::compact());

    for (name, dir) in &test_cases() {
        group.bench_with_input(BenchmarkId::new("tagwire_binary", name), dir, |b, dir| {
            b.iter(|| black_box(binary.encode(black_box(dir))));
        });

        group.bench_with_input(BenchmarkId::new("tagwire_compact", name), dir, |b, dir| {
            b.iter(|| black_box(compact.encode(black_box(dir))));
        });

        group.bench_with_input(BenchmarkId::new("bincode", name), dir, |b, dir| {
            b.iter(|| black_box(bincode::serialize(black_box(dir)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("messagepack", name), dir, |b, dir| {
            b.iter(|| black_box(rmp_serde::to_vec(black_box(dir)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("postcard", name), dir, |b, dir| {
            b.iter(|| black_box(postcard::to_allocvec(black_box(dir)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("borsh", name), dir, |b, dir| {
            b.iter(|| black_box(borsh::to_vec(black_box(dir)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("json", name), dir, |b, dir| {
            b.iter(|| black_box(serde_json::to_vec(black_box(dir)).unwrap()));
        });
    }

    group.finish();
}

fn bench_decoding_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("decoding_comparison");
    let binary = Tagwire::new(CodecConfig::binary());
    let compact = Tagwire::new(CodecConfig::compact());

    for (name, dir) in &test_cases() {
        let binary_data = binary.encode(dir);
        let compact_data = compact.encode(dir);
        let bincode_data = bincode::serialize(dir).unwrap();
        let messagepack_data = rmp_serde::to_vec(dir).unwrap();
        let postcard_data = postcard::to_allocvec(dir).unwrap();
        let borsh_data = borsh::to_vec(dir).unwrap();
        let json_data = serde_json::to_vec(dir).unwrap();

        group.bench_with_input(
            BenchmarkId::new("tagwire_binary", name),
            &binary_data,
            |b, data| b.iter(|| black_box(binary.decode(black_box(data)))),
        );

        group.bench_with_input(
            BenchmarkId::new("tagwire_compact", name),
            &compact_data,
            |b, data| b.iter(|| black_box(compact.decode(black_box(data)))),
        );

        group.bench_with_input(BenchmarkId::new("bincode", name), &bincode_data, |b, data| {
            b.iter(|| {
                let decoded: Directory = bincode::deserialize(black_box(data)).unwrap();
                black_box(decoded);
            });
        });

        group.bench_with_input(
            BenchmarkId::new("messagepack", name),
            &messagepack_data,
            |b, data| {
                b.iter(|| {
                    let decoded: Directory = rmp_serde::from_slice(black_box(data)).unwrap();
                    black_box(decoded);
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("postcard", name), &postcard_data, |b, data| {
            b.iter(|| {
                let decoded: Directory = postcard::from_bytes(black_box(data)).unwrap();
                black_box(decoded);
            });
        });

        group.bench_with_input(BenchmarkId::new("borsh", name), &borsh_data, |b, data| {
            b.iter(|| {
                let decoded =
                    <Directory as borsh::BorshDeserialize>::try_from_slice(black_box(data)).unwrap();
                black_box(decoded);
            });
        });

        group.bench_with_input(BenchmarkId::new("json", name), &json_data, |b, data| {
            b.iter(|| {
                let decoded: Directory = serde_json::from_slice(black_box(data)).unwrap();
                black_box(decoded);
            });
        });
    }

    group.finish();
}

fn bench_size_comparison(c: &mut Criterion) {
    let binary = Tagwire::new(CodecConfig::binary());
    let compact = Tagwire::new(CodecConfig::compact());

    println!("\n=== SERIALIZED SIZE COMPARISON ===");

    for (name, dir) in &test_cases() {
        assert_eq!(&binary.decode(&binary.encode(dir)), dir);

        println!("\n{} directory:", name);
        println!("  Tagwire binary:  {} bytes", binary.encode(dir).len());
        println!("  Tagwire compact: {} bytes", compact.encode(dir).len());
        println!("  Bincode:         {} bytes", bincode::serialize(dir).unwrap().len());
        println!("  MessagePack:     {} bytes", rmp_serde::to_vec(dir).unwrap().len());
        println!("  Postcard:        {} bytes", postcard::to_allocvec(dir).unwrap().len());
        println!("  Borsh:           {} bytes", borsh::to_vec(dir).unwrap().len());
        println!("  JSON:            {} bytes", serde_json::to_vec(dir).unwrap().len());
    }

    // Dummy benchmark just to include in the suite
    c.bench_function("size_comparison_dummy", |b| {
        b.iter(|| {
            black_box(42);
        });
    });
}

criterion_group!(
    benches,
    bench_encoding_comparison,
    bench_decoding_comparison,
    bench_size_comparison
);
criterion_main!(benches);
