use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mimalloc::MiMalloc;
use na_inspect::{Inspectable, ValueInspector, binary, json, tree};
use serde::{Deserialize, Serialize};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Default, Clone, Serialize, Deserialize)]
struct Player {
    name: String,
    level: i32,
    experience: i64,
    position: Vec<f64>,
    inventory: Vec<Item>,
    flags: BTreeMap<String, bool>,
}

#[derive(Default, Clone, Serialize, Deserialize)]
struct Item {
    id: String,
    count: i32,
    damage: f32,
}

impl Inspectable for Item {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object("bench.item", "");
        object.string(&mut self.id, "id", true, "");
        object.int32(&mut self.count, "count", true, "");
        object.float32(&mut self.damage, b'g', -1, "damage", false, "");
        object.end();
    }
}

impl Inspectable for Player {
    fn inspect(&mut self, inspector: ValueInspector<'_>) {
        let mut object = inspector.object("bench.player", "");
        object.string(&mut self.name, "name", true, "");
        object.int32(&mut self.level, "level", true, "");
        object.int64(&mut self.experience, "experience", true, "");
        object.inspect(&mut self.position, "position", true, "");
        object.inspect(&mut self.inventory, "inventory", true, "");
        object.inspect(&mut self.flags, "flags", false, "");
        object.end();
    }
}

fn player(items: usize) -> Player {
    Player {
        name: "Steve".to_owned(),
        level: 30,
        experience: 1_234_567,
        position: vec![128.5, 64.0, -32.25],
        inventory: (0..items)
            .map(|i| Item {
                id: format!("minecraft:item_{i}"),
                count: (i % 64) as i32,
                damage: i as f32 * 0.5,
            })
            .collect(),
        flags: [("op".to_owned(), true), ("flying".to_owned(), false)]
            .into_iter()
            .collect(),
    }
}

fn bench_binary(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary");
    for items in [10, 1_000] {
        let mut value = player(items);
        let bytes = binary::to_vec_be(&mut value).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", items), &items, |b, _| {
            b.iter(|| binary::to_vec_be(black_box(&mut value)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", items), &bytes, |b, bytes| {
            b.iter(|| binary::from_slice_be::<Player>(black_box(bytes)).unwrap())
        });
    }
    group.finish();
}

fn bench_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("json");
    for items in [10, 1_000] {
        let mut value = player(items);
        let text = json::to_string(&mut value).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", items), &items, |b, _| {
            b.iter(|| json::to_string(black_box(&mut value)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", items), &text, |b, text| {
            b.iter(|| json::from_str::<Player>(black_box(text)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("serde_json_decode", items), &text, |b, text| {
            b.iter(|| serde_json::from_str::<Player>(black_box(text)).unwrap())
        });
    }
    group.finish();
}

fn bench_tree(c: &mut Criterion) {
    let mut value = player(1_000);
    c.bench_function("tree/capture", |b| {
        b.iter(|| tree::to_node(black_box(&mut value)).unwrap())
    });
}

criterion_group!(benches, bench_binary, bench_json, bench_tree);
criterion_main!(benches);
