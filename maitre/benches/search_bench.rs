use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use maitre::allocation::graph::JoinGraph;
use maitre::allocation::search::find_group;
use maitre::{Table, TableAllocator, TableId, TableJoin};

/// A dining room of `n` joinable tables seating 2, 4 or 6, joined in a row.
fn dining_room(n: i64) -> (Vec<Table>, Vec<TableJoin>) {
    let capacities = [2, 4, 6];
    let tables: Vec<Table> = (1..=n)
        .map(|id| {
            let capacity = capacities[usize::try_from(id).unwrap() % capacities.len()];
            Table::new(id, 1, u32::try_from(id).unwrap(), capacity)
                .unwrap()
                .joinable(true)
        })
        .collect();
    let joins = tables
        .windows(2)
        .map(|pair| {
            TableJoin::new(pair[0].id(), pair[1].id(), pair[0].capacity() + pair[1].capacity())
                .unwrap()
        })
        .collect();
    (tables, joins)
}

fn bench_find_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_group");

    for n in [8, 16, 32] {
        let (tables, joins) = dining_room(n);
        let ids: Vec<TableId> = tables.iter().map(Table::id).collect();
        let strict = JoinGraph::from_joins(&joins);
        let permissive = JoinGraph::complete(&ids);

        // Party large enough to need quads
        group.bench_with_input(BenchmarkId::new("strict", n), &n, |b, _| {
            b.iter(|| find_group(black_box(&tables), &strict, black_box(20), 4));
        });
        group.bench_with_input(BenchmarkId::new("permissive", n), &n, |b, _| {
            b.iter(|| find_group(black_box(&tables), &permissive, black_box(20), 4));
        });
    }

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    let allocator = TableAllocator::default();
    let (tables, joins) = dining_room(24);

    for party in [4, 10, 22] {
        group.bench_with_input(BenchmarkId::from_parameter(party), &party, |b, &party| {
            b.iter(|| allocator.select(black_box(&tables), black_box(&joins), party));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_find_group, bench_select);
criterion_main!(benches);
