use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use stockroom_inventory::{InventorySession, SortField};

fn populated(n: usize) -> InventorySession {
    let mut session = InventorySession::default();
    let categories = ["Fruits", "Electronics", "Furniture", "Clothing"];
    for i in 0..n {
        let quantity = (i % 97).to_string();
        let price = format!("{}.{:02}", i % 500, i % 100);
        if let Err(err) = session.add(&format!("item-{i}"), &quantity, &price, categories[i % 4]) {
            panic!("seed failed: {err}");
        }
    }
    session
}

fn bench_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_pipeline");

    for n in [100usize, 1_000, 10_000] {
        let mut session = populated(n);
        session.set_search("item-1");
        session.set_category_filter("Fruits");
        session.toggle_sort(SortField::Price);

        group.bench_with_input(BenchmarkId::new("sorted_filtered_page", n), &session, |b, s| {
            b.iter(|| black_box(s.view()))
        });

        group.bench_with_input(BenchmarkId::new("summary", n), &session, |b, s| {
            b.iter(|| black_box(s.summary()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_view);
criterion_main!(benches);
