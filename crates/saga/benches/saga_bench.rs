use common::Sku;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{LineItem, Money};
use saga::{InMemoryNotificationBus, InMemoryOrderStore, OrderSaga};
use stock::{InMemoryStockLedger, StockLedger};
use timeline::InMemoryTimelineStore;

fn bench_create_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("saga/create_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                let stock = InMemoryStockLedger::with_quantities([(Sku::new("SKU-BENCH"), 100)]);
                let saga = OrderSaga::new(
                    stock,
                    InMemoryOrderStore::new(),
                    InMemoryTimelineStore::new(),
                    InMemoryNotificationBus::new(),
                );

                saga.create_order(
                    "bench@example.com",
                    vec![LineItem::new(
                        "SKU-BENCH",
                        "Benchmark Widget",
                        1,
                        Money::from_cents(1000),
                    )],
                )
                .await
                .unwrap();
            });
        });
    });
}

fn bench_create_and_cancel(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("saga/create_and_cancel", |b| {
        b.iter(|| {
            rt.block_on(async {
                let stock = InMemoryStockLedger::with_quantities([(Sku::new("SKU-BENCH"), 100)]);
                let saga = OrderSaga::new(
                    stock.clone(),
                    InMemoryOrderStore::new(),
                    InMemoryTimelineStore::new(),
                    InMemoryNotificationBus::new(),
                );

                let order = saga
                    .create_order(
                        "bench@example.com",
                        vec![LineItem::new(
                            "SKU-BENCH",
                            "Benchmark Widget",
                            2,
                            Money::from_cents(1000),
                        )],
                    )
                    .await
                    .unwrap();
                saga.cancel_order(order.order_id()).await.unwrap();

                assert_eq!(
                    stock.available(&Sku::new("SKU-BENCH")).await.unwrap(),
                    Some(100)
                );
            });
        });
    });
}

criterion_group!(benches, bench_create_order, bench_create_and_cancel);
criterion_main!(benches);
