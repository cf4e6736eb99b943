use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use shopdeck_infra::{
    CatalogService, InMemoryImageStore, InMemoryProductRepository, ListOrder,
};
use shopdeck_products::{ImageUpload, ProductForm};
use std::sync::Arc;
use tokio::runtime::Runtime;

fn mouse_form(images: usize) -> ProductForm {
    let mut form = ProductForm::default();
    form.set_field("name", "Mouse".to_string());
    form.set_field("description", "Wireless, two buttons".to_string());
    form.set_field("price", "19.99".to_string());
    form.set_field("stock", "10".to_string());
    form.set_field("category", "Electronics".to_string());
    for i in 0..images {
        form.push_image(ImageUpload::new(format!("{i}.png"), "image/png", vec![0u8; 1024]))
            .unwrap();
    }
    form
}

fn service() -> CatalogService {
    CatalogService::new(
        Arc::new(InMemoryProductRepository::new()),
        Arc::new(InMemoryImageStore::new()),
        ListOrder::NewestFirst,
    )
}

/// Parsing and validation alone (no storage).
fn bench_form_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("form_validation");
    group.sample_size(1000);

    group.bench_function("into_create_three_images", |b| {
        let form = mouse_form(3);
        b.iter(|| black_box(form.clone().into_create().unwrap()));
    });

    group.bench_function("into_update_stock_only", |b| {
        let mut form = ProductForm::default();
        form.set_field("stock", "0".to_string());
        b.iter(|| black_box(form.clone().into_update().unwrap()));
    });

    group.finish();
}

/// Full create pipeline against in-memory backends.
fn bench_catalog_create(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("catalog_create");

    for images in [1usize, 3] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(images), &images, |b, &images| {
            let catalog = service();
            b.iter(|| {
                rt.block_on(async { black_box(catalog.create(mouse_form(images)).await.unwrap()) })
            });
        });
    }

    group.finish();
}

/// Listing cost as the catalog grows (sort included).
fn bench_catalog_list(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("catalog_list");

    for size in [10usize, 100, 1000] {
        let catalog = service();
        rt.block_on(async {
            for _ in 0..size {
                catalog.create(mouse_form(1)).await.unwrap();
            }
        });

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| rt.block_on(async { black_box(catalog.list().await.unwrap()) }));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_form_validation,
    bench_catalog_create,
    bench_catalog_list
);
criterion_main!(benches);
