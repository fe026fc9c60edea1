use criterion::Criterion;
use criterion::{criterion_group, criterion_main};

use moka::future::Cache;

use tokio::runtime;

use std::convert::Infallible;
use std::sync::{Mutex, OnceLock};

use light_load_cache::constants_for_benchmarking::{CONTENDED_CALLERS, GET_MANY, LOAD_MANY};

static CACHE: OnceLock<Mutex<Cache<usize, usize>>> = OnceLock::new();

async fn load_many() {
    let cache = CACHE.get().unwrap().lock().unwrap().clone();

    for i in 0..LOAD_MANY {
        let _ = cache.try_get_with(i, async move { Ok::<_, Infallible>(i) }).await;
    }
}

async fn load_and_lookup() {
    let cache = CACHE.get().unwrap().lock().unwrap().clone();

    for i in 0..GET_MANY {
        let _ = cache.try_get_with(i, async move { Ok::<_, Infallible>(i) }).await;
    }

    for i in 0..GET_MANY {
        cache.get(&i).await;
    }
}

async fn contended_get() {
    let cache = CACHE.get().unwrap().lock().unwrap().clone();

    let callers = (0..CONTENDED_CALLERS)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move {
                for i in 0..GET_MANY {
                    let _ = cache.try_get_with(i, async move { Ok::<_, Infallible>(i) }).await;
                }
            })
        })
        .collect::<Vec<_>>();

    for caller in callers {
        caller.await.unwrap();
    }
}

fn clear_cache(new_size: usize) {
    let mut cache_ref = CACHE.get().unwrap().lock().unwrap();

    let _ = std::mem::replace(&mut *cache_ref, Cache::new(new_size as u64));
}

fn bencher(c: &mut Criterion) {
    let rt = runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();

    CACHE.get_or_init(|| Mutex::new(Cache::new(LOAD_MANY as u64)));

    c.bench_function("moka rs load many", |b| b.to_async(&rt).iter(load_many));

    clear_cache(GET_MANY);

    c.bench_function("moka rs load and lookup", |b| b.to_async(&rt).iter(load_and_lookup));

    clear_cache(GET_MANY);

    c.bench_function("moka rs contended get", |b| b.to_async(&rt).iter(contended_get));
}

criterion_group!(benches, bencher);
criterion_main!(benches);
