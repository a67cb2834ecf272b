//! Integration Tests for the TTL Cache
//!
//! Exercises the public API on a multi-threaded runtime with real time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pokecache::{CacheConfig, CacheError, TtlCache};
use tokio::time::sleep;

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokecache=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn create_test_cache(interval: Duration) -> TtlCache {
    init_tracing();
    TtlCache::new(interval).unwrap()
}

// == Lookup and Insert ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_set_rejects_live_key() {
    let cache = create_test_cache(Duration::from_secs(60));

    assert!(cache.set("a", "1").await.is_ok());
    assert_eq!(
        cache.set("a", "2").await,
        Err(CacheError::AlreadyExists("a".to_string()))
    );
    assert_eq!(cache.get("a").await.as_deref(), Some(&b"1"[..]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_delete_allows_reinsert() {
    let cache = create_test_cache(Duration::from_secs(60));

    cache.set("b", "x").await.unwrap();
    cache.delete("b").await;
    assert_eq!(cache.get("b").await, None);

    assert!(cache.set("b", "y").await.is_ok());
    assert_eq!(cache.get("b").await.as_deref(), Some(&b"y"[..]));
}

#[tokio::test]
async fn test_from_config() {
    init_tracing();
    let config: CacheConfig = serde_json::from_str(r#"{"interval_ms": 50}"#).unwrap();

    let cache = TtlCache::from_config(&config).unwrap();
    assert_eq!(cache.interval(), Duration::from_millis(50));

    let zero = CacheConfig { interval_ms: 0 };
    assert!(matches!(
        TtlCache::from_config(&zero),
        Err(CacheError::InvalidConfig(_))
    ));
}

// == Expiration ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_entry_retained_then_reaped() {
    let interval = Duration::from_millis(200);
    let cache = create_test_cache(interval);

    cache.set("key", "value").await.unwrap();
    assert_eq!(cache.get("key").await.as_deref(), Some(&b"value"[..]));

    sleep(interval * 2 + Duration::from_millis(100)).await;
    assert_eq!(cache.get("key").await, None);
    assert!(cache.is_empty().await, "Reaper should have removed the entry");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stop_ends_reaper() {
    let cache = create_test_cache(Duration::from_millis(50));
    assert!(cache.is_reaper_running());

    cache.stop();
    sleep(Duration::from_millis(100)).await;
    assert!(!cache.is_reaper_running());
}

// == Concurrency ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_writers_then_readers() {
    let cache = Arc::new(create_test_cache(Duration::from_secs(60)));
    let n = 64;

    let writers: Vec<_> = (0..n)
        .map(|i| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .set(format!("key{}", i), format!("value{}", i))
                    .await
            })
        })
        .collect();
    for writer in writers {
        assert!(writer.await.unwrap().is_ok());
    }

    let readers: Vec<_> = (0..n)
        .map(|i| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { (i, cache.get(&format!("key{}", i)).await) })
        })
        .collect();
    for reader in readers {
        let (i, value) = reader.await.unwrap();
        assert_eq!(value, Some(format!("value{}", i).into_bytes()));
    }

    assert_eq!(cache.len().await, n);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_sets_single_winner() {
    let cache = Arc::new(create_test_cache(Duration::from_secs(60)));

    let racers: Vec<_> = (0..32)
        .map(|i| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.set("shared", format!("racer{}", i)).await })
        })
        .collect();

    let mut winners = 0;
    for racer in racers {
        match racer.await.unwrap() {
            Ok(()) => winners += 1,
            Err(err) => assert!(matches!(err, CacheError::AlreadyExists(_))),
        }
    }

    assert_eq!(winners, 1, "Exactly one insert should succeed");
    assert_eq!(cache.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_read_through_fetches_once_per_key() {
    let cache = create_test_cache(Duration::from_secs(60));
    let fetches = AtomicUsize::new(0);
    let counter = &fetches;
    let url = "https://pokeapi.co/api/v2/location-area/";

    for _ in 0..3 {
        let body = cache
            .get_or_fetch(url, || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>(br#"{"count":1}"#.to_vec())
            })
            .await
            .unwrap();
        assert_eq!(body, br#"{"count":1}"#);
    }

    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}
