mod common;

use common::{bootstrap, CountingFactory};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use xds_pool::Pool;

fn pool_with(factory: Arc<CountingFactory>) -> Pool {
    Pool::builder()
        .config(Some(bootstrap("node-concurrency")))
        .factory(factory)
        .build()
}

#[test]
fn test_concurrent_first_acquire_builds_once() {
    let factory = Arc::new(CountingFactory::with_delay(Duration::from_millis(20)));
    let pool = pool_with(factory.clone());
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let pool = pool.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                pool.new_client("a").expect("acquire")
            })
        })
        .collect();
    let leases: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(factory.builds(), 1);
    assert_eq!(pool.ref_count("a"), Some(2));
    assert!(Arc::ptr_eq(&leases[0].0, &leases[1].0));

    for (_, release) in &leases {
        release.release();
    }
    assert_eq!(pool.ref_count("a"), None);
    assert_eq!(factory.closes(), 1);
}

#[test]
fn test_teardowns_match_released_names() {
    const NAMES: usize = 8;
    const ACQUIRES: usize = 16;

    let factory = Arc::new(CountingFactory::default());
    let pool = pool_with(factory.clone());
    let barrier = Arc::new(Barrier::new(NAMES * ACQUIRES));

    let handles: Vec<_> = (0..NAMES * ACQUIRES)
        .map(|i| {
            let pool = pool.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let name = format!("client-{}", i % NAMES);
                barrier.wait();
                let (_client, release) = pool.new_client(&name).expect("acquire");
                release
            })
        })
        .collect();
    let mut leases: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(factory.builds(), NAMES);
    for n in 0..NAMES {
        assert_eq!(pool.ref_count(&format!("client-{}", n)), Some(ACQUIRES));
    }

    // Keep one lease on every even-numbered client outstanding.
    let mut outstanding = Vec::new();
    for n in (0..NAMES).step_by(2) {
        let name = format!("client-{}", n);
        let pos = leases.iter().position(|r| r.name() == name).unwrap();
        outstanding.push(leases.swap_remove(pos));
    }

    // Release the rest from many threads, each handle several times.
    let leases = Arc::new(leases);
    let releasers: Vec<_> = (0..4)
        .map(|_| {
            let leases = leases.clone();
            thread::spawn(move || {
                for release in leases.iter() {
                    release.release();
                    release.release();
                }
            })
        })
        .collect();
    for r in releasers {
        r.join().unwrap();
    }

    assert_eq!(factory.closes(), NAMES / 2);
    assert_eq!(pool.len(), outstanding.len());
    for release in &outstanding {
        assert_eq!(pool.ref_count(release.name()), Some(1));
    }

    for release in &outstanding {
        release.release();
    }
    assert_eq!(factory.closes(), NAMES);
    assert!(pool.is_empty());
}

#[test]
fn test_racing_clones_release_once() {
    let factory = Arc::new(CountingFactory::default());
    let pool = pool_with(factory.clone());

    let (_keep_client, keep) = pool.new_client("shared").unwrap();
    let (_client, release) = pool.new_client("shared").unwrap();
    let barrier = Arc::new(Barrier::new(8));

    let racers: Vec<_> = (0..8)
        .map(|_| {
            let release = release.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                release.release();
            })
        })
        .collect();
    for r in racers {
        r.join().unwrap();
    }

    assert_eq!(pool.ref_count("shared"), Some(1));
    assert_eq!(factory.closes(), 0);

    keep.release();
    assert_eq!(factory.closes(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_async_tasks_share_clients() {
    let factory = Arc::new(CountingFactory::default());
    let pool = pool_with(factory.clone());

    let tasks = (0..32).map(|i| {
        let pool = pool.clone();
        tokio::spawn(async move {
            let name = if i % 2 == 0 { "even" } else { "odd" };
            let (client, release) = pool.new_client(name).expect("acquire");
            tokio::time::sleep(Duration::from_millis(5)).await;
            let id = client.node().id.clone();
            release.release();
            id
        })
    });

    let results = futures::future::join_all(tasks).await;
    for result in results {
        assert_eq!(result.unwrap(), "node-concurrency");
    }

    assert!(pool.is_empty());
    assert_eq!(factory.builds(), factory.closes());
}
