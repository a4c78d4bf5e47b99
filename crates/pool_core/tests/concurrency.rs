//! Concurrent operations against shared pools
//!
//! Many traders hit the same pool from blocking tasks; the outcome must be
//! equivalent to some serial order: no value created or destroyed, share
//! supply equal to the sum of holdings, k never below its starting value.

use std::sync::Arc;

use pool_core::*;

const TRADERS: usize = 16;
const ROUNDS: usize = 25;
const FUNDING: u64 = 1_000_000_000;

fn assets() -> (Address, Address) {
    (Address::from_label("mint_x"), Address::from_label("mint_y"))
}

fn trader(i: usize) -> Address {
    Address::from_label(&format!("trader-{i}"))
}

fn setup(seeds: &[u64]) -> (Arc<PoolRegistry>, Arc<InMemoryAccountStore>) {
    let store = Arc::new(InMemoryAccountStore::new());
    let config = EngineConfig {
        lock_timeout_ms: 5_000,
        ..EngineConfig::default()
    };
    let registry = Arc::new(PoolRegistry::new(store.clone(), config));
    let (x, y) = assets();
    let lp = Address::from_label("lp");

    for i in 0..TRADERS {
        store.fund(&trader(i), &x, FUNDING).unwrap();
        store.fund(&trader(i), &y, FUNDING).unwrap();
    }
    store.fund(&lp, &x, FUNDING * seeds.len() as u64).unwrap();
    store.fund(&lp, &y, FUNDING * seeds.len() as u64).unwrap();

    for &seed in seeds {
        registry
            .initialize(InitializeParams {
                seed,
                fee_bps: 30,
                authority: lp,
                asset_a: x,
                asset_b: y,
            })
            .unwrap();
        registry
            .deposit(seed, &lp, 1_000_000, FUNDING / 2, FUNDING / 2)
            .unwrap();
    }

    (registry, store)
}

fn total_of(store: &InMemoryAccountStore, asset: &Address) -> u128 {
    store
        .entries()
        .iter()
        .filter(|e| &e.asset == asset)
        .map(|e| e.amount as u128)
        .sum()
}

fn reserves(registry: &PoolRegistry, asset_is_a: bool) -> u128 {
    registry
        .seeds()
        .into_iter()
        .map(|seed| {
            let s = registry.snapshot(seed).unwrap();
            (if asset_is_a { s.reserve_a } else { s.reserve_b }) as u128
        })
        .sum()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_swaps_conserve_value() {
    let (registry, store) = setup(&[1]);
    let (x, y) = assets();
    let total_x = total_of(&store, &x) + reserves(&registry, true);
    let total_y = total_of(&store, &y) + reserves(&registry, false);
    let k0 = registry.snapshot(1).unwrap().invariant();

    let mut handles = Vec::new();
    for i in 0..TRADERS {
        let registry = registry.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let me = trader(i);
            for round in 0..ROUNDS {
                let direction = if (i + round) % 2 == 0 {
                    SwapDirection::AToB
                } else {
                    SwapDirection::BToA
                };
                registry.swap(1, &me, direction, 10_000 + round as u64, 0).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(total_of(&store, &x) + reserves(&registry, true), total_x);
    assert_eq!(total_of(&store, &y) + reserves(&registry, false), total_y);
    assert!(registry.snapshot(1).unwrap().invariant() >= k0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deposits_and_withdrawals_balance_shares() {
    let (registry, _store) = setup(&[1]);

    let mut handles = Vec::new();
    for i in 0..TRADERS {
        let registry = registry.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let me = trader(i);
            for _ in 0..ROUNDS {
                registry.deposit(1, &me, 1_000, u64::MAX, u64::MAX).unwrap();
                registry.withdraw(1, &me, 400, 0, 0).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let pools = registry.export().unwrap();
    let pool = &pools[0];
    assert!(pool.shares.is_balanced());
    assert_eq!(
        pool.shares.total_supply,
        1_000_000 + (TRADERS * ROUNDS * 600) as u64
    );
    for i in 0..TRADERS {
        assert_eq!(registry.share_balance(1, &trader(i)).unwrap(), (ROUNDS * 600) as u64);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_pools_progress_independently() {
    let seeds = [1u64, 2, 3, 4];
    let (registry, store) = setup(&seeds);
    let (x, _) = assets();
    let total_x = total_of(&store, &x) + reserves(&registry, true);

    let mut handles = Vec::new();
    for i in 0..TRADERS {
        let registry = registry.clone();
        let seed = seeds[i % seeds.len()];
        handles.push(tokio::task::spawn_blocking(move || {
            let me = trader(i);
            for _ in 0..ROUNDS {
                registry.swap(seed, &me, SwapDirection::AToB, 5_000, 0).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(total_of(&store, &x) + reserves(&registry, true), total_x);
    for seed in seeds {
        let snapshot = registry.snapshot(seed).unwrap();
        // 4 traders per pool, ROUNDS swaps of 5_000 each
        assert_eq!(
            snapshot.reserve_a,
            FUNDING / 2 + (TRADERS / seeds.len() * ROUNDS * 5_000) as u64
        );
    }
}
