//! End-to-end pool lifecycle against the registry
//! Run with: cargo test -p pool-core --test pool_scenario

use std::sync::Arc;

use pool_core::*;

const SEED: u64 = 1;
const FEE: u16 = 500;
const DECIMALS: u32 = 6;

fn base(n: u64) -> u64 {
    n * 10u64.pow(DECIMALS)
}

struct Fixture {
    registry: PoolRegistry,
    store: Arc<InMemoryAccountStore>,
    authority: Address,
    mint_x: Address,
    mint_y: Address,
    user: Address,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(InMemoryAccountStore::new());
        let registry = PoolRegistry::new(store.clone(), EngineConfig::default());

        let fixture = Self {
            registry,
            store,
            authority: Address::from_label("authority"),
            mint_x: Address::from_label("mint_x"),
            mint_y: Address::from_label("mint_y"),
            user: Address::from_label("user"),
        };
        fixture.store.fund(&fixture.user, &fixture.mint_x, base(1000)).unwrap();
        fixture.store.fund(&fixture.user, &fixture.mint_y, base(1000)).unwrap();
        fixture
    }

    fn params(&self) -> InitializeParams {
        InitializeParams {
            seed: SEED,
            fee_bps: FEE,
            authority: self.authority,
            asset_a: self.mint_x,
            asset_b: self.mint_y,
        }
    }

    fn initialized() -> Self {
        let fixture = Self::new();
        fixture.registry.initialize(fixture.params()).unwrap();
        fixture
    }

    fn deposited() -> Self {
        let fixture = Self::initialized();
        fixture
            .registry
            .deposit(SEED, &fixture.user, base(200), base(100), base(100))
            .unwrap();
        fixture
    }

    fn x(&self) -> u64 {
        self.store.balance(&self.user, &self.mint_x)
    }

    fn y(&self) -> u64 {
        self.store.balance(&self.user, &self.mint_y)
    }

    fn lp(&self) -> u64 {
        self.registry.share_balance(SEED, &self.user).unwrap()
    }
}

#[test]
fn test_initialize_works() {
    let f = Fixture::initialized();
    let snapshot = f.registry.snapshot(SEED).unwrap();
    let cfg = snapshot.config;

    assert_eq!(cfg.seed, SEED);
    assert_eq!(cfg.fee_bps, FEE);
    assert!(!cfg.locked);
    assert_eq!(cfg.asset_a, f.mint_x);
    assert_eq!(cfg.asset_b, f.mint_y);
    assert_eq!(cfg.authority, f.authority);
    assert!(cfg.verify_derivation(f.registry.deriver()));

    assert_eq!(snapshot.reserve_a, 0);
    assert_eq!(snapshot.reserve_b, 0);
    assert_eq!(snapshot.total_shares, 0);
}

#[test]
fn test_initialize_should_not_run_twice() {
    let f = Fixture::initialized();
    let before = f.registry.snapshot(SEED).unwrap();

    let result = f.registry.initialize(f.params());

    assert_eq!(result, Err(PoolError::AlreadyInitialized(SEED)));
    assert_eq!(f.registry.snapshot(SEED).unwrap(), before);
}

#[test]
fn test_deposit_mints_lp_and_moves_tokens() {
    let f = Fixture::deposited();
    let snapshot = f.registry.snapshot(SEED).unwrap();

    assert_eq!(snapshot.reserve_a, base(100));
    assert_eq!(snapshot.reserve_b, base(100));
    assert_eq!(snapshot.total_shares, base(200));
    assert_eq!(f.lp(), base(200));
    assert_eq!(f.x(), base(900));
    assert_eq!(f.y(), base(900));
}

#[test]
fn test_deposit_fails_if_max_is_too_small() {
    let f = Fixture::deposited();
    let before = f.registry.snapshot(SEED).unwrap();
    let (x, y) = (f.x(), f.y());

    let result = f.registry.deposit(SEED, &f.user, base(50), 1, 1);

    assert!(matches!(result, Err(PoolError::SlippageExceeded { .. })));
    assert_eq!(f.registry.snapshot(SEED).unwrap(), before);
    assert_eq!((f.x(), f.y()), (x, y));
}

#[test]
fn test_withdraw_burns_lp_and_returns_x_y() {
    let f = Fixture::deposited();
    let (x, y, lp) = (f.x(), f.y(), f.lp());

    let out = f.registry.withdraw(SEED, &f.user, base(100), 0, 0).unwrap();

    assert_eq!(out, PairAmounts { a: base(50), b: base(50) });
    assert_eq!(f.lp(), lp - base(100));
    assert_eq!(f.x(), x + base(50));
    assert_eq!(f.y(), y + base(50));

    let snapshot = f.registry.snapshot(SEED).unwrap();
    assert_eq!(snapshot.reserve_a, base(50));
    assert_eq!(snapshot.reserve_b, base(50));
}

#[test]
fn test_withdraw_fails_if_amount_exceeds_lp_balance() {
    let f = Fixture::deposited();
    let too_much = f.lp() + 1;

    assert_eq!(
        f.registry.withdraw(SEED, &f.user, too_much, 0, 0),
        Err(PoolError::InsufficientShares { have: base(200), need: too_much })
    );
}

#[test]
fn test_swap_x_to_y_works() {
    let f = Fixture::deposited();
    let (x, y) = (f.x(), f.y());

    f.registry.swap(SEED, &f.user, SwapDirection::AToB, base(10), 0).unwrap();

    assert!(f.x() < x);
    assert!(f.y() > y);
}

#[test]
fn test_swap_y_to_x_works() {
    let f = Fixture::deposited();
    let (x, y) = (f.x(), f.y());

    f.registry.swap(SEED, &f.user, SwapDirection::BToA, base(10), 0).unwrap();

    assert!(f.y() < y);
    assert!(f.x() > x);
}

#[test]
fn test_swap_fails_if_min_out_is_insane() {
    let f = Fixture::deposited();
    let before = f.registry.snapshot(SEED).unwrap();
    let (x, y) = (f.x(), f.y());

    let result = f.registry.swap(SEED, &f.user, SwapDirection::AToB, base(1), base(999_999));

    assert!(matches!(result, Err(PoolError::SlippageExceeded { .. })));
    assert_eq!(f.registry.snapshot(SEED).unwrap(), before);
    assert_eq!((f.x(), f.y()), (x, y));
}

#[test]
fn test_withdraw_after_swaps_reflects_fees() {
    let f = Fixture::deposited();

    // Round trip through the pool leaves fees behind
    let sold = f.registry.swap(SEED, &f.user, SwapDirection::AToB, base(10), 0).unwrap();
    f.registry
        .swap(SEED, &f.user, SwapDirection::BToA, sold.amount_out, 0)
        .unwrap();

    let snapshot = f.registry.snapshot(SEED).unwrap();
    assert!(snapshot.invariant() > (base(100) as u128) * (base(100) as u128));

    let out = f.registry.withdraw(SEED, &f.user, base(200), 0, 0).unwrap();
    assert_eq!(out, PairAmounts { a: snapshot.reserve_a, b: snapshot.reserve_b });

    // The only LP collects the fee: more of A than was deposited
    assert!(out.a > base(100));
}

#[test]
fn test_deposit_then_withdraw_never_profits() {
    let f = Fixture::deposited();
    f.registry.swap(SEED, &f.user, SwapDirection::AToB, base(7), 0).unwrap();

    let lp = f.lp();
    let (x, y) = (f.x(), f.y());
    let paid = f.registry.deposit(SEED, &f.user, 333_333, u64::MAX, u64::MAX).unwrap();
    let got = f.registry.withdraw(SEED, &f.user, 333_333, 0, 0).unwrap();

    assert!(got.a <= paid.a);
    assert!(got.b <= paid.b);
    assert_eq!(f.lp(), lp);
    assert!(f.x() <= x);
    assert!(f.y() <= y);
}

#[test]
fn test_locked_pool_rejects_operations() {
    let f = Fixture::deposited();

    assert_eq!(
        f.registry.set_locked(SEED, &f.user, true),
        Err(PoolError::Unauthorized)
    );
    f.registry.set_locked(SEED, &f.authority, true).unwrap();
    let before = f.registry.snapshot(SEED).unwrap();

    assert_eq!(
        f.registry.deposit(SEED, &f.user, base(1), base(10), base(10)),
        Err(PoolError::PoolLocked)
    );
    assert_eq!(
        f.registry.withdraw(SEED, &f.user, base(1), 0, 0),
        Err(PoolError::PoolLocked)
    );
    assert_eq!(
        f.registry.swap(SEED, &f.user, SwapDirection::AToB, base(1), 0),
        Err(PoolError::PoolLocked)
    );

    // Reads still work while locked
    assert_eq!(f.registry.snapshot(SEED).unwrap(), before);

    f.registry.set_locked(SEED, &f.authority, false).unwrap();
    assert!(f.registry.swap(SEED, &f.user, SwapDirection::AToB, base(1), 0).is_ok());
}

#[test]
fn test_pools_with_same_assets_are_independent() {
    let f = Fixture::deposited();
    let other = InitializeParams { seed: 2, fee_bps: 30, ..f.params() };
    let cfg = f.registry.initialize(other).unwrap();

    assert_ne!(cfg.address, f.registry.snapshot(SEED).unwrap().config.address);

    f.registry.deposit(2, &f.user, 10, 10, 10).unwrap();
    assert_eq!(f.registry.snapshot(SEED).unwrap().reserve_a, base(100));
    assert_eq!(f.registry.snapshot(2).unwrap().reserve_a, 10);
    assert_eq!(f.registry.seeds(), vec![1, 2]);
}
