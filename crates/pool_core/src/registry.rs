//! Pool registry: every pool keyed by seed, each independently lockable
//!
//! The map lock is held only to find or insert an entry. Operations then
//! take the pool's own mutex, waiting at most `EngineConfig::lock_timeout`,
//! so pools never block each other and no caller waits forever.

use std::collections::HashMap;
use std::sync::Arc;

use amm_math::{PairAmounts, SwapQuote};
use log::{debug, error, warn};
use parking_lot::{Mutex, RwLock};

use crate::address::{Address, AddressDeriver};
use crate::config::EngineConfig;
use crate::error::{PoolError, PoolResult};
use crate::instructions::{
    process_deposit, process_initialize, process_set_locked, process_swap, process_withdraw,
    InitializeParams, PoolInstruction,
};
use crate::state::{Pool, PoolConfig, PoolSnapshot, SwapDirection};
use crate::store::AccountStore;

pub struct PoolRegistry {
    pools: RwLock<HashMap<u64, Arc<Mutex<Pool>>>>,
    store: Arc<dyn AccountStore>,
    deriver: Arc<dyn AddressDeriver>,
    config: EngineConfig,
}

impl PoolRegistry {
    /// Empty registry using the SHA-256 deriver from `config`
    pub fn new(store: Arc<dyn AccountStore>, config: EngineConfig) -> Self {
        let deriver = Arc::new(config.deriver());
        Self::with_deriver(store, deriver, config)
    }

    pub fn with_deriver(
        store: Arc<dyn AccountStore>,
        deriver: Arc<dyn AddressDeriver>,
        config: EngineConfig,
    ) -> Self {
        Self {
            pools: RwLock::new(HashMap::new()),
            store,
            deriver,
            config,
        }
    }

    /// Rebuild a registry from exported pools
    ///
    /// Fails with AlreadyInitialized on duplicate seeds and CorruptState for
    /// a pool that no handler could have produced under this registry's
    /// deriver (see `Pool::is_consistent`).
    pub fn restore(
        store: Arc<dyn AccountStore>,
        config: EngineConfig,
        pools: Vec<Pool>,
    ) -> PoolResult<Self> {
        let registry = Self::new(store, config);
        {
            let mut map = registry.pools.write();
            for pool in pools {
                let seed = pool.config.seed;
                if !pool.is_consistent(registry.deriver.as_ref()) {
                    error!("Restore rejected: pool {} is corrupt", seed);
                    return Err(PoolError::CorruptState(seed));
                }
                if map.insert(seed, Arc::new(Mutex::new(pool))).is_some() {
                    return Err(PoolError::AlreadyInitialized(seed));
                }
            }
        }
        Ok(registry)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn deriver(&self) -> &dyn AddressDeriver {
        self.deriver.as_ref()
    }

    /// Create a pool. A second call with the same seed fails and leaves the
    /// first pool untouched.
    pub fn initialize(&self, params: InitializeParams) -> PoolResult<PoolConfig> {
        let mut map = self.pools.write();
        if map.contains_key(&params.seed) {
            warn!("Initialize rejected: pool {} already exists", params.seed);
            return Err(PoolError::AlreadyInitialized(params.seed));
        }

        let pool = process_initialize(self.deriver.as_ref(), &params).inspect_err(|err| {
            warn!("Initialize of pool {} rejected: {}", params.seed, err);
        })?;
        let config = pool.config;
        map.insert(params.seed, Arc::new(Mutex::new(pool)));
        Ok(config)
    }

    pub fn deposit(
        &self,
        seed: u64,
        user: &Address,
        shares: u64,
        max_a: u64,
        max_b: u64,
    ) -> PoolResult<PairAmounts> {
        self.with_pool(seed, "deposit", |pool| {
            process_deposit(pool, self.store.as_ref(), user, shares, max_a, max_b)
        })
    }

    pub fn withdraw(
        &self,
        seed: u64,
        user: &Address,
        shares: u64,
        min_a: u64,
        min_b: u64,
    ) -> PoolResult<PairAmounts> {
        self.with_pool(seed, "withdraw", |pool| {
            process_withdraw(pool, self.store.as_ref(), user, shares, min_a, min_b)
        })
    }

    pub fn swap(
        &self,
        seed: u64,
        user: &Address,
        direction: SwapDirection,
        amount_in: u64,
        min_out: u64,
    ) -> PoolResult<SwapQuote> {
        self.with_pool(seed, "swap", |pool| {
            process_swap(pool, self.store.as_ref(), user, direction, amount_in, min_out)
        })
    }

    pub fn set_locked(&self, seed: u64, authority: &Address, locked: bool) -> PoolResult<()> {
        self.with_pool(seed, "set_locked", |pool| {
            process_set_locked(pool, authority, locked)
        })
    }

    /// Decode and execute one request on behalf of `caller`
    ///
    /// For Initialize the caller is the payer and has no further role.
    pub fn process(&self, caller: &Address, data: &[u8]) -> PoolResult<()> {
        let instruction = PoolInstruction::unpack(data)?;
        debug!(
            "Instruction: {:?} for pool {} from {}",
            instruction.tag(),
            instruction.seed(),
            caller
        );
        self.execute(caller, instruction)
    }

    pub fn execute(&self, caller: &Address, instruction: PoolInstruction) -> PoolResult<()> {
        match instruction {
            PoolInstruction::Initialize(params) => self.initialize(params).map(|_| ()),
            PoolInstruction::Deposit { seed, shares, max_a, max_b } => {
                self.deposit(seed, caller, shares, max_a, max_b).map(|_| ())
            }
            PoolInstruction::Withdraw { seed, shares, min_a, min_b } => {
                self.withdraw(seed, caller, shares, min_a, min_b).map(|_| ())
            }
            PoolInstruction::Swap { seed, direction, amount_in, min_out } => {
                self.swap(seed, caller, direction, amount_in, min_out).map(|_| ())
            }
            PoolInstruction::SetLocked { seed, locked } => self.set_locked(seed, caller, locked),
        }
    }

    /// Consistent view of one pool
    pub fn snapshot(&self, seed: u64) -> PoolResult<PoolSnapshot> {
        self.with_pool(seed, "snapshot", |pool| Ok(pool.snapshot()))
    }

    pub fn share_balance(&self, seed: u64, holder: &Address) -> PoolResult<u64> {
        self.with_pool(seed, "share_balance", |pool| Ok(pool.share_balance(holder)))
    }

    /// Seeds of all pools, ascending
    pub fn seeds(&self) -> Vec<u64> {
        let mut seeds: Vec<u64> = self.pools.read().keys().copied().collect();
        seeds.sort_unstable();
        seeds
    }

    /// Clone every pool, each under its own lock, ordered by seed
    pub fn export(&self) -> PoolResult<Vec<Pool>> {
        self.seeds()
            .into_iter()
            .map(|seed| self.with_pool(seed, "export", |pool| Ok(pool.clone())))
            .collect()
    }

    fn pool_entry(&self, seed: u64) -> PoolResult<Arc<Mutex<Pool>>> {
        self.pools
            .read()
            .get(&seed)
            .cloned()
            .ok_or(PoolError::PoolNotFound(seed))
    }

    fn with_pool<T>(
        &self,
        seed: u64,
        op: &str,
        f: impl FnOnce(&mut Pool) -> PoolResult<T>,
    ) -> PoolResult<T> {
        let entry = self.pool_entry(seed)?;
        let mut pool = entry
            .try_lock_for(self.config.lock_timeout())
            .ok_or_else(|| {
                warn!("{} on pool {}: lock wait timed out", op, seed);
                PoolError::PoolBusy
            })?;

        f(&mut pool).inspect_err(|err| {
            warn!("{} on pool {} rejected: {}", op, seed, err);
        })
    }
}
