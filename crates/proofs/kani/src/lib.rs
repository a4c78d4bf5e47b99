//! Kani harnesses for the pool math
//!
//! Run with: cargo kani -p proofs-kani

#[cfg(kani)]
mod pool_math;
