//! Identities and deterministic sub-account derivation
//!
//! Every participant (holders, assets, authorities, pool accounts) is a
//! 32-byte `Address`. Pool accounts are derived from seeds by an
//! `AddressDeriver`, so the same seed always yields the same addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Domain separator mixed into every derived address
const DERIVATION_MARKER: &[u8] = b"PoolDerivedAddress";

/// 32-byte identity, displayed as base58
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address(pub [u8; 32]);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid base58 address: {0}")]
    InvalidBase58(String),

    #[error("address must be 32 bytes, got {0}")]
    InvalidLength(usize),
}

impl Address {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Stable address for a human-readable label (e.g. "alice", "usdc")
    pub fn from_label(label: &str) -> Self {
        let digest = Sha256::digest(label.as_bytes());
        Self(digest.into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| AddressError::InvalidBase58(s.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| AddressError::InvalidLength(v.len()))?;
        Ok(Self(bytes))
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Deterministic derivation of pool sub-account addresses
///
/// `create_address` returns `None` when a (seeds, bump) combination is not
/// usable; `find_address` walks bumps from 255 down and returns the first
/// usable one, so the bump recorded at initialization always re-derives the
/// same address.
pub trait AddressDeriver: Send + Sync {
    fn create_address(&self, seeds: &[&[u8]], bump: u8) -> Option<Address>;

    fn find_address(&self, seeds: &[&[u8]]) -> Option<(Address, u8)> {
        (0..=u8::MAX)
            .rev()
            .find_map(|bump| self.create_address(seeds, bump).map(|addr| (addr, bump)))
    }
}

/// SHA-256 deriver scoped to one program identity
///
/// A candidate is usable when the high bit of its last byte is clear, which
/// rejects roughly half of all bumps like off-curve checks do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sha256Deriver {
    program_id: Address,
}

impl Sha256Deriver {
    pub fn new(program_id: Address) -> Self {
        Self { program_id }
    }
}

impl AddressDeriver for Sha256Deriver {
    fn create_address(&self, seeds: &[&[u8]], bump: u8) -> Option<Address> {
        let mut hasher = Sha256::new();
        for seed in seeds {
            hasher.update(seed);
        }
        hasher.update([bump]);
        hasher.update(self.program_id.as_bytes());
        hasher.update(DERIVATION_MARKER);
        let hash: [u8; 32] = hasher.finalize().into();

        if hash[31] & 0x80 != 0 {
            return None;
        }
        Some(Address(hash))
    }
}
