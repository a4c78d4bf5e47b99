/// Pool instruction handlers

pub mod initialize;
pub mod deposit;
pub mod withdraw;
pub mod swap;
pub mod set_locked;

pub use initialize::*;
pub use deposit::*;
pub use withdraw::*;
pub use swap::*;
pub use set_locked::*;

use crate::address::Address;
use crate::error::{PoolError, PoolResult};
use crate::state::{Pool, SwapDirection};

/// Instruction discriminator
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolInstructionTag {
    Initialize = 0,
    Deposit = 1,
    Withdraw = 2,
    Swap = 3,
    SetLocked = 4,
}

/// One request against the pool set
///
/// Wire format: discriminator byte followed by little-endian fixed-width
/// fields in declaration order. Addresses are 32 raw bytes, booleans and
/// swap directions one byte (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolInstruction {
    Initialize(InitializeParams),
    Deposit { seed: u64, shares: u64, max_a: u64, max_b: u64 },
    Withdraw { seed: u64, shares: u64, min_a: u64, min_b: u64 },
    Swap { seed: u64, direction: SwapDirection, amount_in: u64, min_out: u64 },
    SetLocked { seed: u64, locked: bool },
}

impl PoolInstruction {
    pub fn seed(&self) -> u64 {
        match *self {
            PoolInstruction::Initialize(params) => params.seed,
            PoolInstruction::Deposit { seed, .. }
            | PoolInstruction::Withdraw { seed, .. }
            | PoolInstruction::Swap { seed, .. }
            | PoolInstruction::SetLocked { seed, .. } => seed,
        }
    }

    pub fn tag(&self) -> PoolInstructionTag {
        match self {
            PoolInstruction::Initialize(_) => PoolInstructionTag::Initialize,
            PoolInstruction::Deposit { .. } => PoolInstructionTag::Deposit,
            PoolInstruction::Withdraw { .. } => PoolInstructionTag::Withdraw,
            PoolInstruction::Swap { .. } => PoolInstructionTag::Swap,
            PoolInstruction::SetLocked { .. } => PoolInstructionTag::SetLocked,
        }
    }

    pub fn unpack(data: &[u8]) -> PoolResult<Self> {
        let mut reader = InstructionReader::new(data);
        let instruction = match reader.read_u8()? {
            0 => PoolInstruction::Initialize(InitializeParams {
                seed: reader.read_u64()?,
                fee_bps: reader.read_u16()?,
                authority: reader.read_address()?,
                asset_a: reader.read_address()?,
                asset_b: reader.read_address()?,
            }),
            1 => PoolInstruction::Deposit {
                seed: reader.read_u64()?,
                shares: reader.read_u64()?,
                max_a: reader.read_u64()?,
                max_b: reader.read_u64()?,
            },
            2 => PoolInstruction::Withdraw {
                seed: reader.read_u64()?,
                shares: reader.read_u64()?,
                min_a: reader.read_u64()?,
                min_b: reader.read_u64()?,
            },
            3 => PoolInstruction::Swap {
                seed: reader.read_u64()?,
                direction: match reader.read_u8()? {
                    0 => SwapDirection::AToB,
                    1 => SwapDirection::BToA,
                    _ => return Err(PoolError::InvalidInstruction),
                },
                amount_in: reader.read_u64()?,
                min_out: reader.read_u64()?,
            },
            4 => PoolInstruction::SetLocked {
                seed: reader.read_u64()?,
                locked: reader.read_bool()?,
            },
            _ => return Err(PoolError::InvalidInstruction),
        };
        reader.finish()?;
        Ok(instruction)
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut out = vec![self.tag() as u8];
        match *self {
            PoolInstruction::Initialize(params) => {
                out.extend_from_slice(&params.seed.to_le_bytes());
                out.extend_from_slice(&params.fee_bps.to_le_bytes());
                out.extend_from_slice(params.authority.as_bytes());
                out.extend_from_slice(params.asset_a.as_bytes());
                out.extend_from_slice(params.asset_b.as_bytes());
            }
            PoolInstruction::Deposit { seed, shares, max_a: a, max_b: b }
            | PoolInstruction::Withdraw { seed, shares, min_a: a, min_b: b } => {
                for field in [seed, shares, a, b] {
                    out.extend_from_slice(&field.to_le_bytes());
                }
            }
            PoolInstruction::Swap { seed, direction, amount_in, min_out } => {
                out.extend_from_slice(&seed.to_le_bytes());
                out.push(match direction {
                    SwapDirection::AToB => 0,
                    SwapDirection::BToA => 1,
                });
                out.extend_from_slice(&amount_in.to_le_bytes());
                out.extend_from_slice(&min_out.to_le_bytes());
            }
            PoolInstruction::SetLocked { seed, locked } => {
                out.extend_from_slice(&seed.to_le_bytes());
                out.push(locked as u8);
            }
        }
        out
    }
}

/// Sequential little-endian reader over instruction data
struct InstructionReader<'a> {
    data: &'a [u8],
}

impl<'a> InstructionReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn take<const N: usize>(&mut self) -> PoolResult<[u8; N]> {
        if self.data.len() < N {
            return Err(PoolError::InvalidInstruction);
        }
        let (head, rest) = self.data.split_at(N);
        self.data = rest;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(head);
        Ok(bytes)
    }

    fn read_u8(&mut self) -> PoolResult<u8> {
        Ok(self.take::<1>()?[0])
    }

    fn read_bool(&mut self) -> PoolResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(PoolError::InvalidInstruction),
        }
    }

    fn read_u16(&mut self) -> PoolResult<u16> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    fn read_u64(&mut self) -> PoolResult<u64> {
        Ok(u64::from_le_bytes(self.take()?))
    }

    fn read_address(&mut self) -> PoolResult<Address> {
        Ok(Address::new(self.take()?))
    }

    /// Trailing bytes are rejected
    fn finish(self) -> PoolResult<()> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(PoolError::InvalidInstruction)
        }
    }
}

pub(crate) fn ensure_unlocked(pool: &Pool) -> PoolResult<()> {
    if pool.config.locked {
        return Err(PoolError::PoolLocked);
    }
    Ok(())
}
