//! Offer escrow: a maker locks token A in a program-owned vault and names
//! the amount of token B they want back. A taker swaps atomically, or the
//! maker refunds and takes the vaulted tokens back.

pub mod config;
pub mod error;
pub mod instruction;
pub mod instructions;
pub mod pda;
pub mod processor;
pub mod state;

pub use config::EscrowConfig;
pub use error::EscrowError;
pub use state::Offer;

#[cfg(not(feature = "no-entrypoint"))]
use solana_program::entrypoint;

#[cfg(not(feature = "no-entrypoint"))]
use processor::process_instruction;

#[cfg(not(feature = "no-entrypoint"))]
entrypoint!(process_instruction);

solana_program::declare_id!("6qDkztsEJ4r73Sqk1pDdL1degbzjyccqAX2uPDCsJJWf");

/// Seed prefix for offer record addresses.
pub const OFFER_SEED: &[u8] = b"offer";
