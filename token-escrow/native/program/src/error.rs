use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;
use solana_program::program_error::ProgramError;
use thiserror::Error;

/// Escrow failure reasons, surfaced as `ProgramError::Custom(code)`.
///
/// Codes start at 6000 so they never collide with token program errors.
#[derive(Clone, Copy, Debug, Error, FromPrimitive, PartialEq, Eq)]
#[repr(u32)]
pub enum EscrowError {
    #[error("Malformed amount or token mint")]
    InvalidArgument = 6000,
    #[error("Offer already exists at the derived address")]
    AlreadyExists,
    #[error("No open offer at the given address")]
    NotFound,
    #[error("Caller is not authorized or address failed re-derivation")]
    Unauthorized,
    #[error("Insufficient token balance or lamports")]
    InsufficientFunds,
    #[error("Invalid instruction")]
    InvalidInstruction,
    #[error("Offer or vault account data is invalid")]
    InvalidAccountData,
    #[error("Unable to find a viable program address bump")]
    DerivationFailed,
    #[error("Overflow occurred")]
    Overflow,
}

impl EscrowError {
    /// Recovers the escrow reason from a custom program error, if it is one.
    pub fn from_program_error(error: &ProgramError) -> Option<Self> {
        match error {
            ProgramError::Custom(code) => Self::from_u32(*code),
            _ => None,
        }
    }
}

impl From<EscrowError> for ProgramError {
    fn from(e: EscrowError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
