use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::EscrowError;

/// Persisted terms of one open offer. Field order is the wire layout.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Offer {
    pub id: u64,
    pub maker: Pubkey,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub token_a_offered_amount: u64,
    pub token_b_wanted_amount: u64,
    pub bump: u8,
}

impl Offer {
    /// 8 (id) + 32 (maker) + 32 (mint a) + 32 (mint b) + 8 (offered) + 8 (wanted) + 1 (bump)
    pub const LEN: usize = 8 + 32 + 32 + 32 + 8 + 8 + 1;

    pub fn validate(&self) -> Result<(), EscrowError> {
        if self.token_a_offered_amount == 0 || self.token_b_wanted_amount == 0 {
            return Err(EscrowError::InvalidArgument);
        }
        if self.token_mint_a == self.token_mint_b {
            return Err(EscrowError::InvalidArgument);
        }
        Ok(())
    }

    pub fn unpack(data: &[u8]) -> Result<Self, EscrowError> {
        if data.len() != Self::LEN {
            return Err(EscrowError::InvalidAccountData);
        }
        Self::try_from_slice(data).map_err(|_| EscrowError::InvalidAccountData)
    }

    pub fn pack_into(&self, data: &mut [u8]) -> Result<(), EscrowError> {
        if data.len() != Self::LEN {
            return Err(EscrowError::InvalidAccountData);
        }
        self.serialize(&mut &mut data[..])
            .map_err(|_| EscrowError::InvalidAccountData)
    }

    pub fn id_bytes(&self) -> [u8; 8] {
        self.id.to_le_bytes()
    }
}
