use solana_program::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address_with_program_id;

use crate::{config::EscrowConfig, error::EscrowError, OFFER_SEED};

/// Derives the offer record address and its canonical bump for `id`.
///
/// Running out of bumps is a configuration fault, not something to retry.
pub fn find_offer_address(config: &EscrowConfig, id: u64) -> Result<(Pubkey, u8), EscrowError> {
    Pubkey::try_find_program_address(&[OFFER_SEED, &id.to_le_bytes()], &config.program_id)
        .ok_or(EscrowError::DerivationFailed)
}

/// Recomputes the offer address from a stored `(id, bump)` pair.
pub fn create_offer_address(
    config: &EscrowConfig,
    id: u64,
    bump: u8,
) -> Result<Pubkey, EscrowError> {
    Pubkey::create_program_address(&[OFFER_SEED, &id.to_le_bytes(), &[bump]], &config.program_id)
        .map_err(|_| EscrowError::Unauthorized)
}

/// The vault is the associated token account of the offer PDA for mint A.
pub fn find_vault_address(config: &EscrowConfig, offer: &Pubkey, token_mint_a: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(offer, token_mint_a, &config.token_program_id)
}

pub fn find_holding_address(config: &EscrowConfig, wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(wallet, mint, &config.token_program_id)
}

/// Seeds the program signs with on behalf of the offer PDA.
pub fn offer_signer_seeds<'a>(id_bytes: &'a [u8; 8], bump: &'a [u8; 1]) -> [&'a [u8]; 3] {
    [OFFER_SEED, id_bytes, bump]
}
