use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::{config::EscrowConfig, error::EscrowError, pda, state::Offer};

/// Instruction data as it travels on the wire. The Borsh variant tag is the
/// discriminator: 0 make, 1 take, 2 refund.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum EscrowInstruction {
    /// Accounts:
    /// 0. `[signer, writable]` maker
    /// 1. `[]` token mint A
    /// 2. `[]` token mint B
    /// 3. `[writable]` maker's token A holding
    /// 4. `[writable]` offer record PDA
    /// 5. `[writable]` vault (associated token account of the offer for mint A)
    /// 6. `[]` token program
    /// 7. `[]` associated token program
    /// 8. `[]` system program
    MakeOffer {
        id: u64,
        token_a_offered_amount: u64,
        token_b_wanted_amount: u64,
    },
    /// Accounts:
    /// 0. `[signer, writable]` taker
    /// 1. `[writable]` maker
    /// 2. `[]` token mint A
    /// 3. `[]` token mint B
    /// 4. `[writable]` taker's token A holding, created if absent
    /// 5. `[writable]` taker's token B holding
    /// 6. `[writable]` maker's token B holding, created if absent
    /// 7. `[writable]` offer record PDA
    /// 8. `[writable]` vault
    /// 9. `[]` token program
    /// 10. `[]` associated token program
    /// 11. `[]` system program
    TakeOffer,
    /// Accounts:
    /// 0. `[signer, writable]` maker
    /// 1. `[]` token mint A
    /// 2. `[writable]` maker's token A holding, created if absent
    /// 3. `[writable]` offer record PDA
    /// 4. `[writable]` vault
    /// 5. `[]` token program
    /// 6. `[]` associated token program
    /// 7. `[]` system program
    RefundOffer,
}

impl EscrowInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, EscrowError> {
        Self::try_from_slice(input).map_err(|_| EscrowError::InvalidInstruction)
    }

    pub fn pack(&self) -> Result<Vec<u8>, EscrowError> {
        borsh::to_vec(self).map_err(|_| EscrowError::InvalidInstruction)
    }
}

fn program_accounts(config: &EscrowConfig) -> [AccountMeta; 3] {
    [
        AccountMeta::new_readonly(config.token_program_id, false),
        AccountMeta::new_readonly(config.associated_token_program_id, false),
        AccountMeta::new_readonly(solana_system_interface::program::ID, false),
    ]
}

/// Request to open an offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MakeOffer {
    pub maker: Pubkey,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub token_a_offered_amount: u64,
    pub token_b_wanted_amount: u64,
    pub id: u64,
}

impl MakeOffer {
    /// The record this request opens, stamped with `bump`.
    pub fn offer(&self, bump: u8) -> Offer {
        Offer {
            id: self.id,
            maker: self.maker,
            token_mint_a: self.token_mint_a,
            token_mint_b: self.token_mint_b,
            token_a_offered_amount: self.token_a_offered_amount,
            token_b_wanted_amount: self.token_b_wanted_amount,
            bump,
        }
    }

    pub fn instruction(&self, config: &EscrowConfig) -> Result<Instruction, EscrowError> {
        self.offer(0).validate()?;
        let (offer, _) = pda::find_offer_address(config, self.id)?;
        let data = EscrowInstruction::MakeOffer {
            id: self.id,
            token_a_offered_amount: self.token_a_offered_amount,
            token_b_wanted_amount: self.token_b_wanted_amount,
        }
        .pack()?;

        let mut accounts = vec![
            AccountMeta::new(self.maker, true),
            AccountMeta::new_readonly(self.token_mint_a, false),
            AccountMeta::new_readonly(self.token_mint_b, false),
            AccountMeta::new(
                pda::find_holding_address(config, &self.maker, &self.token_mint_a),
                false,
            ),
            AccountMeta::new(offer, false),
            AccountMeta::new(pda::find_vault_address(config, &offer, &self.token_mint_a), false),
        ];
        accounts.extend(program_accounts(config));
        Ok(Instruction::new_with_bytes(config.program_id, &data, accounts))
    }
}

/// Request to fill an open offer. The program checks every counterparty
/// against the stored record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TakeOffer {
    pub taker: Pubkey,
    pub offer: Pubkey,
    pub maker: Pubkey,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
}

impl TakeOffer {
    pub fn new(taker: Pubkey, offer: Pubkey, record: &Offer) -> Self {
        Self {
            taker,
            offer,
            maker: record.maker,
            token_mint_a: record.token_mint_a,
            token_mint_b: record.token_mint_b,
        }
    }

    pub fn instruction(&self, config: &EscrowConfig) -> Result<Instruction, EscrowError> {
        let data = EscrowInstruction::TakeOffer.pack()?;
        let mut accounts = vec![
            AccountMeta::new(self.taker, true),
            AccountMeta::new(self.maker, false),
            AccountMeta::new_readonly(self.token_mint_a, false),
            AccountMeta::new_readonly(self.token_mint_b, false),
            AccountMeta::new(
                pda::find_holding_address(config, &self.taker, &self.token_mint_a),
                false,
            ),
            AccountMeta::new(
                pda::find_holding_address(config, &self.taker, &self.token_mint_b),
                false,
            ),
            AccountMeta::new(
                pda::find_holding_address(config, &self.maker, &self.token_mint_b),
                false,
            ),
            AccountMeta::new(self.offer, false),
            AccountMeta::new(
                pda::find_vault_address(config, &self.offer, &self.token_mint_a),
                false,
            ),
        ];
        accounts.extend(program_accounts(config));
        Ok(Instruction::new_with_bytes(config.program_id, &data, accounts))
    }
}

/// Request by the maker to cancel an open offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefundOffer {
    pub maker: Pubkey,
    pub offer: Pubkey,
    pub token_mint_a: Pubkey,
}

impl RefundOffer {
    pub fn instruction(&self, config: &EscrowConfig) -> Result<Instruction, EscrowError> {
        let data = EscrowInstruction::RefundOffer.pack()?;
        let mut accounts = vec![
            AccountMeta::new(self.maker, true),
            AccountMeta::new_readonly(self.token_mint_a, false),
            AccountMeta::new(
                pda::find_holding_address(config, &self.maker, &self.token_mint_a),
                false,
            ),
            AccountMeta::new(self.offer, false),
            AccountMeta::new(
                pda::find_vault_address(config, &self.offer, &self.token_mint_a),
                false,
            ),
        ];
        accounts.extend(program_accounts(config));
        Ok(Instruction::new_with_bytes(config.program_id, &data, accounts))
    }
}
