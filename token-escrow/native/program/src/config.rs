use solana_program::pubkey::Pubkey;

/// Program identities the escrow derives addresses under.
///
/// Passed explicitly into every derivation and transition so that one
/// build can serve several deployments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscrowConfig {
    pub program_id: Pubkey,
    pub token_program_id: Pubkey,
    pub associated_token_program_id: Pubkey,
}

impl EscrowConfig {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            ..Self::default()
        }
    }
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            program_id: crate::ID,
            token_program_id: spl_token::id(),
            associated_token_program_id: spl_associated_token_account::id(),
        }
    }
}
