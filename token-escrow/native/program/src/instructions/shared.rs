use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack},
    pubkey::Pubkey,
    sysvar::{Sysvar, rent::Rent},
};
use spl_associated_token_account::instruction::{
    create_associated_token_account, create_associated_token_account_idempotent,
};
use spl_token::state::{Account as TokenAccount, Mint};

use crate::{config::EscrowConfig, error::EscrowError, pda, state::Offer};

pub const HOLDING_SPACE: usize = TokenAccount::LEN;

/// Program accounts every escrow instruction passes last.
pub struct Programs<'a, 'info> {
    pub token: &'a AccountInfo<'info>,
    pub associated_token: &'a AccountInfo<'info>,
    pub system: &'a AccountInfo<'info>,
}

impl Programs<'_, '_> {
    pub fn check(&self, config: &EscrowConfig) -> ProgramResult {
        if *self.token.key != config.token_program_id
            || *self.associated_token.key != config.associated_token_program_id
            || *self.system.key != solana_system_interface::program::ID
        {
            return Err(ProgramError::IncorrectProgramId);
        }
        Ok(())
    }
}

pub fn assert_signer(account: &AccountInfo) -> Result<(), EscrowError> {
    if !account.is_signer {
        return Err(EscrowError::Unauthorized);
    }
    Ok(())
}

pub fn assert_writable(accounts: &[&AccountInfo]) -> ProgramResult {
    if accounts.iter().any(|account| !account.is_writable) {
        return Err(ProgramError::Immutable);
    }
    Ok(())
}

pub fn assert_key(account: &AccountInfo, expected: &Pubkey) -> Result<(), EscrowError> {
    if account.key != expected {
        return Err(EscrowError::Unauthorized);
    }
    Ok(())
}

/// An account nobody has funded yet.
pub fn is_missing(account: &AccountInfo) -> bool {
    account.lamports() == 0
}

fn unpack_token_state<T: Pack + IsInitialized>(
    config: &EscrowConfig,
    account: &AccountInfo,
) -> Option<T> {
    if *account.owner != config.token_program_id {
        return None;
    }
    let data = account.try_borrow_data().ok()?;
    T::unpack(&data).ok()
}

pub fn load_mint(config: &EscrowConfig, mint: &AccountInfo) -> Result<Mint, EscrowError> {
    unpack_token_state(config, mint).ok_or(EscrowError::InvalidArgument)
}

/// Loads the open offer at `offer` and checks it sits at its own derived address.
pub fn load_open_offer(config: &EscrowConfig, offer: &AccountInfo) -> Result<Offer, EscrowError> {
    if *offer.owner != config.program_id {
        if offer.data_is_empty() {
            return Err(EscrowError::NotFound);
        }
        return Err(EscrowError::Unauthorized);
    }
    let record = {
        let data = offer
            .try_borrow_data()
            .map_err(|_| EscrowError::InvalidAccountData)?;
        Offer::unpack(&data)?
    };
    if pda::create_offer_address(config, record.id, record.bump)? != *offer.key {
        return Err(EscrowError::Unauthorized);
    }
    Ok(record)
}

/// Checks the vault address and returns its balance, which must cover the
/// amount deposited at creation.
pub fn load_vault(
    config: &EscrowConfig,
    vault: &AccountInfo,
    offer: &Pubkey,
    record: &Offer,
) -> Result<u64, EscrowError> {
    assert_key(vault, &pda::find_vault_address(config, offer, &record.token_mint_a))?;
    let vault_account: TokenAccount =
        unpack_token_state(config, vault).ok_or(EscrowError::InvalidAccountData)?;
    if vault_account.owner != *offer
        || vault_account.mint != record.token_mint_a
        || vault_account.amount < record.token_a_offered_amount
    {
        return Err(EscrowError::InvalidAccountData);
    }
    Ok(vault_account.amount)
}

/// A token holding `owner` controls for `mint`. An absent holding has no
/// balance to spend.
pub fn load_holding(
    config: &EscrowConfig,
    holding: &AccountInfo,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<TokenAccount, EscrowError> {
    if is_missing(holding) {
        return Err(EscrowError::InsufficientFunds);
    }
    let account: TokenAccount =
        unpack_token_state(config, holding).ok_or(EscrowError::Unauthorized)?;
    if account.owner != *owner || account.mint != *mint {
        return Err(EscrowError::Unauthorized);
    }
    Ok(account)
}

/// Fails unless `payer` can fund every account in `accounts` that does not exist yet.
pub fn assert_rent_payable(payer: &AccountInfo, accounts: &[(&AccountInfo, usize)]) -> ProgramResult {
    let rent = Rent::get()?;
    let needed = accounts
        .iter()
        .filter(|(account, _)| is_missing(account))
        .try_fold(0u64, |total, (_, space)| {
            total.checked_add(rent.minimum_balance(*space))
        })
        .ok_or(EscrowError::Overflow)?;
    if payer.lamports() < needed {
        return Err(EscrowError::InsufficientFunds.into());
    }
    Ok(())
}

/// Creates the associated token account of `wallet` for `mint`. With
/// `idempotent` an existing account is left alone.
pub fn create_holding<'info>(
    programs: &Programs<'_, 'info>,
    funder: &AccountInfo<'info>,
    holding: &AccountInfo<'info>,
    wallet: &AccountInfo<'info>,
    mint: &AccountInfo<'info>,
    idempotent: bool,
) -> ProgramResult {
    let instruction = if idempotent {
        create_associated_token_account_idempotent(
            funder.key,
            wallet.key,
            mint.key,
            programs.token.key,
        )
    } else {
        create_associated_token_account(funder.key, wallet.key, mint.key, programs.token.key)
    };
    invoke(
        &instruction,
        &[
            funder.clone(),
            holding.clone(),
            wallet.clone(),
            mint.clone(),
            programs.system.clone(),
            programs.token.clone(),
            programs.associated_token.clone(),
        ],
    )
}

// Transfer tokens from one account to another.
// If the source is owned by a PDA, owning_pda_seeds must be provided.
pub fn transfer_tokens<'info>(
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    amount: u64,
    mint: &AccountInfo<'info>,
    decimals: u8,
    authority: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
    owning_pda_seeds: Option<&[&[u8]]>,
) -> ProgramResult {
    let instruction = spl_token::instruction::transfer_checked(
        token_program.key,
        from.key,
        mint.key,
        to.key,
        authority.key,
        &[],
        amount,
        decimals,
    )?;
    let accounts = [
        from.clone(),
        mint.clone(),
        to.clone(),
        authority.clone(),
        token_program.clone(),
    ];
    match owning_pda_seeds {
        Some(seeds) => invoke_signed(&instruction, &accounts, &[seeds]),
        None => invoke(&instruction, &accounts),
    }
}

/// Closes a token account owned by the offer PDA, sending its rent to `destination`.
pub fn close_token_account<'info>(
    account: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
    owning_pda_seeds: &[&[u8]],
) -> ProgramResult {
    let instruction = spl_token::instruction::close_account(
        token_program.key,
        account.key,
        destination.key,
        authority.key,
        &[],
    )?;
    invoke_signed(
        &instruction,
        &[
            account.clone(),
            destination.clone(),
            authority.clone(),
            token_program.clone(),
        ],
        &[owning_pda_seeds],
    )
}

/// Closes a program-owned account: lamports move to `destination`, the
/// data is wiped and the account is handed back to the system program.
pub fn close_program_account(account: &AccountInfo, destination: &AccountInfo) -> ProgramResult {
    let credited = destination
        .lamports()
        .checked_add(account.lamports())
        .ok_or(EscrowError::Overflow)?;
    **destination.try_borrow_mut_lamports()? = credited;
    **account.try_borrow_mut_lamports()? = 0;

    account.try_borrow_mut_data()?.fill(0);
    account.realloc(0, true)?;
    account.assign(&solana_system_interface::program::ID);
    Ok(())
}
