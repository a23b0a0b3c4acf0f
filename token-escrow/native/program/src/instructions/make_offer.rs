use solana_program::{
    account_info::{AccountInfo, next_account_info},
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    sysvar::{Sysvar, rent::Rent},
};
use solana_system_interface::instruction::create_account;

use super::shared::{
    HOLDING_SPACE, Programs, assert_key, assert_rent_payable, assert_signer, assert_writable,
    create_holding, is_missing, load_holding, load_mint, transfer_tokens,
};
use crate::{config::EscrowConfig, error::EscrowError, pda, state::Offer};

/// Opens offer `id`: creates the record and its vault, then moves the
/// offered tokens from the maker into the vault.
///
/// Accounts:
/// [signer, writable maker]
/// [readonly token_mint_a]
/// [readonly token_mint_b]
/// [writable maker_ata_a]
/// [writable offer]
/// [writable vault]
/// [readonly token program]
/// [readonly associated token program]
/// [readonly system program]
pub fn make_offer(
    config: &EscrowConfig,
    accounts: &[AccountInfo],
    id: u64,
    token_a_offered_amount: u64,
    token_b_wanted_amount: u64,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    let maker = next_account_info(account_info_iter)?;
    let token_mint_a = next_account_info(account_info_iter)?;
    let token_mint_b = next_account_info(account_info_iter)?;
    let maker_ata_a = next_account_info(account_info_iter)?;
    let offer = next_account_info(account_info_iter)?;
    let vault = next_account_info(account_info_iter)?;
    let programs = Programs {
        token: next_account_info(account_info_iter)?,
        associated_token: next_account_info(account_info_iter)?,
        system: next_account_info(account_info_iter)?,
    };

    // Basic checks
    assert_signer(maker)?;
    assert_writable(&[maker, maker_ata_a, offer, vault])?;
    programs.check(config)?;

    let record = Offer {
        id,
        maker: *maker.key,
        token_mint_a: *token_mint_a.key,
        token_mint_b: *token_mint_b.key,
        token_a_offered_amount,
        token_b_wanted_amount,
        bump: 0,
    };
    record.validate()?;

    let (offer_address, bump) = pda::find_offer_address(config, id)?;
    assert_key(offer, &offer_address)?;
    assert_key(
        vault,
        &pda::find_vault_address(config, &offer_address, token_mint_a.key),
    )?;
    if !is_missing(offer) || !is_missing(vault) {
        return Err(EscrowError::AlreadyExists.into());
    }

    let mint_a = load_mint(config, token_mint_a)?;
    load_mint(config, token_mint_b)?;

    let source = load_holding(config, maker_ata_a, maker.key, token_mint_a.key)?;
    if source.amount < token_a_offered_amount {
        return Err(EscrowError::InsufficientFunds.into());
    }
    assert_rent_payable(maker, &[(offer, Offer::LEN), (vault, HOLDING_SPACE)])?;

    msg!("Create offer {} at {}", id, offer.key);
    let id_bytes = id.to_le_bytes();
    let bump_bytes = [bump];
    let seeds = pda::offer_signer_seeds(&id_bytes, &bump_bytes);
    let lamports = Rent::get()?.minimum_balance(Offer::LEN);
    invoke_signed(
        &create_account(
            maker.key,
            offer.key,
            lamports,
            Offer::LEN as u64,
            &config.program_id,
        ),
        &[maker.clone(), offer.clone(), programs.system.clone()],
        &[&seeds[..]],
    )?;

    msg!("Create vault {}", vault.key);
    create_holding(&programs, maker, vault, offer, token_mint_a, false)?;

    msg!("Send the offered tokens to vault");
    transfer_tokens(
        maker_ata_a,
        vault,
        token_a_offered_amount,
        token_mint_a,
        mint_a.decimals,
        maker,
        programs.token,
        None,
    )?;

    msg!("Save the offer details in the offer account");
    Offer { bump, ..record }.pack_into(&mut offer.try_borrow_mut_data()?[..])?;

    Ok(())
}
