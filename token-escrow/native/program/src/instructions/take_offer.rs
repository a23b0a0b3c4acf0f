use solana_program::{
    account_info::{AccountInfo, next_account_info},
    entrypoint::ProgramResult,
    msg,
};

use super::shared::{
    HOLDING_SPACE, Programs, assert_key, assert_rent_payable, assert_signer, assert_writable,
    close_program_account, close_token_account, create_holding, load_holding, load_mint,
    load_open_offer, load_vault, transfer_tokens,
};
use crate::{config::EscrowConfig, error::EscrowError, pda};

/// Swaps the vaulted token A for the taker's token B and closes the offer.
///
/// The taker funds any destination holding that does not exist yet. Rent
/// from the vault and the offer record goes back to the maker who paid it.
///
/// Accounts:
/// [signer, writable taker]
/// [writable maker]
/// [readonly token_mint_a]
/// [readonly token_mint_b]
/// [writable taker_ata_a]
/// [writable taker_ata_b]
/// [writable maker_ata_b]
/// [writable offer]
/// [writable vault]
/// [readonly token program]
/// [readonly associated token program]
/// [readonly system program]
pub fn take_offer(config: &EscrowConfig, accounts: &[AccountInfo]) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    let taker = next_account_info(account_info_iter)?;
    let maker = next_account_info(account_info_iter)?;
    let token_mint_a = next_account_info(account_info_iter)?;
    let token_mint_b = next_account_info(account_info_iter)?;
    let taker_ata_a = next_account_info(account_info_iter)?;
    let taker_ata_b = next_account_info(account_info_iter)?;
    let maker_ata_b = next_account_info(account_info_iter)?;
    let offer = next_account_info(account_info_iter)?;
    let vault = next_account_info(account_info_iter)?;
    let programs = Programs {
        token: next_account_info(account_info_iter)?,
        associated_token: next_account_info(account_info_iter)?,
        system: next_account_info(account_info_iter)?,
    };

    // Basic checks
    assert_signer(taker)?;
    assert_writable(&[
        taker,
        maker,
        taker_ata_a,
        taker_ata_b,
        maker_ata_b,
        offer,
        vault,
    ])?;
    programs.check(config)?;

    let record = load_open_offer(config, offer)?;
    assert_key(maker, &record.maker)?;
    assert_key(token_mint_a, &record.token_mint_a)?;
    assert_key(token_mint_b, &record.token_mint_b)?;
    let vault_amount = load_vault(config, vault, offer.key, &record)?;

    let source_b = load_holding(config, taker_ata_b, taker.key, &record.token_mint_b)?;
    if source_b.amount < record.token_b_wanted_amount {
        return Err(EscrowError::InsufficientFunds.into());
    }
    assert_key(
        taker_ata_a,
        &pda::find_holding_address(config, taker.key, &record.token_mint_a),
    )?;
    assert_key(
        maker_ata_b,
        &pda::find_holding_address(config, &record.maker, &record.token_mint_b),
    )?;
    assert_rent_payable(
        taker,
        &[(taker_ata_a, HOLDING_SPACE), (maker_ata_b, HOLDING_SPACE)],
    )?;
    let mint_a = load_mint(config, token_mint_a)?;
    let mint_b = load_mint(config, token_mint_b)?;

    create_holding(&programs, taker, taker_ata_a, taker, token_mint_a, true)?;
    create_holding(&programs, taker, maker_ata_b, maker, token_mint_b, true)?;

    msg!("Send the wanted tokens to maker");
    transfer_tokens(
        taker_ata_b,
        maker_ata_b,
        record.token_b_wanted_amount,
        token_mint_b,
        mint_b.decimals,
        taker,
        programs.token,
        None,
    )?;

    let id_bytes = record.id_bytes();
    let bump = [record.bump];
    let seeds = pda::offer_signer_seeds(&id_bytes, &bump);

    msg!("Withdraw the offered tokens from vault to taker");
    transfer_tokens(
        vault,
        taker_ata_a,
        vault_amount,
        token_mint_a,
        mint_a.decimals,
        offer,
        programs.token,
        Some(&seeds[..]),
    )?;
    close_token_account(vault, maker, offer, programs.token, &seeds)?;

    msg!("Close offer {}", record.id);
    close_program_account(offer, maker)?;

    Ok(())
}
