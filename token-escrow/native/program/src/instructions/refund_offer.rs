use solana_program::{
    account_info::{AccountInfo, next_account_info},
    entrypoint::ProgramResult,
    msg,
};

use super::shared::{
    HOLDING_SPACE, Programs, assert_key, assert_rent_payable, assert_signer, assert_writable,
    close_program_account, close_token_account, create_holding, load_mint, load_open_offer,
    load_vault, transfer_tokens,
};
use crate::{config::EscrowConfig, pda};

/// Returns the vaulted tokens to the maker and closes the offer. Only the
/// maker recorded in the offer may refund it.
///
/// Accounts:
/// [signer, writable maker]
/// [readonly token_mint_a]
/// [writable maker_ata_a]
/// [writable offer]
/// [writable vault]
/// [readonly token program]
/// [readonly associated token program]
/// [readonly system program]
pub fn refund_offer(config: &EscrowConfig, accounts: &[AccountInfo]) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    let maker = next_account_info(account_info_iter)?;
    let token_mint_a = next_account_info(account_info_iter)?;
    let maker_ata_a = next_account_info(account_info_iter)?;
    let offer = next_account_info(account_info_iter)?;
    let vault = next_account_info(account_info_iter)?;
    let programs = Programs {
        token: next_account_info(account_info_iter)?,
        associated_token: next_account_info(account_info_iter)?,
        system: next_account_info(account_info_iter)?,
    };

    assert_signer(maker)?;
    assert_writable(&[maker, maker_ata_a, offer, vault])?;
    programs.check(config)?;

    let record = load_open_offer(config, offer)?;
    assert_key(maker, &record.maker)?;
    assert_key(token_mint_a, &record.token_mint_a)?;
    let vault_amount = load_vault(config, vault, offer.key, &record)?;
    assert_key(
        maker_ata_a,
        &pda::find_holding_address(config, &record.maker, &record.token_mint_a),
    )?;
    assert_rent_payable(maker, &[(maker_ata_a, HOLDING_SPACE)])?;
    let mint_a = load_mint(config, token_mint_a)?;

    create_holding(&programs, maker, maker_ata_a, maker, token_mint_a, true)?;

    let id_bytes = record.id_bytes();
    let bump = [record.bump];
    let seeds = pda::offer_signer_seeds(&id_bytes, &bump);

    msg!("Refund the offered tokens to maker");
    transfer_tokens(
        vault,
        maker_ata_a,
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
