use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, msg, pubkey::Pubkey};

use crate::{
    config::EscrowConfig,
    instruction::EscrowInstruction,
    instructions::{make_offer, refund_offer, take_offer},
};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let config = EscrowConfig::new(*program_id);
    let instruction = EscrowInstruction::unpack(instruction_data)?;

    match instruction {
        EscrowInstruction::MakeOffer {
            id,
            token_a_offered_amount,
            token_b_wanted_amount,
        } => {
            msg!("Instruction: MakeOffer");
            make_offer(
                &config,
                accounts,
                id,
                token_a_offered_amount,
                token_b_wanted_amount,
            )
        }
        EscrowInstruction::TakeOffer => {
            msg!("Instruction: TakeOffer");
            take_offer(&config, accounts)
        }
        EscrowInstruction::RefundOffer => {
            msg!("Instruction: RefundOffer");
            refund_offer(&config, accounts)
        }
    }
}
