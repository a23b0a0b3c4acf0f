#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use litesvm::LiteSVM;
use solana_program::{instruction::Instruction, program_pack::Pack, pubkey::Pubkey};
use solana_sdk::{
    account::Account,
    instruction::InstructionError,
    signature::Keypair,
    signer::Signer,
    transaction::{Transaction, TransactionError},
};
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use spl_token::state::{Account as TokenAccount, Mint};
use spl_token_escrow::{
    EscrowConfig, EscrowError, Offer,
    instruction::{MakeOffer, RefundOffer, TakeOffer},
    pda,
};

/// Token A units alice starts with.
pub const ALICE_TOKEN_A: u64 = 1_000_000;
/// Token B units bob starts with.
pub const BOB_TOKEN_B: u64 = 5_000_000;
pub const STARTING_LAMPORTS: u64 = 1_000_000_000;

const PAYER_LAMPORTS: u64 = 100_000_000_000;
const DECIMALS: u8 = 6;

/// Where `cargo build-sbf` leaves the program, unless `SBF_OUT_DIR` says otherwise.
fn program_path() -> PathBuf {
    std::env::var("SBF_OUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../target/deploy"))
        .join("spl_token_escrow.so")
}

/// LiteSVM with the escrow deployed, two mints, alice holding token A and
/// bob holding token B.
///
/// A separate payer covers every transaction fee, so user lamports only
/// move by rent.
pub struct EscrowTestEnvironment {
    pub litesvm: LiteSVM,
    pub config: EscrowConfig,
    pub payer: Keypair,
    /// Mints both tokens and may freeze any holding of them.
    pub mint_authority: Keypair,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    /// Typically the offer maker.
    pub alice: Pubkey,
    /// Typically the offer taker.
    pub bob: Pubkey,
    pub alice_token_account_a: Pubkey,
    pub alice_token_account_b: Pubkey,
    pub bob_token_account_a: Pubkey,
    pub bob_token_account_b: Pubkey,
    users: HashMap<Pubkey, Keypair>,
}

pub fn setup_escrow_test() -> EscrowTestEnvironment {
    let config = EscrowConfig::default();
    let mut litesvm = LiteSVM::new();
    litesvm
        .add_program_from_file(config.program_id, program_path())
        .expect("build the program with `cargo build-sbf` first");

    let payer = Keypair::new();
    litesvm.airdrop(&payer.pubkey(), PAYER_LAMPORTS).unwrap();

    let mut test_env = EscrowTestEnvironment {
        litesvm,
        config,
        payer,
        mint_authority: Keypair::new(),
        token_mint_a: Pubkey::default(),
        token_mint_b: Pubkey::default(),
        alice: Pubkey::default(),
        bob: Pubkey::default(),
        alice_token_account_a: Pubkey::default(),
        alice_token_account_b: Pubkey::default(),
        bob_token_account_a: Pubkey::default(),
        bob_token_account_b: Pubkey::default(),
        users: HashMap::new(),
    };

    test_env.token_mint_a = test_env.create_mint();
    test_env.token_mint_b = test_env.create_mint();
    test_env.alice = test_env.create_user(STARTING_LAMPORTS);
    test_env.bob = test_env.create_user(STARTING_LAMPORTS);

    let (alice, bob) = (test_env.alice, test_env.bob);
    let (mint_a, mint_b) = (test_env.token_mint_a, test_env.token_mint_b);
    test_env.alice_token_account_a = test_env.mint_to(&mint_a, &alice, ALICE_TOKEN_A);
    test_env.bob_token_account_b = test_env.mint_to(&mint_b, &bob, BOB_TOKEN_B);
    test_env.alice_token_account_b = pda::find_holding_address(&config, &alice, &mint_b);
    test_env.bob_token_account_a = pda::find_holding_address(&config, &bob, &mint_a);

    test_env
}

impl EscrowTestEnvironment {
    /// A fresh wallet the environment can sign for. Zero lamports leaves it unfunded.
    pub fn create_user(&mut self, lamports: u64) -> Pubkey {
        let user = Keypair::new();
        let address = user.pubkey();
        if lamports > 0 {
            self.litesvm.airdrop(&address, lamports).unwrap();
        }
        self.users.insert(address, user);
        address
    }

    fn create_mint(&mut self) -> Pubkey {
        let mint = Keypair::new();
        let authority = self.mint_authority.pubkey();
        let instructions = [
            solana_system_interface::instruction::create_account(
                &self.payer.pubkey(),
                &mint.pubkey(),
                self.rent(Mint::LEN),
                Mint::LEN as u64,
                &spl_token::id(),
            ),
            spl_token::instruction::initialize_mint2(
                &spl_token::id(),
                &mint.pubkey(),
                &authority,
                Some(&authority),
                DECIMALS,
            )
            .unwrap(),
        ];
        self.execute(&instructions, &[&mint]).unwrap();
        mint.pubkey()
    }

    /// A plain token account of `owner` for `mint`, at an address that is not its ATA.
    pub fn create_token_account(&mut self, mint: &Pubkey, owner: &Pubkey) -> Pubkey {
        let account = Keypair::new();
        let instructions = [
            solana_system_interface::instruction::create_account(
                &self.payer.pubkey(),
                &account.pubkey(),
                self.rent(TokenAccount::LEN),
                TokenAccount::LEN as u64,
                &spl_token::id(),
            ),
            spl_token::instruction::initialize_account3(
                &spl_token::id(),
                &account.pubkey(),
                mint,
                owner,
            )
            .unwrap(),
        ];
        self.execute(&instructions, &[&account]).unwrap();
        account.pubkey()
    }

    /// Mints into the associated token account of `owner`, creating it at the payer's cost.
    pub fn mint_to(&mut self, mint: &Pubkey, owner: &Pubkey, amount: u64) -> Pubkey {
        let holding = pda::find_holding_address(&self.config, owner, mint);
        let create = create_associated_token_account_idempotent(
            &self.payer.pubkey(),
            owner,
            mint,
            &spl_token::id(),
        );
        self.execute(&[create], &[]).unwrap();
        self.mint_to_account(mint, &holding, amount);
        holding
    }

    pub fn mint_to_account(&mut self, mint: &Pubkey, holding: &Pubkey, amount: u64) {
        let instruction = spl_token::instruction::mint_to(
            &spl_token::id(),
            mint,
            holding,
            &self.mint_authority.pubkey(),
            &[],
            amount,
        )
        .unwrap();
        self.execute_as_mint_authority(instruction);
    }

    pub fn freeze(&mut self, mint: &Pubkey, holding: &Pubkey) {
        let instruction = spl_token::instruction::freeze_account(
            &spl_token::id(),
            holding,
            mint,
            &self.mint_authority.pubkey(),
            &[],
        )
        .unwrap();
        self.execute_as_mint_authority(instruction);
    }

    fn execute_as_mint_authority(&mut self, instruction: Instruction) {
        self.litesvm.expire_blockhash();
        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&self.payer.pubkey()),
            &[&self.payer, &self.mint_authority],
            self.litesvm.latest_blockhash(),
        );
        self.litesvm.send_transaction(transaction).unwrap();
    }

    fn execute(
        &mut self,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
    ) -> Result<(), TransactionError> {
        self.litesvm.expire_blockhash();
        let mut signers = vec![&self.payer];
        signers.extend_from_slice(extra_signers);
        let transaction = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer.pubkey()),
            &signers,
            self.litesvm.latest_blockhash(),
        );
        self.litesvm
            .send_transaction(transaction)
            .map(|_| ())
            .map_err(|failed| failed.err)
    }

    /// Sends `instructions` as one transaction signed by the payer and each of `signers`.
    pub fn send_all(
        &mut self,
        instructions: &[Instruction],
        signers: &[Pubkey],
    ) -> Result<(), TransactionError> {
        self.litesvm.expire_blockhash();
        let mut keypairs = vec![&self.payer];
        keypairs.extend(signers.iter().map(|signer| &self.users[signer]));
        let transaction = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer.pubkey()),
            &keypairs,
            self.litesvm.latest_blockhash(),
        );
        self.litesvm
            .send_transaction(transaction)
            .map(|_| ())
            .map_err(|failed| failed.err)
    }

    pub fn send(&mut self, instruction: Instruction, signer: Pubkey) -> Result<(), TransactionError> {
        self.send_all(&[instruction], &[signer])
    }

    /// Sends `instruction` with only the fee payer's signature.
    pub fn send_unsigned(&mut self, instruction: Instruction) -> Result<(), TransactionError> {
        self.send_all(&[instruction], &[])
    }

    pub fn rent(&self, space: usize) -> u64 {
        self.litesvm.minimum_balance_for_rent_exemption(space)
    }

    /// The live account at `address`. Closed accounts read as absent.
    pub fn account(&self, address: &Pubkey) -> Option<Account> {
        self.litesvm
            .get_account(address)
            .filter(|account| account.lamports > 0)
    }

    pub fn set_account(&mut self, address: &Pubkey, account: Account) {
        self.litesvm.set_account(*address, account).unwrap();
    }

    pub fn lamports(&self, address: &Pubkey) -> u64 {
        self.account(address).map_or(0, |account| account.lamports)
    }

    pub fn balance(&self, holding: &Pubkey) -> u64 {
        self.account(holding)
            .map_or(0, |account| TokenAccount::unpack(&account.data).unwrap().amount)
    }

    pub fn offer(&self, address: &Pubkey) -> Option<Offer> {
        self.account(address)
            .filter(|account| account.owner == self.config.program_id)
            .map(|account| Offer::unpack(&account.data).unwrap())
    }

    pub fn offer_address(&self, id: u64) -> Pubkey {
        pda::find_offer_address(&self.config, id).unwrap().0
    }

    pub fn vault_address(&self, offer: &Pubkey) -> Pubkey {
        pda::find_vault_address(&self.config, offer, &self.token_mint_a)
    }

    pub fn holding_address(&self, wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
        pda::find_holding_address(&self.config, wallet, mint)
    }

    pub fn make_offer_request(&self, maker: Pubkey, id: u64, offered: u64, wanted: u64) -> MakeOffer {
        MakeOffer {
            maker,
            token_mint_a: self.token_mint_a,
            token_mint_b: self.token_mint_b,
            token_a_offered_amount: offered,
            token_b_wanted_amount: wanted,
            id,
        }
    }

    pub fn make_offer_instruction(&self, id: u64, offered: u64, wanted: u64) -> Instruction {
        self.make_offer_request(self.alice, id, offered, wanted)
            .instruction(&self.config)
            .unwrap()
    }

    pub fn take_offer_instruction(&self, taker: Pubkey, offer: Pubkey, record: &Offer) -> Instruction {
        TakeOffer::new(taker, offer, record)
            .instruction(&self.config)
            .unwrap()
    }

    pub fn refund_offer_instruction(&self, maker: Pubkey, offer: Pubkey, record: &Offer) -> Instruction {
        RefundOffer {
            maker,
            offer,
            token_mint_a: record.token_mint_a,
        }
        .instruction(&self.config)
        .unwrap()
    }

    /// Opens an offer from alice and returns its address and record.
    pub fn open_offer(&mut self, id: u64, offered: u64, wanted: u64) -> (Pubkey, Offer) {
        let instruction = self.make_offer_instruction(id, offered, wanted);
        self.send(instruction, self.alice).unwrap();
        let offer = self.offer_address(id);
        let record = self.offer(&offer).unwrap();
        (offer, record)
    }
}

/// The program error a failed transaction stopped on.
pub fn instruction_error(result: Result<(), TransactionError>) -> InstructionError {
    match result {
        Err(TransactionError::InstructionError(_, error)) => error,
        other => panic!("expected an instruction error, got {other:?}"),
    }
}

pub fn escrow_error(result: Result<(), TransactionError>) -> EscrowError {
    match instruction_error(result) {
        InstructionError::Custom(code) => EscrowError::from_program_error(
            &solana_program::program_error::ProgramError::Custom(code),
        )
        .unwrap_or_else(|| panic!("custom error {code} is not an escrow error")),
        other => panic!("expected an escrow error, got {other:?}"),
    }
}
