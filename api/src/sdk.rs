use steel::*;
use spl_associated_token_account::get_associated_token_address;
use crate::prelude::*;

#[allow(clippy::too_many_arguments)]
pub fn build_initialize_sale_ix(
    authority: Pubkey,
    sale_mint: Pubkey,
    cap: u128,
    presale_loader: Pubkey,
    foundation: Pubkey,
    team: Pubkey,
    default_referral: Pubkey,
    referral_program: Pubkey,
    vesting_program: Pubkey,
) -> Instruction {
    let (sale_pda, sale_bump) = find_sale_pda(&sale_mint);

    println!("sale_pda: {}, bump: {}", sale_pda, sale_bump);

    Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(authority, true),
            AccountMeta::new_readonly(sale_mint, false),
            AccountMeta::new(sale_pda, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: InitializeSaleIx::from_struct(
            ParsedInitializeSaleIx {
                cap,
                presale_loader,
                foundation,
                team,
                default_referral,
                referral_program,
                vesting_program,
                bump: sale_bump,
            }
        ).to_bytes(),
    }
}

pub fn build_add_admin_ix(signer: Pubkey, sale_mint: Pubkey, admin: Pubkey) -> Instruction {
    let (sale_pda, _) = find_sale_pda(&sale_mint);

    Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(signer, true),
            AccountMeta::new(sale_pda, false),
        ],
        data: AddAdminIx { admin }.to_bytes(),
    }
}

pub fn build_set_oracle_ix(signer: Pubkey, sale_mint: Pubkey, oracle: EthAddress) -> Instruction {
    let (sale_pda, _) = find_sale_pda(&sale_mint);

    Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(signer, true),
            AccountMeta::new(sale_pda, false),
        ],
        data: SetOracleIx { oracle }.to_bytes(),
    }
}

/// Registers `mint` or updates its rate. Pool-derived coins pass the vault
/// pair the rate is read from.
pub fn build_fetch_coin_ix(
    signer: Pubkey,
    sale_mint: Pubkey,
    mint: Pubkey,
    rate: u64,
    rate_mode: u8,
    pool: Option<PoolRef>,
) -> Instruction {
    let (sale_pda, _) = find_sale_pda(&sale_mint);
    let (coin_pda, coin_bump) = find_coin_pda(&sale_pda, &mint);

    let mut accounts = vec![
        AccountMeta::new(signer, true),
        AccountMeta::new(sale_pda, false),
        AccountMeta::new_readonly(mint, false),
        AccountMeta::new(coin_pda, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];
    if let Some(pool) = pool {
        accounts.push(AccountMeta::new_readonly(pool.coin_vault, false));
        accounts.push(AccountMeta::new_readonly(pool.anchor_vault, false));
    }

    Instruction {
        program_id: crate::ID,
        accounts,
        data: FetchCoinIx::from_struct(
            ParsedFetchCoinIx {
                rate,
                rate_mode,
                bump: coin_bump,
            }
        ).to_bytes(),
    }
}

/// Everything a purchase touches besides the instruction arguments.
#[derive(Clone, Copy, Debug)]
pub struct PurchaseAccounts {
    pub buyer: Pubkey,
    pub sale_mint: Pubkey,
    pub payment_mint: Pubkey,           // NATIVE_MINT on the native path
    pub foundation: Pubkey,
    pub referral_program: Pubkey,
    pub recipients: [Pubkey; 3],        // Resolved referral chain, default wallet where missing
    pub pool: Option<PoolRef>,
}

impl PurchaseAccounts {
    fn pool_metas(&self) -> [AccountMeta; 2] {
        let pool = self.pool.unwrap_or(PoolRef {
            coin_vault: system_program::id(),
            anchor_vault: system_program::id(),
        });
        [
            AccountMeta::new_readonly(pool.coin_vault, false),
            AccountMeta::new_readonly(pool.anchor_vault, false),
        ]
    }

    fn referral_metas(&self) -> Vec<AccountMeta> {
        let mut metas: Vec<AccountMeta> = self.recipients
            .iter()
            .map(|r| AccountMeta::new(get_associated_token_address(r, &self.sale_mint), false))
            .collect();
        for child in &self.recipients[..2] {
            let (record, _) = find_referral_pda(child, &self.referral_program);
            metas.push(AccountMeta::new_readonly(record, false));
        }
        metas
    }

    fn token_metas(&self) -> Vec<AccountMeta> {
        let (sale_pda, _) = find_sale_pda(&self.sale_mint);
        let (coin_pda, _) = find_coin_pda(&sale_pda, &self.payment_mint);

        let mut metas = vec![
            AccountMeta::new(self.buyer, true),
            AccountMeta::new(sale_pda, false),
            AccountMeta::new(self.sale_mint, false),
            AccountMeta::new_readonly(coin_pda, false),
            AccountMeta::new_readonly(self.payment_mint, false),
            AccountMeta::new(get_associated_token_address(&self.buyer, &self.payment_mint), false),
            AccountMeta::new(get_associated_token_address(&self.foundation, &self.payment_mint), false),
            AccountMeta::new(get_associated_token_address(&self.buyer, &self.sale_mint), false),
        ];
        metas.extend(self.referral_metas());
        metas.extend(self.pool_metas());
        metas.push(AccountMeta::new_readonly(spl_token::id(), false));
        metas
    }

    fn native_metas(&self) -> Vec<AccountMeta> {
        let (sale_pda, _) = find_sale_pda(&self.sale_mint);
        let (coin_pda, _) = find_coin_pda(&sale_pda, &NATIVE_MINT);

        let mut metas = vec![
            AccountMeta::new(self.buyer, true),
            AccountMeta::new(sale_pda, false),
            AccountMeta::new(self.sale_mint, false),
            AccountMeta::new_readonly(coin_pda, false),
            AccountMeta::new(self.foundation, false),
            AccountMeta::new(get_associated_token_address(&self.buyer, &self.sale_mint), false),
        ];
        metas.extend(self.referral_metas());
        metas.extend(self.pool_metas());
        metas.push(AccountMeta::new_readonly(spl_token::id(), false));
        metas.push(AccountMeta::new_readonly(system_program::id(), false));
        metas
    }

    fn nonce_meta(&self) -> (AccountMeta, u8) {
        let (sale_pda, _) = find_sale_pda(&self.sale_mint);
        let (nonce_pda, nonce_bump) = find_nonce_pda(&sale_pda, &self.buyer);
        (AccountMeta::new(nonce_pda, false), nonce_bump)
    }
}

pub fn build_buy_ix(
    accounts: &PurchaseAccounts,
    amount: u64,
    referral: Pubkey,
    exact_output: bool,
) -> Instruction {
    Instruction {
        program_id: crate::ID,
        accounts: accounts.token_metas(),
        data: BuyIx::from_struct(
            ParsedBuyIx {
                amount,
                referral,
                exact_output,
            }
        ).to_bytes(),
    }
}

pub fn build_buy_native_ix(
    accounts: &PurchaseAccounts,
    amount: u64,
    value: u64,
    referral: Pubkey,
    exact_output: bool,
) -> Instruction {
    Instruction {
        program_id: crate::ID,
        accounts: accounts.native_metas(),
        data: BuyNativeIx::from_struct(
            ParsedBuyNativeIx {
                amount,
                value,
                referral,
                exact_output,
            }
        ).to_bytes(),
    }
}

pub fn build_buy_signed_ix(
    accounts: &PurchaseAccounts,
    amount: u64,
    referral: Pubkey,
    exact_output: bool,
    nonce: u64,
    signature: [u8; SIGNATURE_LEN],
) -> Instruction {
    let (nonce_meta, nonce_bump) = accounts.nonce_meta();
    let mut metas = accounts.token_metas();
    metas.push(nonce_meta);
    metas.push(AccountMeta::new_readonly(system_program::id(), false));

    Instruction {
        program_id: crate::ID,
        accounts: metas,
        data: BuySignedIx::from_struct(
            ParsedBuySignedIx {
                amount,
                referral,
                exact_output,
                nonce,
                signature,
                nonce_bump,
            }
        ).to_bytes(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn build_buy_native_signed_ix(
    accounts: &PurchaseAccounts,
    amount: u64,
    value: u64,
    referral: Pubkey,
    exact_output: bool,
    nonce: u64,
    signature: [u8; SIGNATURE_LEN],
) -> Instruction {
    let (nonce_meta, nonce_bump) = accounts.nonce_meta();
    let mut metas = accounts.native_metas();
    metas.push(nonce_meta);

    Instruction {
        program_id: crate::ID,
        accounts: metas,
        data: BuyNativeSignedIx::from_struct(
            ParsedBuyNativeSignedIx {
                amount,
                value,
                referral,
                exact_output,
                nonce,
                signature,
                nonce_bump,
            }
        ).to_bytes(),
    }
}

fn preview_metas(sale_mint: Pubkey, mint: Pubkey, pool: Option<PoolRef>) -> Vec<AccountMeta> {
    let (sale_pda, _) = find_sale_pda(&sale_mint);
    let (coin_pda, _) = find_coin_pda(&sale_pda, &mint);
    let pool = pool.unwrap_or(PoolRef {
        coin_vault: system_program::id(),
        anchor_vault: system_program::id(),
    });

    vec![
        AccountMeta::new_readonly(sale_pda, false),
        AccountMeta::new_readonly(sale_mint, false),
        AccountMeta::new_readonly(coin_pda, false),
        AccountMeta::new_readonly(pool.coin_vault, false),
        AccountMeta::new_readonly(pool.anchor_vault, false),
    ]
}

pub fn build_preview_buy_ix(
    sale_mint: Pubkey,
    mint: Pubkey,
    pool: Option<PoolRef>,
    amount: u64,
    exact_output: bool,
) -> Instruction {
    Instruction {
        program_id: crate::ID,
        accounts: preview_metas(sale_mint, mint, pool),
        data: PreviewBuyIx::from_struct(
            ParsedPreviewBuyIx {
                amount,
                exact_output,
            }
        ).to_bytes(),
    }
}

pub fn build_preview_buy_native_ix(
    sale_mint: Pubkey,
    pool: Option<PoolRef>,
    amount: u64,
    exact_output: bool,
) -> Instruction {
    Instruction {
        program_id: crate::ID,
        accounts: preview_metas(sale_mint, NATIVE_MINT, pool),
        data: PreviewBuyNativeIx::from_struct(
            ParsedPreviewBuyIx {
                amount,
                exact_output,
            }
        ).to_bytes(),
    }
}

pub fn build_presale_bulk_load_ix(
    signer: Pubkey,
    sale_mint: Pubkey,
    vesting_program: Pubkey,
    vesting_ledger: Pubkey,
    beneficiaries: Vec<Pubkey>,
    amounts: Vec<u64>,
    since_dates: Vec<i64>,
) -> Result<Instruction, SaleError> {
    let (sale_pda, _) = find_sale_pda(&sale_mint);

    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(signer, true),
            AccountMeta::new(sale_pda, false),
            AccountMeta::new_readonly(sale_mint, false),
            AccountMeta::new_readonly(vesting_program, false),
            AccountMeta::new(vesting_ledger, false),
        ],
        data: PresaleBulkLoadIx::from_struct(
            ParsedPresaleBulkLoadIx {
                beneficiaries,
                amounts,
                since_dates,
            }
        )?.to_bytes(),
    })
}
