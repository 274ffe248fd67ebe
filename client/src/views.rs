use std::collections::HashMap;
use anyhow::{Result, anyhow};
use serde::Serialize;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use crowdsale_api::prelude::*;

use crate::utils::*;

/// Sale state in display units, ready for JSON output.
#[derive(Debug, Serialize)]
pub struct SaleSummary {
    pub sale: String,
    pub authority: String,
    pub admins: Vec<String>,
    pub presale_loader: String,
    pub oracle: String,
    pub sale_mint: String,
    pub anchor_mint: Option<String>,
    pub anchor_rate: u64,
    pub foundation: String,
    pub team: String,
    pub default_referral: String,
    pub total_sold: String,
    pub cap: String,
    pub remaining: String,
    pub referral_bps: [u16; 3],
    pub coin_count: u16,
    pub code_version: u64,
}

impl SaleSummary {
    pub fn new(sale: &SaleConfig, address: &Pubkey) -> Self {
        let ledger = sale.ledger();
        Self {
            sale: address.to_string(),
            authority: sale.authority.to_string(),
            admins: sale.admins().iter().map(|a| a.to_string()).collect(),
            presale_loader: sale.presale_loader.to_string(),
            oracle: format!("0x{}", hex::encode(sale.oracle)),
            sale_mint: sale.sale_mint.to_string(),
            anchor_mint: sale.has_anchor().then(|| sale.anchor_mint.to_string()),
            anchor_rate: sale.anchor_rate,
            foundation: sale.foundation.to_string(),
            team: sale.team.to_string(),
            default_referral: sale.default_referral.to_string(),
            total_sold: sale.total_sold().to_string(),
            cap: sale.cap().to_string(),
            remaining: ledger.remaining().to_string(),
            referral_bps: sale.referral_bps,
            coin_count: sale.coin_count,
            code_version: code_version(),
        }
    }
}

pub fn code_version() -> u64 {
    CODE_VERSION
}

pub async fn get_sale(client: &RpcClient, sale_mint: &Pubkey) -> Result<SaleSummary> {
    let (sale, address) = get_sale_account(client, sale_mint).await?;
    Ok(SaleSummary::new(&sale, &address))
}

pub async fn get_oracle(client: &RpcClient, sale_mint: &Pubkey) -> Result<EthAddress> {
    let (sale, _) = get_sale_account(client, sale_mint).await?;
    Ok(sale.oracle)
}

/// Last redeemed voucher nonce of `wallet`; the next voucher must carry
/// this value plus one.
pub async fn get_wallet_nonce(client: &RpcClient, sale_mint: &Pubkey, wallet: &Pubkey) -> Result<u64> {
    let (sale_pda, _) = find_sale_pda(sale_mint);
    let nonce = get_nonce_account(client, &sale_pda, wallet).await?;
    Ok(nonce.map(|n| n.last_nonce).unwrap_or_default())
}

/// Id of a registered coin, `0` when unregistered.
pub async fn coin_id_of(client: &RpcClient, sale_mint: &Pubkey, mint: &Pubkey) -> Result<u16> {
    let (sale_pda, _) = find_sale_pda(sale_mint);
    let coin = get_coin_account(client, &sale_pda, mint).await?;
    Ok(coin.map(|c| c.id).unwrap_or_default())
}

/// Pool reserves fetched ahead of a synchronous rate resolution.
struct FetchedPool {
    pool: PoolRef,
    reserves: Option<PoolReserves>,
}

impl PoolReader for FetchedPool {
    fn reserves(&self, pool: &PoolRef) -> Option<PoolReserves> {
        if *pool != self.pool {
            return None;
        }
        self.reserves
    }
}

async fn fetch_pool(client: &RpcClient, sale: &SaleConfig, coin: &CoinConfig) -> Result<FetchedPool> {
    let pool = PoolRef {
        coin_vault: coin.pool_coin_vault,
        anchor_vault: coin.pool_anchor_vault,
    };
    if coin.rate_mode != RATE_MODE_POOL {
        return Ok(FetchedPool { pool, reserves: None });
    }

    let coin_vault = get_token_account(client, &pool.coin_vault).await?;
    let anchor_vault = get_token_account(client, &pool.anchor_vault).await?;
    let reserves = (coin_vault.mint == coin.mint && anchor_vault.mint == sale.anchor_mint).then_some(
        PoolReserves {
            coin: coin_vault.amount,
            coin_decimals: coin.decimals,
            anchor: anchor_vault.amount,
            anchor_decimals: sale.anchor_decimals,
        }
    );

    Ok(FetchedPool { pool, reserves })
}

/// Rate `mint` trades at right now, as price of one sale token over
/// `RATE_DENOMINATOR`. `None` when the coin is not registered.
pub async fn coin_rate(client: &RpcClient, sale_mint: &Pubkey, mint: &Pubkey) -> Result<Option<ExchangeRate>> {
    let (sale, sale_pda) = get_sale_account(client, sale_mint).await?;
    let Some(coin) = get_coin_account(client, &sale_pda, mint).await? else {
        return Ok(None);
    };

    let pools = fetch_pool(client, &sale, &coin).await?;
    let source = coin.rate_source()?;
    let rate = effective_rate(&source, sale.anchor_rate, &pools)?;
    Ok(Some(rate))
}

/// Pool accounts a purchase with `coin` must pass.
pub fn purchase_pool(coin: Option<&CoinConfig>) -> Option<PoolRef> {
    coin.filter(|c| c.rate_mode == RATE_MODE_POOL).map(|c| PoolRef {
        coin_vault: c.pool_coin_vault,
        anchor_vault: c.pool_anchor_vault,
    })
}

struct KnownLinks(HashMap<Pubkey, Pubkey>);

impl ReferralGraph for KnownLinks {
    fn parent_of(&self, child: &Pubkey) -> Result<Option<Pubkey>, SaleError> {
        Ok(self.0.get(child).copied())
    }
}

/// Resolves the three referral recipients of a purchase the same way the
/// program does, falling back to the sale's default wallet.
pub async fn resolve_recipients(
    client: &RpcClient,
    sale: &SaleConfig,
    buyer: &Pubkey,
    referral: &Pubkey,
) -> Result<[Pubkey; 3]> {
    let mut links = HashMap::new();
    let mut current = *referral;

    if current != Pubkey::default() && current != *buyer {
        for _ in 1..REFERRAL_LEVELS {
            let Some(parent) = get_referral_parent(client, &sale.referral_program, &current).await? else {
                break;
            };
            links.insert(current, parent);
            current = parent;
        }
    }

    let chain = resolve_chain(&KnownLinks(links), buyer, referral)
        .map_err(|e| anyhow!("Failed to resolve referral chain: {}", e))?;
    Ok(chain.map(|r| r.unwrap_or(sale.default_referral)))
}
