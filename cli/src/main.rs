mod keypair;
mod presale;

use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Password};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{pubkey::Pubkey, signer::Signer};
use std::path::PathBuf;
use std::str::FromStr;
use anyhow::{Result, anyhow};
use crowdsale_api::prelude::*;
use crowdsale_client::{create_ata, create_mint, mint_to, program, views, voucher};
use crowdsale_client::program::{PurchaseRequest, SaleSetup, Voucher};
use keypair::{get_keypair_path, get_payer};

#[derive(Debug, Clone)]
pub enum Cluster {
    Localnet,
    Mainnet,
    Devnet,
    Testnet,
    Custom(String),
}

impl Cluster {
    pub fn rpc_url(&self) -> String {
        match self {
            Cluster::Localnet => "http://127.0.0.1:8899".to_string(),
            Cluster::Mainnet => "https://api.mainnet-beta.solana.com".to_string(),
            Cluster::Devnet => "https://api.devnet.solana.com".to_string(),
            Cluster::Testnet => "https://api.testnet.solana.com".to_string(),
            Cluster::Custom(url) => url.clone(),
        }
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "l" => Ok(Cluster::Localnet),
            "m" => Ok(Cluster::Mainnet),
            "d" => Ok(Cluster::Devnet),
            "t" => Ok(Cluster::Testnet),
            s if s.starts_with("http://") || s.starts_with("https://") => Ok(Cluster::Custom(s.to_string())),
            _ => Err(format!(
                "Invalid cluster value: '{}'. Use l, m, d, t, or a valid RPC URL (http:// or https://)",
                s
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "crowdsale-cli")]
#[command(about = "CLI for the multi-asset crowdsale program")]
struct Cli {
    #[arg(long, global = true, help = "Path to Solana keypair file (default: ~/.config/solana/id.json)")]
    keypair: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        default_value = "l",
        help = "Solana cluster (l = localnet, m = mainnet, d = devnet, t = testnet, or a custom RPC URL)"
    )]
    cluster: Cluster,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Creates a test mint with an ATA and initial tokens
    CreateMint {
        #[arg(long, default_value_t = 6, help = "Decimals for the mint")]
        decimals: u8,

        #[arg(long, default_value_t = 1_000_000_000_000, help = "Initial amount in smallest units")]
        initial_amount: u64,
    },

    /// Creates a sale for a mint the keypair controls
    InitSale {
        #[arg(long, help = "Sale token mint; its authority moves to the sale")]
        sale_mint: Pubkey,

        #[arg(long, help = "Issuance cap in 18-decimal units (default: 40,000,000 tokens)")]
        cap: Option<u128>,

        #[arg(long, help = "Wallet allowed to load presale allocations")]
        presale_loader: Pubkey,

        #[arg(long, help = "Wallet receiving payments")]
        foundation: Pubkey,

        #[arg(long, help = "Wallet receiving the presale team share")]
        team: Pubkey,

        #[arg(long, help = "Wallet receiving unclaimed referral shares")]
        default_referral: Pubkey,

        #[arg(long, help = "Referral graph program")]
        referral_program: Pubkey,

        #[arg(long, help = "Vesting ledger program")]
        vesting_program: Pubkey,
    },

    /// Adds an admin to the sale
    AddAdmin {
        #[arg(long)]
        sale_mint: Pubkey,

        #[arg(long)]
        admin: Pubkey,
    },

    /// Sets the secp256k1 address that signs purchase vouchers
    SetOracle {
        #[arg(long)]
        sale_mint: Pubkey,

        #[arg(long, help = "20-byte address in hex")]
        oracle: String,
    },

    /// Registers a payment coin or updates its rate
    FetchCoin {
        #[arg(long)]
        sale_mint: Pubkey,

        #[arg(long, help = "Coin mint; omit for the native coin")]
        mint: Option<Pubkey>,

        #[arg(long, default_value_t = 0, help = "Fixed rate: price of one sale token over 10,000")]
        rate: u64,

        #[arg(long, help = "Pool vault holding the coin (pool-derived rate)")]
        coin_vault: Option<Pubkey>,

        #[arg(long, help = "Pool vault holding the anchor coin (pool-derived rate)")]
        anchor_vault: Option<Pubkey>,
    },

    /// Prints the sale configuration and issuance
    GetSale {
        #[arg(long)]
        sale_mint: Pubkey,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Prints a coin's id and current rate
    GetCoin {
        #[arg(long)]
        sale_mint: Pubkey,

        #[arg(long, help = "Coin mint; omit for the native coin")]
        mint: Option<Pubkey>,
    },

    /// Prints the last voucher nonce of a wallet
    GetNonce {
        #[arg(long)]
        sale_mint: Pubkey,

        #[arg(long, help = "Wallet (default: the keypair)")]
        wallet: Option<Pubkey>,
    },

    /// Quotes a purchase without executing it
    Preview {
        #[arg(long)]
        sale_mint: Pubkey,

        #[arg(long, help = "Payment mint; omit to pay with the native coin")]
        mint: Option<Pubkey>,

        #[arg(long, help = "Payment in smallest units, or sale tokens with --exact-output")]
        amount: u64,

        #[arg(long)]
        exact_output: bool,
    },

    /// Buys sale tokens, optionally with an oracle voucher
    Buy {
        #[arg(long)]
        sale_mint: Pubkey,

        #[arg(long, help = "Payment mint; omit to pay with the native coin")]
        mint: Option<Pubkey>,

        #[arg(long, help = "Payment in smallest units, or sale tokens with --exact-output")]
        amount: u64,

        #[arg(long)]
        exact_output: bool,

        #[arg(long, help = "Referrer wallet")]
        referral: Option<Pubkey>,

        #[arg(long, requires = "signature", help = "Voucher nonce")]
        nonce: Option<u64>,

        #[arg(long, requires = "nonce", help = "Voucher signature in hex (r || s || v)")]
        signature: Option<String>,
    },

    /// Signs a purchase voucher with the oracle key
    SignVoucher {
        #[arg(long)]
        sale_mint: Pubkey,

        #[arg(long)]
        buyer: Pubkey,

        #[arg(long, help = "Payment mint; omit for a native purchase")]
        mint: Option<Pubkey>,

        #[arg(long)]
        amount: u64,

        #[arg(long)]
        exact_output: bool,

        #[arg(long)]
        referral: Option<Pubkey>,

        #[arg(long, help = "Nonce to sign (default: the buyer's next nonce)")]
        nonce: Option<u64>,

        #[arg(long, help = "Oracle secret key in hex; prompted when missing")]
        secret: Option<String>,
    },

    /// Loads presale allocations from a JSON file
    PresaleLoad {
        #[arg(long)]
        sale_mint: Pubkey,

        #[arg(long, help = "Vesting ledger account")]
        vesting_ledger: Pubkey,

        #[arg(long, help = "JSON list of { beneficiary, amount, since }")]
        file: PathBuf,

        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

fn payment_request(
    sale_mint: Pubkey,
    mint: Option<Pubkey>,
    amount: u64,
    referral: Option<Pubkey>,
    exact_output: bool,
) -> PurchaseRequest {
    PurchaseRequest {
        sale_mint,
        payment_mint: mint.filter(|m| *m != NATIVE_MINT),
        amount,
        referral: referral.unwrap_or_default(),
        exact_output,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = RpcClient::new(cli.cluster.rpc_url());
    let keypair_path = get_keypair_path(cli.keypair);

    match cli.command {
        Commands::CreateMint { decimals, initial_amount } => {
            let payer = get_payer(keypair_path)?;

            let (mint, mint_signature) = create_mint(&client, &payer, decimals).await?;
            println!("Mint created. Mint: {}. Signature: {}", mint.to_string().green(), mint_signature);

            let (ata, ata_signature) = create_ata(&client, &payer, &mint, &payer.pubkey()).await?;
            println!("Created ATA {}. Signature: {}", ata, ata_signature);

            let mint_to_signature = mint_to(&client, &payer, &mint, &ata, initial_amount).await?;
            println!("Minted {} to ATA {}. Signature: {}", initial_amount, ata, mint_to_signature);
        }

        Commands::InitSale {
            sale_mint,
            cap,
            presale_loader,
            foundation,
            team,
            default_referral,
            referral_program,
            vesting_program,
        } => {
            let payer = get_payer(keypair_path)?;
            let setup = SaleSetup {
                cap: cap.unwrap_or(DEFAULT_SALE_CAP),
                presale_loader,
                foundation,
                team,
                default_referral,
                referral_program,
                vesting_program,
            };

            let (signature, sale_pda) = program::initialize(&client, &payer, sale_mint, setup).await?;
            println!("Sale created. Signature: {}", signature);
            println!("Sale PDA: {}", sale_pda.to_string().green());
        }

        Commands::AddAdmin { sale_mint, admin } => {
            let payer = get_payer(keypair_path)?;
            let signature = program::add_admin(&client, &payer, sale_mint, admin).await?;
            println!("Admin {} added. Signature: {}", admin, signature);
        }

        Commands::SetOracle { sale_mint, oracle } => {
            let payer = get_payer(keypair_path)?;
            let signature = program::set_oracle(&client, &payer, sale_mint, &oracle).await?;
            println!("Oracle set to {}. Signature: {}", oracle, signature);
        }

        Commands::FetchCoin { sale_mint, mint, rate, coin_vault, anchor_vault } => {
            let payer = get_payer(keypair_path)?;
            let mint = mint.unwrap_or(NATIVE_MINT);

            let (rate_mode, pool) = match (coin_vault, anchor_vault) {
                (Some(coin_vault), Some(anchor_vault)) => (RATE_MODE_POOL, Some(PoolRef { coin_vault, anchor_vault })),
                (None, None) if rate > 0 => (RATE_MODE_FIXED, None),
                (None, None) => return Err(anyhow!("Pass --rate for a fixed rate or both vaults for a pool rate")),
                _ => return Err(anyhow!("Pool rates need both --coin-vault and --anchor-vault")),
            };

            let signature = program::fetch_coin(&client, &payer, sale_mint, mint, rate, rate_mode, pool).await?;
            let id = views::coin_id_of(&client, &sale_mint, &mint).await?;
            println!("Coin {} registered with id {}. Signature: {}", mint, id.to_string().green(), signature);
        }

        Commands::GetSale { sale_mint, json } => {
            let sale = views::get_sale(&client, &sale_mint).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&sale)?);
                return Ok(());
            }

            println!("{}", "Sale".bold());
            println!("  Address: {}", sale.sale);
            println!("  Authority: {}", sale.authority);
            println!("  Admins: {}", sale.admins.join(", "));
            println!("  Presale Loader: {}", sale.presale_loader);
            println!("  Oracle: {}", sale.oracle);
            println!("  Sale Mint: {}", sale.sale_mint);
            println!("  Anchor Mint: {}", sale.anchor_mint.as_deref().unwrap_or("none"));
            println!("  Anchor Rate: {}", sale.anchor_rate);
            println!("  Foundation: {}", sale.foundation);
            println!("  Team: {}", sale.team);
            println!("  Default Referral: {}", sale.default_referral);
            println!("  Referral Schedule: {:?} bps", sale.referral_bps);
            println!("  Coins: {}", sale.coin_count);
            println!("  Total Sold: {}", sale.total_sold.yellow());
            println!("  Cap: {}", sale.cap);
            println!("  Remaining: {}", sale.remaining.green());
            println!("  Code Version: {}", sale.code_version);
        }

        Commands::GetCoin { sale_mint, mint } => {
            let mint = mint.unwrap_or(NATIVE_MINT);
            let id = views::coin_id_of(&client, &sale_mint, &mint).await?;
            if id == 0 {
                println!("{} is not a registered coin", mint.to_string().red());
                return Ok(());
            }

            println!("Coin {}", mint);
            println!("  Id: {}", id);
            if let Some(rate) = views::coin_rate(&client, &sale_mint, &mint).await? {
                println!("  Rate: {} / {}", rate.numerator, rate.denominator);
            }
        }

        Commands::GetNonce { sale_mint, wallet } => {
            let wallet = match wallet {
                Some(wallet) => wallet,
                None => get_payer(keypair_path)?.pubkey(),
            };
            let nonce = views::get_wallet_nonce(&client, &sale_mint, &wallet).await?;
            println!("Last nonce of {}: {} (next voucher: {})", wallet, nonce, nonce + 1);
        }

        Commands::Preview { sale_mint, mint, amount, exact_output } => {
            let payer = get_payer(keypair_path)?;
            let request = payment_request(sale_mint, mint, amount, None, exact_output);

            let preview = program::preview_buy(&client, &payer.pubkey(), &request).await?;
            if preview.quote == 0 {
                println!("{}", "Purchase would be rejected".red());
            } else if exact_output {
                println!("Costs {} (coin {})", preview.quote.to_string().green(), preview.coin_id);
            } else {
                println!("Buys {} (coin {})", preview.quote.to_string().green(), preview.coin_id);
            }
        }

        Commands::Buy { sale_mint, mint, amount, exact_output, referral, nonce, signature } => {
            let payer = get_payer(keypair_path)?;
            let request = payment_request(sale_mint, mint, amount, referral, exact_output);

            let signature = match (nonce, signature) {
                (Some(nonce), Some(signature)) => {
                    let voucher = Voucher {
                        nonce,
                        signature: voucher::parse_signature(&signature)?,
                    };
                    program::buy_signed(&client, &payer, request, voucher).await?
                }
                _ => program::buy(&client, &payer, request).await?,
            };
            println!("Buy transaction successful. Signature: {}", signature.to_string().green());
        }

        Commands::SignVoucher { sale_mint, buyer, mint, amount, exact_output, referral, nonce, secret } => {
            let secret = match secret {
                Some(secret) => secret,
                None => Password::new().with_prompt("Oracle secret key (hex)").interact()?,
            };
            let signer = voucher::VoucherSigner::from_hex(&secret)?;

            let oracle = views::get_oracle(&client, &sale_mint).await?;
            if oracle != signer.address() {
                println!("{}", "Warning: key does not match the sale's oracle".yellow());
            }

            let nonce = match nonce {
                Some(nonce) => nonce,
                None => views::get_wallet_nonce(&client, &sale_mint, &buyer).await? + 1,
            };

            let request = payment_request(sale_mint, mint, amount, referral, exact_output);
            let intent = voucher::purchase_intent(
                &sale_mint,
                buyer,
                request.payment_mint,
                amount,
                request.referral,
                exact_output,
                nonce,
            );
            let signature = signer.sign(&intent);

            println!("Nonce: {}", nonce);
            println!("Signature: {}", hex::encode(signature).green());
        }

        Commands::PresaleLoad { sale_mint, vesting_ledger, file, yes } => {
            let payer = get_payer(keypair_path)?;
            let lists = presale::read_presale_file(&file)?;
            let total: u128 = lists.amounts.iter().map(|a| *a as u128).sum();

            println!("{} entries, {} tokens to beneficiaries", lists.beneficiaries.len(), total);
            if !yes && !Confirm::new().with_prompt("Load presale?").interact()? {
                return Ok(());
            }

            let signatures = program::presale_bulk_load(
                &client,
                &payer,
                sale_mint,
                vesting_ledger,
                lists.beneficiaries,
                lists.amounts,
                lists.since_dates,
            ).await?;
            println!("Presale loaded in {} transaction(s)", signatures.len().to_string().green());
        }
    }

    Ok(())
}
