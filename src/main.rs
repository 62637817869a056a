//! `pog`: command-line driver for the POG gateway.
//!
//! Reads connect read-only unless a signer is available. Writes sign with
//! the key in `POG_WALLET_PRIVATE_KEY`, or with the remote node's account
//! when `--bridge` is given. Results are printed as JSON on stdout; logs go
//! to stderr.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};
use serde::Serialize;

use pog_gateway::blockchain::{Connector, Gateway, TxOutcome, Wallet};
use pog_gateway::config::{load_or_default, GatewayConfig};
use pog_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "pog")]
#[command(about = "Balances, approvals and staking for POG boxes", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sign through the remote node at `network.bridge_url`.
    #[arg(long)]
    bridge: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// POG token balance
    Balance { account: Address },
    /// Box balances (ids 5, 4, 2, 3, 1)
    Items { account: Address },
    /// Token and box approval status for staking
    Approvals { account: Address },
    /// Stakes grouped by box type
    Stakes { account: Address },
    /// Send POG tokens
    Transfer { to: Address, amount: String },
    /// Approve the staking contract to spend POG
    ApproveTokens,
    /// Approve the staking contract to move boxes
    ApproveItems,
    /// Stake boxes of one type
    Stake { item: u16, amount: u16 },
    /// Withdraw stakes
    Withdraw {
        #[arg(required = true)]
        stake_ids: Vec<U256>,
    },
    /// Claim rewards for stakes
    Claim {
        #[arg(required = true)]
        stake_ids: Vec<U256>,
    },
}

impl Commands {
    fn is_write(&self) -> bool {
        matches!(
            self,
            Self::Transfer { .. }
                | Self::ApproveTokens
                | Self::ApproveItems
                | Self::Stake { .. }
                | Self::Withdraw { .. }
                | Self::Claim { .. }
        )
    }
}

#[derive(Serialize)]
struct Approvals {
    tokens: bool,
    items: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.observability);

    tracing::info!(
        rpc_url = %config.network.rpc_url,
        chain_id = config.network.chain_id,
        "Configuration loaded"
    );

    match run(cli, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run one command. `Ok(false)` means a transaction did not succeed.
async fn run(cli: Cli, config: GatewayConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let connector = connector_for(&cli, &config)?;
    let gateway = Gateway::new(config.network);
    gateway.connect(connector).await?;

    match cli.command {
        Commands::Balance { account } => print_json(&gateway.token_balance(account).await?)?,
        Commands::Items { account } => print_json(&gateway.item_balances(account).await?)?,
        Commands::Approvals { account } => print_json(&Approvals {
            tokens: gateway.check_approve(account).await?,
            items: gateway.check_items_approved(account).await?,
        })?,
        Commands::Stakes { account } => {
            let staked: BTreeMap<String, _> = gateway
                .get_stakes(account)
                .await?
                .into_iter()
                .map(|(item, stakes)| (item.to_string(), stakes))
                .collect();
            print_json(&staked)?
        }
        Commands::Transfer { to, amount } => {
            return report(gateway.transfer_tokens(to, &amount).await)
        }
        Commands::ApproveTokens => return report(gateway.approve_tokens().await),
        Commands::ApproveItems => return report(gateway.approve_items().await),
        Commands::Stake { item, amount } => return report(gateway.stake(item, amount).await),
        Commands::Withdraw { stake_ids } => return report(gateway.withdraw(stake_ids).await),
        Commands::Claim { stake_ids } => return report(gateway.claim(stake_ids).await),
    }

    Ok(true)
}

fn connector_for(cli: &Cli, config: &GatewayConfig) -> Result<Connector, Box<dyn std::error::Error>> {
    let rpc_url = config.network.rpc_url.clone();

    if cli.bridge {
        return Ok(Connector::Bridge {
            rpc_url: config.network.bridge_url.clone(),
        });
    }
    if cli.command.is_write() {
        return Ok(Connector::Injected {
            rpc_url,
            wallet: Wallet::from_env()?,
        });
    }
    Ok(Connector::ReadOnly { rpc_url })
}

fn report(outcome: TxOutcome) -> Result<bool, Box<dyn std::error::Error>> {
    print_json(&outcome)?;
    Ok(outcome.success)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_stake_ids() {
        let cli = Cli::parse_from(["pog", "withdraw", "1", "22"]);
        match cli.command {
            Commands::Withdraw { stake_ids } => {
                assert_eq!(stake_ids, vec![U256::from(1u64), U256::from(22u64)])
            }
            _ => panic!("expected withdraw"),
        }
    }

    #[test]
    fn test_reads_connect_read_only() {
        let cli = Cli::parse_from([
            "pog",
            "balance",
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        ]);
        let connector = connector_for(&cli, &GatewayConfig::default()).unwrap();
        assert_eq!(connector.kind(), "read_only");
    }

    #[test]
    fn test_bridge_flag() {
        let cli = Cli::parse_from(["pog", "--bridge", "approve-tokens"]);
        let connector = connector_for(&cli, &GatewayConfig::default()).unwrap();
        assert_eq!(connector.kind(), "bridge");
    }
}
