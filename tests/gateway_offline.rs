//! Gateway behaviour that does not need a live chain.

use std::time::Duration;

use alloy::primitives::{Address, U256};
use pog_gateway::blockchain::{Connector, FailureKind, Gateway, GatewayError, Wallet};
use pog_gateway::config::NetworkConfig;

// Anvil's first account
const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Nothing listens on port 1.
const DEAD_RPC: &str = "http://127.0.0.1:1";

fn offline_gateway() -> Gateway {
    let mut config = NetworkConfig::default();
    config.rpc_url = DEAD_RPC.to_string();
    config.bridge_url = DEAD_RPC.to_string();
    config.rpc_timeout_secs = 2;
    config.confirmation_timeout_secs = 2;
    Gateway::new(config)
}

fn injected() -> Connector {
    Connector::Injected {
        rpc_url: DEAD_RPC.to_string(),
        wallet: Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap(),
    }
}

#[tokio::test]
async fn test_failed_bridge_keeps_previous_connection() {
    let gateway = offline_gateway();
    let account = gateway.connect(injected()).await.unwrap();
    assert!(account.is_some());

    let result = gateway
        .connect(Connector::Bridge {
            rpc_url: DEAD_RPC.to_string(),
        })
        .await;

    assert!(result.is_err());
    assert_eq!(gateway.account(), account);
}

#[tokio::test]
async fn test_reconnect_replaces_connection() {
    let gateway = offline_gateway();
    gateway.connect(injected()).await.unwrap();

    gateway
        .connect(Connector::ReadOnly {
            rpc_url: DEAD_RPC.to_string(),
        })
        .await
        .unwrap();
    assert!(gateway.is_connected());
    assert_eq!(gateway.account(), None);

    gateway.disconnect();
    assert!(!gateway.is_connected());
}

#[tokio::test]
async fn test_unreachable_node_writes_resolve_false() {
    let gateway = offline_gateway();
    gateway.connect(injected()).await.unwrap();

    let outcome = tokio::time::timeout(
        Duration::from_secs(30),
        gateway.withdraw(vec![U256::from(7u64)]),
    )
    .await
    .expect("write must not hang");

    assert!(!outcome.success);
    assert!(outcome.tx_hash.is_none());
    assert!(outcome.failure.is_some());
    assert_ne!(outcome.failure_kind(), Some(FailureKind::Rejected));
}

#[tokio::test]
async fn test_unreachable_node_reads_propagate() {
    let gateway = offline_gateway();
    gateway
        .connect(Connector::ReadOnly {
            rpc_url: DEAD_RPC.to_string(),
        })
        .await
        .unwrap();

    let result = gateway.item_balances(Address::ZERO).await;
    assert!(matches!(
        result,
        Err(GatewayError::Rpc(_)) | Err(GatewayError::Timeout(_))
    ));
}
