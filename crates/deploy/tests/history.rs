//! End-to-end flow: connect a wallet, deploy the fixed token template and
//! persist the resulting record into the history store.

use std::sync::Arc;

use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes, address};
use tokenmint_deploy::{DeployError, DeploymentCoordinator, TokenTemplate};
use tokenmint_store::{DeploymentRecord, DeploymentRecordStore, MemoryStorage};
use tokenmint_wallets::{WalletSession, mock::MockProvider};

const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

fn template() -> TokenTemplate {
    TokenTemplate::fixed(JsonAbi::default(), Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]))
}

#[tokio::test]
async fn deployed_token_lands_in_history() {
    let provider = MockProvider::new().with_accounts(vec![ALICE]).with_chain(1);
    let session = WalletSession::new(Arc::new(provider.clone()));
    let coordinator = DeploymentCoordinator::new(Arc::new(provider.clone()), template());
    let store = DeploymentRecordStore::new(MemoryStorage::default());

    let snapshot = session.connect().await.unwrap();
    let outcome = coordinator.deploy(&snapshot).await.unwrap();

    // Succeeded is the sole trigger for creating a record.
    let template = template();
    let record = DeploymentRecord::new(
        template.name,
        template.symbol,
        template.decimals,
        template.total_supply,
        outcome.contract_address,
        snapshot.account.unwrap(),
        outcome.chain_id,
        outcome.network_name.clone(),
        outcome.tx_hash,
    );
    store.append(record).unwrap();

    let history = store.list();
    assert_eq!(history.len(), 1);
    let entry = &history[0];
    assert_eq!(entry.contract_address, outcome.contract_address);
    assert_eq!(entry.tx_hash, outcome.tx_hash);
    assert_eq!(entry.owner_address, ALICE);
    assert_eq!(entry.chain_id, 1);
    assert_eq!(entry.network_name, "Ethereum Mainnet");
}

#[tokio::test]
async fn failed_deployment_creates_no_record() {
    let provider = MockProvider::new().with_accounts(vec![ALICE]).with_chain(1);
    provider.fail_submission("insufficient funds for gas");
    let session = WalletSession::new(Arc::new(provider.clone()));
    let coordinator = DeploymentCoordinator::new(Arc::new(provider.clone()), template());
    let store = DeploymentRecordStore::new(MemoryStorage::default());

    let snapshot = session.connect().await.unwrap();
    let err = coordinator.deploy(&snapshot).await.unwrap_err();
    assert!(matches!(err, DeployError::Submission(_)));

    assert!(store.list().is_empty());
}

#[tokio::test]
async fn stale_chain_is_detectable_by_comparing_snapshots() {
    let provider = MockProvider::new().with_accounts(vec![ALICE]).with_chain(1);
    provider.hold_confirmations();
    let session = WalletSession::new(Arc::new(provider.clone()));
    let coordinator = DeploymentCoordinator::new(Arc::new(provider.clone()), template());

    let snapshot = session.connect().await.unwrap();
    let running = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.deploy(&snapshot).await })
    };
    let mut status = coordinator.subscribe();
    while !status.borrow().status.is_in_flight() {
        status.changed().await.unwrap();
    }

    // The wallet switches to Sepolia while the deployment is awaiting
    // confirmation; the attempt still resolves against mainnet.
    session.handle_chain_changed("0xaa36a7");
    provider.release_confirmations();
    let outcome = running.await.unwrap().unwrap();

    assert_eq!(outcome.chain_id, 1);
    assert_ne!(Some(outcome.chain_id), session.snapshot().chain_id);
    assert_eq!(session.snapshot().chain_id, Some(11155111));
}
