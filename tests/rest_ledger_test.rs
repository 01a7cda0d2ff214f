//! RestLedgerClient Integration Tests
//!
//! Runs the REST ledger client against an in-process ledger-mock server
//! bound to an ephemeral localhost port.
//!
//! Run with: cargo test --test rest_ledger_test -- --nocapture

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use ledger_mock::{LedgerStore, SeedStatus, SeedTransactionRequest};
use property_registry::{
    ConfirmationWaiter, FinalityOutcome, LedgerClient, PendingTransaction, PropertyRegistrar,
    RegistrationError, RestLedgerClient, TransactionLookup,
};

async fn start_ledger() -> anyhow::Result<(Arc<LedgerStore>, String)> {
    let store = Arc::new(LedgerStore::new());
    let addr = ledger_mock::spawn_local(store.clone()).await?;
    Ok((store, format!("http://{}/v1", addr)))
}

fn pending(hash: &str) -> PendingTransaction {
    PendingTransaction {
        hash: hash.to_string(),
        sender: OWNER.to_string(),
    }
}

#[tokio::test]
async fn test_lookup_lifecycle() -> anyhow::Result<()> {
    init_logging();
    let (store, url) = start_ledger().await?;
    let client = RestLedgerClient::new(url);

    assert_eq!(
        client.transaction_by_hash(TX_HASH).await?,
        TransactionLookup::NotFound
    );

    store.submit_pending(TX_HASH);
    assert_eq!(
        client.transaction_by_hash(TX_HASH).await?,
        TransactionLookup::Pending
    );

    store.commit(TX_HASH, true, None)?;
    match client.transaction_by_hash(TX_HASH).await? {
        TransactionLookup::Committed(committed) => {
            assert_eq!(committed.hash, TX_HASH);
            assert_eq!(committed.version, Some(1));
            assert!(committed.success);
            assert_eq!(committed.vm_status, "Executed successfully");
        }
        other => panic!("expected committed transaction, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_unreachable_ledger_is_a_fault() {
    init_logging();
    // Nothing listens on the discard port
    let client = RestLedgerClient::new("http://127.0.0.1:9/v1");

    let fault = client.transaction_by_hash(TX_HASH).await.unwrap_err();
    assert_eq!(fault.status, None);
}

#[tokio::test]
async fn test_waiter_sees_failed_execution_seeded_over_http() -> anyhow::Result<()> {
    init_logging();
    let (_store, url) = start_ledger().await?;

    let seed = SeedTransactionRequest {
        hash: "0xFAILED".to_string(),
        status: SeedStatus::Failed,
        vm_status: Some("Move abort in 0xMOD::PropertyRegistry: 0x80001".to_string()),
    };
    let response = reqwest::Client::new()
        .post(format!("{}/mock/transactions", url))
        .json(&seed)
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let waiter = ConfirmationWaiter::new(
        Arc::new(RestLedgerClient::new(url)),
        Duration::from_secs(2),
        Duration::from_millis(20),
    );

    match waiter.await_finality(&pending("0xFAILED")).await {
        FinalityOutcome::TransactionFailed(committed) => {
            assert!(!committed.success);
            assert!(committed.vm_status.contains("0x80001"));
        }
        other => panic!("expected failed execution, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_waiter_times_out_on_pending() -> anyhow::Result<()> {
    init_logging();
    let (store, url) = start_ledger().await?;
    store.submit_pending(TX_HASH);

    let waiter = ConfirmationWaiter::new(
        Arc::new(RestLedgerClient::new(url)),
        Duration::from_millis(200),
        Duration::from_millis(20),
    );

    assert_eq!(
        waiter.await_finality(&pending(TX_HASH)).await,
        FinalityOutcome::Timeout {
            waited: Duration::from_millis(200)
        }
    );

    Ok(())
}

#[tokio::test]
async fn test_registration_confirmed_by_rest_ledger() -> anyhow::Result<()> {
    init_logging();
    let (store, url) = start_ledger().await?;

    let mut config = test_config();
    config.ledger_url = url;
    config.confirmation_timeout = Duration::from_secs(5);

    let wallet = Arc::new(ScriptedWallet::new(OWNER, TX_HASH));
    let registrar = PropertyRegistrar::with_rest_ledger(Some(wallet), &config);
    registrar.connect_wallet().await?;
    registrar.update_draft(|draft| {
        draft.property_id = "7".to_string();
        draft.value = 19.99;
        draft.address = "123 Main St".to_string();
    });

    // Ledger commits the transaction a little after the wallet broadcasts it
    store.submit_pending(TX_HASH);
    let committer = {
        let store = store.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            store.commit(TX_HASH, true, None)
        })
    };

    let record = registrar.register_property().await?;
    committer.await??;

    assert_eq!(record.owner, OWNER);
    assert_eq!(record.ledger_version, Some(1));
    assert_eq!(registrar.properties().len(), 1);
    assert!(registrar.draft().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_registration_times_out_against_rest_ledger() -> anyhow::Result<()> {
    init_logging();
    let (_store, url) = start_ledger().await?;

    let mut config = test_config();
    config.ledger_url = url;

    let wallet = Arc::new(ScriptedWallet::new(OWNER, TX_HASH));
    let registrar = PropertyRegistrar::with_rest_ledger(Some(wallet), &config);
    registrar.connect_wallet().await?;
    registrar.update_draft(|draft| {
        draft.property_id = "8".to_string();
        draft.value = 100.0;
        draft.address = "9 Elm St".to_string();
    });

    // The hash never reaches the ledger
    let err = registrar.register_property().await.unwrap_err();
    assert!(matches!(err, RegistrationError::ConfirmationTimeout { .. }));
    assert_eq!(registrar.draft().property_id, "8");

    Ok(())
}
