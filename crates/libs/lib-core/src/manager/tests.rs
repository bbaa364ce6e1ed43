use std::cell::Cell;
use std::rc::Rc;

use serde_json::{json, Value};

use super::*;
use crate::provider::mock::MockProvider;
use crate::session::ConnectionState;

const ALICE: &str = "0x1111111111111111111111111111111111111111";
const BOB: &str = "0x2222222222222222222222222222222222222222";

struct Harness {
    manager: ConnectionManager<MockProvider>,
    reloads: Rc<Cell<u32>>,
}

impl Harness {
    fn new(policy: ChainChangePolicy) -> Self {
        let reloads = Rc::new(Cell::new(0));
        let counter = reloads.clone();
        let config = WalletConfig {
            chain_change_policy: policy,
            ..WalletConfig::default()
        };
        let manager = ConnectionManager::new(Some(MockProvider::new()), SessionStore::new())
            .with_config(config)
            .on_reload(move || counter.set(counter.get() + 1));
        Self { manager, reloads }
    }

    fn mock(&self) -> &MockProvider {
        self.manager.provider.as_deref().unwrap()
    }

    async fn connected(policy: ChainChangePolicy, chain_id: u64) -> Self {
        let harness = Self::new(policy);
        harness
            .mock()
            .reply(methods::REQUEST_ACCOUNTS, json!([ALICE]))
            .reply(methods::CHAIN_ID, json!(chain_id_hex(chain_id)));
        harness.manager.connect().await.unwrap();
        harness
    }
}

fn chain_id_hex(chain_id: u64) -> String {
    format!("0x{:x}", chain_id)
}

fn without_provider() -> ConnectionManager<MockProvider> {
    ConnectionManager::new(None, SessionStore::new())
}

// region: --- connect / disconnect

#[tokio::test]
async fn test_connect_publishes_connecting_then_connected() {
    let harness = Harness::new(ChainChangePolicy::Reload);
    harness
        .mock()
        .reply(methods::REQUEST_ACCOUNTS, json!([ALICE, BOB]))
        .reply(methods::CHAIN_ID, json!("0x1"));
    let updates = harness.manager.store().subscribe();

    let session = harness.manager.connect().await.unwrap();

    assert_eq!(session.account(), Some(ALICE));
    assert_eq!(session.chain_id(), Some(1));
    assert_eq!(session.provider().map(|p| p.name.as_str()), Some("MetaMask"));

    let states: Vec<ConnectionState> = std::iter::from_fn(|| updates.try_recv().ok())
        .map(|snapshot| snapshot.session.state())
        .collect();
    assert_eq!(
        states,
        vec![
            ConnectionState::Disconnected,
            ConnectionState::Connecting,
            ConnectionState::Connected
        ]
    );
}

#[tokio::test]
async fn test_connect_rejected_by_user_leaves_disconnected() {
    let harness = Harness::new(ChainChangePolicy::Reload);
    harness
        .mock()
        .fail(methods::REQUEST_ACCOUNTS, 4001, "User rejected the request.");

    let err = harness.manager.connect().await.unwrap_err();

    assert!(matches!(err, WalletError::UserRejected(_)));
    assert_eq!(harness.manager.session(), Session::disconnected());
    assert_eq!(harness.mock().call_count(methods::CHAIN_ID), 0);
}

#[tokio::test]
async fn test_connect_with_empty_account_list() {
    let harness = Harness::new(ChainChangePolicy::Reload);
    harness.mock().reply(methods::REQUEST_ACCOUNTS, json!([]));

    let err = harness.manager.connect().await.unwrap_err();

    assert_eq!(err, WalletError::NoAccountsReturned);
    assert_eq!(harness.manager.session().state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_connect_failure_after_accounts_leaves_disconnected() {
    let harness = Harness::new(ChainChangePolicy::Reload);
    harness
        .mock()
        .reply(methods::REQUEST_ACCOUNTS, json!([ALICE]))
        .fail(methods::CHAIN_ID, -32603, "Internal JSON-RPC error.");

    let err = harness.manager.connect().await.unwrap_err();

    assert_eq!(err.user_message(), "Internal JSON-RPC error.");
    assert_eq!(harness.manager.session(), Session::disconnected());
}

#[tokio::test]
async fn test_connect_without_provider() {
    let manager = without_provider();
    assert!(!manager.is_provider_installed());
    assert_eq!(manager.connect().await.unwrap_err(), WalletError::ProviderMissing);
    assert_eq!(
        manager.switch_network(1).await.unwrap_err(),
        WalletError::ProviderMissing
    );
    assert_eq!(manager.session(), Session::disconnected());
}

#[tokio::test]
async fn test_connect_when_connected_does_not_prompt_again() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 1).await;

    let session = harness.manager.connect().await.unwrap();

    assert_eq!(session.account(), Some(ALICE));
    assert_eq!(harness.mock().call_count(methods::REQUEST_ACCOUNTS), 1);
}

#[tokio::test]
async fn test_disconnect_clears_session_and_provider_handle() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 1).await;
    assert!(harness.manager.provider().is_some());

    harness.manager.disconnect();
    harness.manager.disconnect();

    assert_eq!(harness.manager.session(), Session::default());
    assert!(harness.manager.provider().is_none());
}

// endregion: --- connect / disconnect

// region: --- in-flight guard

#[tokio::test]
async fn test_second_operation_fails_fast_while_one_is_pending() {
    let harness = Harness::new(ChainChangePolicy::Reload);
    harness.mock().reply(methods::SWITCH_CHAIN, Value::Null);

    {
        let _pending = harness.manager.begin(Operation::Connect).unwrap();
        assert_eq!(
            harness.manager.connect().await.unwrap_err(),
            WalletError::OperationInFlight("connect")
        );
        assert_eq!(
            harness.manager.switch_network(137).await.unwrap_err(),
            WalletError::OperationInFlight("connect")
        );
        assert!(harness.mock().methods().is_empty());
    }

    harness.manager.switch_network(137).await.unwrap();
    assert_eq!(harness.mock().call_count(methods::SWITCH_CHAIN), 1);
}

#[tokio::test]
async fn test_failed_operation_releases_guard() {
    let harness = Harness::new(ChainChangePolicy::Reload);
    harness
        .mock()
        .fail(methods::REQUEST_ACCOUNTS, 4001, "User rejected the request.");

    assert!(harness.manager.connect().await.is_err());
    assert!(harness.manager.in_flight.get().is_none());
    assert!(matches!(
        harness.manager.connect().await.unwrap_err(),
        WalletError::UserRejected(_)
    ));
}

// endregion: --- in-flight guard

// region: --- switch_network

#[tokio::test]
async fn test_switch_network_leaves_session_to_chain_event() {
    let harness = Harness::connected(ChainChangePolicy::Resync, 1).await;
    harness.mock().reply(methods::SWITCH_CHAIN, Value::Null);

    harness.manager.switch_network(137).await.unwrap();

    assert_eq!(
        harness.mock().params(methods::SWITCH_CHAIN, 0).unwrap(),
        json!([{ "chainId": "0x89" }])
    );
    assert_eq!(harness.mock().call_count(methods::ADD_CHAIN), 0);
    assert_eq!(harness.manager.session().chain_id(), Some(1));

    harness
        .manager
        .handle_event(ProviderEvent::ChainChanged(137))
        .await;
    assert_eq!(harness.manager.session().chain_id(), Some(137));
}

#[tokio::test]
async fn test_switch_to_unknown_chain_adds_it_then_retries_once() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 1).await;
    harness
        .mock()
        .fail(methods::SWITCH_CHAIN, 4902, "Unrecognized chain ID \"0x89\".")
        .reply(methods::SWITCH_CHAIN, Value::Null)
        .reply(methods::ADD_CHAIN, Value::Null);

    harness.manager.switch_network(137).await.unwrap();

    let mock = harness.mock();
    assert_eq!(mock.call_count(methods::ADD_CHAIN), 1);
    assert_eq!(mock.call_count(methods::SWITCH_CHAIN), 2);

    let added = mock.params(methods::ADD_CHAIN, 0).unwrap();
    assert_eq!(added[0]["chainId"], "0x89");
    assert_eq!(added[0]["chainName"], "Polygon Mainnet");
    assert_eq!(added[0]["nativeCurrency"]["symbol"], "MATIC");
    assert_eq!(added[0]["nativeCurrency"]["decimals"], 18);
}

#[tokio::test]
async fn test_switch_to_unknown_unsupported_chain_does_not_add() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 1).await;
    harness
        .mock()
        .fail(methods::SWITCH_CHAIN, 4902, "Unrecognized chain ID \"0x270f\".");

    let err = harness.manager.switch_network(9999).await.unwrap_err();

    assert_eq!(err, WalletError::NetworkUnsupported(9999));
    assert_eq!(harness.mock().call_count(methods::ADD_CHAIN), 0);
}

#[tokio::test]
async fn test_switch_still_unrecognized_after_add() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 1).await;
    harness
        .mock()
        .fail(methods::SWITCH_CHAIN, 4902, "Unrecognized chain ID \"0x89\".")
        .reply(methods::ADD_CHAIN, Value::Null);

    let err = harness.manager.switch_network(137).await.unwrap_err();

    assert_eq!(err, WalletError::UnrecognizedChain(137));
    assert_eq!(harness.mock().call_count(methods::ADD_CHAIN), 1);
    assert_eq!(harness.mock().call_count(methods::SWITCH_CHAIN), 2);
}

#[tokio::test]
async fn test_switch_rejected_by_user() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 1).await;
    harness
        .mock()
        .fail(methods::SWITCH_CHAIN, 4001, "User rejected the request.");

    let err = harness.manager.switch_network(137).await.unwrap_err();

    assert!(matches!(err, WalletError::UserRejected(_)));
    assert_eq!(harness.mock().call_count(methods::ADD_CHAIN), 0);
    assert_eq!(harness.manager.session().chain_id(), Some(1));
}

#[tokio::test]
async fn test_add_chain_rejected_by_user() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 1).await;
    harness
        .mock()
        .fail(methods::SWITCH_CHAIN, 4902, "Unrecognized chain ID \"0x5\".")
        .fail(methods::ADD_CHAIN, 4001, "User rejected the request.");

    let err = harness.manager.switch_network(5).await.unwrap_err();

    assert!(matches!(err, WalletError::UserRejected(_)));
    assert_eq!(harness.mock().call_count(methods::SWITCH_CHAIN), 1);
}

// endregion: --- switch_network

// region: --- provider events

#[tokio::test]
async fn test_empty_accounts_event_resets_session() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 137).await;

    harness
        .manager
        .handle_event(ProviderEvent::AccountsChanged(vec![]))
        .await;

    assert_eq!(harness.manager.session(), Session::default());
}

#[tokio::test]
async fn test_account_switch_keeps_chain_and_provider() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 137).await;
    let before = harness.manager.session();

    harness
        .manager
        .handle_event(ProviderEvent::AccountsChanged(vec![BOB.to_string()]))
        .await;

    let after = harness.manager.session();
    assert_eq!(after.account(), Some(BOB));
    assert_eq!(after.chain_id(), Some(137));
    assert_eq!(after.provider(), before.provider());
    assert_eq!(harness.reloads.get(), 0);
}

#[tokio::test]
async fn test_session_follows_most_recent_accounts_event() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 1).await;
    let sequences = [
        vec![BOB.to_string(), ALICE.to_string()],
        vec![ALICE.to_string()],
        vec![BOB.to_string()],
    ];

    for accounts in sequences {
        let first = accounts[0].clone();
        harness
            .manager
            .handle_event(ProviderEvent::AccountsChanged(accounts))
            .await;
        assert_eq!(harness.manager.session().account(), Some(first.as_str()));
    }
    assert_eq!(harness.manager.session().chain_id(), Some(1));
}

#[tokio::test]
async fn test_accounts_event_after_disconnect_stays_disconnected() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 1).await;
    harness.manager.disconnect();
    let chain_calls = harness.mock().call_count(methods::CHAIN_ID);

    harness
        .manager
        .handle_event(ProviderEvent::AccountsChanged(vec![BOB.to_string()]))
        .await;

    let session = harness.manager.session();
    assert_eq!(session.state(), ConnectionState::Disconnected);
    assert_eq!(session.account(), None);
    assert!(harness.manager.provider().is_none());
    assert_eq!(harness.mock().call_count(methods::CHAIN_ID), chain_calls);
}

#[tokio::test]
async fn test_chain_change_reloads_exactly_once() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 1).await;
    let epoch = harness.manager.store().epoch();

    harness
        .manager
        .handle_event(ProviderEvent::ChainChanged(137))
        .await;

    assert_eq!(harness.reloads.get(), 1);
    assert_eq!(harness.manager.store().epoch(), epoch + 1);
    assert_eq!(harness.manager.session().chain_id(), Some(137));
    assert_eq!(harness.manager.session().account(), Some(ALICE));
}

#[tokio::test]
async fn test_chain_change_resync_bumps_epoch_without_reload() {
    let harness = Harness::connected(ChainChangePolicy::Resync, 1).await;
    let updates = harness.manager.store().subscribe();
    let _ = updates.try_recv();

    harness
        .manager
        .handle_event(ProviderEvent::ChainChanged(1))
        .await;

    assert_eq!(harness.reloads.get(), 0);
    let snapshot = updates.try_recv().unwrap();
    assert_eq!(snapshot.epoch, 1);
    assert_eq!(snapshot.session.chain_id(), Some(1));
}

#[tokio::test]
async fn test_chain_change_while_disconnected() {
    let harness = Harness::new(ChainChangePolicy::Resync);

    harness
        .manager
        .handle_event(ProviderEvent::ChainChanged(137))
        .await;

    assert_eq!(harness.manager.session(), Session::disconnected());
    assert_eq!(harness.manager.store().epoch(), 1);
}

#[tokio::test]
async fn test_events_are_applied_in_order_and_listeners_removed() {
    let harness = Harness::connected(ChainChangePolicy::Resync, 1).await;
    let events = harness.manager.subscribe_events().unwrap();
    let mock = harness.mock();

    mock.emit(ProviderEvent::ChainChanged(137));
    mock.emit(ProviderEvent::AccountsChanged(vec![BOB.to_string()]));
    mock.emit(ProviderEvent::ChainChanged(5));
    mock.close_events();

    harness.manager.run_events(events).await;

    let session = harness.manager.session();
    assert_eq!(session.account(), Some(BOB));
    assert_eq!(session.chain_id(), Some(5));
    assert_eq!(harness.manager.store().epoch(), 2);
    assert!(mock.was_unsubscribed());
}

#[tokio::test]
async fn test_dropping_subscription_removes_listeners() {
    let harness = Harness::new(ChainChangePolicy::Reload);
    let events = harness.manager.subscribe_events().unwrap();
    assert!(!harness.mock().was_unsubscribed());

    drop(events);

    assert!(harness.mock().was_unsubscribed());
    assert!(without_provider().subscribe_events().is_err());
}

// endregion: --- provider events

// region: --- restore / accessors

#[tokio::test]
async fn test_restore_session_uses_authorized_accounts_without_prompt() {
    let harness = Harness::new(ChainChangePolicy::Reload);
    harness
        .mock()
        .reply(methods::ACCOUNTS, json!([ALICE]))
        .reply(methods::CHAIN_ID, json!("0x89"));

    let restored = harness.manager.restore_session().await.unwrap().unwrap();

    assert_eq!(restored.account(), Some(ALICE));
    assert_eq!(restored.chain_id(), Some(137));
    assert_eq!(harness.manager.session(), restored);
    assert_eq!(harness.mock().call_count(methods::REQUEST_ACCOUNTS), 0);
}

#[tokio::test]
async fn test_restore_session_with_nothing_authorized() {
    let harness = Harness::new(ChainChangePolicy::Reload);
    harness.mock().reply(methods::ACCOUNTS, json!([]));

    assert_eq!(harness.manager.restore_session().await.unwrap(), None);
    assert_eq!(harness.manager.session(), Session::disconnected());

    assert_eq!(without_provider().restore_session().await.unwrap(), None);
}

#[tokio::test]
async fn test_current_network_rejects_unsupported_chain() {
    let harness = Harness::connected(ChainChangePolicy::Reload, 9999).await;

    assert_eq!(
        harness.manager.current_network().unwrap_err(),
        WalletError::NetworkUnsupported(9999)
    );
    // session itself is kept
    assert_eq!(harness.manager.session().chain_id(), Some(9999));
    assert!(harness.manager.session().is_connected());

    let harness = Harness::connected(ChainChangePolicy::Reload, 11155111).await;
    let network = harness.manager.current_network().unwrap().unwrap();
    assert_eq!(network.name, "Sepolia Testnet");
    assert!(without_provider().current_network().unwrap().is_none());
}

#[tokio::test]
async fn test_token_binding_signs_with_session_account() {
    const TOKEN: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    let harness = Harness::new(ChainChangePolicy::Reload);
    assert!(harness.manager.token(TOKEN).unwrap().signer().is_none());
    assert!(harness.manager.token("0xnope").is_err());

    let harness = Harness::connected(ChainChangePolicy::Reload, 1).await;
    let token = harness.manager.token(TOKEN).unwrap();
    assert_eq!(token.signer().map(|a| a.to_string().to_lowercase()), Some(ALICE.to_string()));

    assert!(matches!(
        without_provider().token(TOKEN),
        Err(WalletError::ProviderMissing)
    ));
}

// endregion: --- restore / accessors
