use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use armada_chain::{DynSolValue, MockChain, MockSigner, RecordedCall};
use armada_sdk::{
    Address, AllowancePolicy, ContractAddresses, GameClient, GameEvent, Network, Operation,
    Receipt, SdkConfig, SdkError, Signer, SpendRule, TransportError, U256, voyage_flow,
};

fn owner() -> Address {
    Address::repeat_byte(0xaa)
}

fn contracts() -> ContractAddresses {
    ContractAddresses {
        game_token: Address::repeat_byte(0x11),
        core_game: Address::repeat_byte(0x22),
        ship_registry: Address::repeat_byte(0x33),
        pirate_pool: Address::repeat_byte(0x44),
    }
}

fn client(chain: &MockChain) -> GameClient {
    GameClient::builder()
        .config(SdkConfig::new(Network::Local, contracts()))
        .transport(chain.transport())
        .build()
        .expect("client should build")
}

fn uint(v: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(v), 256)
}

fn spender() -> Address {
    contracts().core_game
}

/// Scenario A: allowance 0, wager 10.
///
/// Expect `approve(coreGame, 10)` then `voyage(shipId, 10)`, each awaited, and
/// the returned receipt belonging to the voyage transaction.
#[tokio::test]
async fn test_voyage_with_zero_allowance_approves_then_sails() {
    let chain = MockChain::new();
    let client = client(&chain);
    let signer = MockSigner::new(owner());

    let receipt = client
        .voyage(Some(&signer), U256::from(7u64), U256::from(10u64))
        .await
        .expect("voyage should settle");

    assert_eq!(
        chain.submissions(),
        vec![
            ("approve".to_string(), vec![DynSolValue::Address(spender()), uint(10)]),
            ("voyage".to_string(), vec![uint(7), uint(10)]),
        ]
    );

    let kinds: Vec<&str> = chain
        .calls()
        .iter()
        .map(|call| match call {
            RecordedCall::Read { .. } => "read",
            RecordedCall::Submit { .. } => "submit",
            RecordedCall::Wait { .. } => "wait",
            RecordedCall::ChainId => "chain_id",
        })
        .collect();
    assert_eq!(kinds, vec!["read", "submit", "wait", "submit", "wait"]);

    let waits: Vec<_> = chain
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            RecordedCall::Wait { hash } => Some(hash),
            _ => None,
        })
        .collect();
    assert_eq!(receipt.transaction_hash, waits[1]);
    assert_ne!(receipt.transaction_hash, waits[0]);
}

#[tokio::test]
async fn test_voyage_with_sufficient_allowance_skips_approval() {
    let chain = MockChain::new();
    chain.set_allowance(owner(), spender(), U256::from(10u64));
    let client = client(&chain);
    let signer = MockSigner::new(owner());

    client
        .voyage(Some(&signer), U256::from(7u64), U256::from(10u64))
        .await
        .expect("voyage should settle");

    assert_eq!(chain.submitted_functions(), vec!["voyage"]);
    assert_eq!(chain.read_count("allowance"), 1);
}

/// Scenario B: upgrading a ship with itself is rejected before any call.
#[tokio::test]
async fn test_upgrade_same_ship_rejected_without_calls() {
    let chain = MockChain::new();
    let client = client(&chain);
    let signer = MockSigner::new(owner());

    let err = client
        .upgrade_ship(Some(&signer), U256::from(5u64), U256::from(5u64))
        .await
        .expect_err("same-id upgrade must fail");

    assert!(matches!(err, SdkError::InvalidArgument(_)));
    assert!(err.to_string().contains("same ship"));
    assert_eq!(chain.call_count(), 0);
}

/// The signer is resolved before the ship ids are compared.
#[tokio::test]
async fn test_upgrade_same_ship_without_signer_reports_missing_signer() {
    let chain = MockChain::new();
    let client = client(&chain);

    let err = client
        .upgrade_ship(None, U256::from(5u64), U256::from(5u64))
        .await
        .expect_err("upgrade without a signer must fail");

    assert!(matches!(err, SdkError::Configuration(ref m) if m.contains("signer required")));
    assert_eq!(chain.call_count(), 0);
}

/// Scenario C: a placeholder core-game address stops construction.
#[tokio::test]
async fn test_placeholder_address_fails_construction() {
    let chain = MockChain::new();
    let mut addresses = contracts();
    addresses.core_game = Address::ZERO;

    let result = GameClient::builder()
        .config(SdkConfig::new(Network::Local, addresses))
        .transport(chain.transport())
        .build();

    assert!(matches!(result, Err(SdkError::Configuration(_))));
    assert_eq!(chain.call_count(), 0);
}

#[tokio::test]
async fn test_signer_without_address_fails_every_operation() {
    let chain = MockChain::new();
    let client = client(&chain);
    let signer = MockSigner::without_address();
    let s: Option<&dyn Signer> = Some(&signer);

    let results = vec![
        client.buy_ship(s, None, None).await,
        client.voyage(s, U256::from(1u64), U256::from(10u64)).await,
        client.upgrade_ship(s, U256::from(1u64), U256::from(2u64)).await,
        client.finish_day(s).await,
        client.claim_winner_reward(s).await,
    ];

    for result in results {
        assert!(
            matches!(result, Err(SdkError::Configuration(ref m)) if m.contains("signer required")),
            "unexpected result: {result:?}"
        );
    }
    assert_eq!(chain.call_count(), 0);
}

#[tokio::test]
async fn test_missing_signer_is_configuration_error() {
    let chain = MockChain::new();
    let client = client(&chain);

    let result = client.finish_day(None).await;

    assert!(matches!(result, Err(SdkError::Configuration(_))));
    assert_eq!(chain.call_count(), 0);
}

#[tokio::test]
async fn test_default_signer_is_used_when_none_given() {
    let chain = MockChain::new();
    let client = GameClient::builder()
        .config(SdkConfig::new(Network::Local, contracts()))
        .transport(chain.transport())
        .signer(Arc::new(MockSigner::new(owner())))
        .build()
        .expect("client should build");

    client.buy_ship(None, None, None).await.expect("buy should settle");

    let from = chain.calls().into_iter().find_map(|call| match call {
        RecordedCall::Submit { from, args, .. } => Some((from, args)),
        _ => None,
    });
    assert_eq!(
        from,
        Some((owner(), vec![DynSolValue::Uint(U256::from(1u64), 8), uint(1)]))
    );
}

#[tokio::test]
async fn test_listener_receives_the_callers_receipt_once() {
    let chain = MockChain::new();
    chain.set_allowance(owner(), spender(), U256::from(100u64));
    let client = client(&chain);
    let signer = MockSigner::new(owner());

    let seen: Arc<Mutex<Vec<Receipt>>> = Arc::default();
    for _ in 0..2 {
        let seen = Arc::clone(&seen);
        client.on(GameEvent::VoyageExecuted, move |receipt| {
            seen.lock().unwrap().push(receipt.clone());
        });
    }
    let unrelated = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&unrelated);
    client.on(GameEvent::ShipPurchased, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let receipt = client
        .voyage(Some(&signer), U256::from(1u64), U256::from(10u64))
        .await
        .expect("voyage should settle");

    assert_eq!(*seen.lock().unwrap(), vec![receipt.clone(), receipt]);
    assert_eq!(unrelated.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_each_operation_emits_its_event() {
    let chain = MockChain::new();
    let client = client(&chain);
    let signer = MockSigner::new(owner());

    let seen: Arc<Mutex<Vec<GameEvent>>> = Arc::default();
    for event in [
        GameEvent::ShipPurchased,
        GameEvent::ShipUpgraded,
        GameEvent::DayFinished,
        GameEvent::WinnerClaimed,
    ] {
        let seen = Arc::clone(&seen);
        client.on(event, move |_| seen.lock().unwrap().push(event));
    }

    client.buy_ship(Some(&signer), Some(2), Some(1)).await.unwrap();
    client
        .upgrade_ship(Some(&signer), U256::from(1u64), U256::from(2u64))
        .await
        .unwrap();
    client.finish_day(Some(&signer)).await.unwrap();
    client.claim_winner_reward(Some(&signer)).await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            GameEvent::ShipPurchased,
            GameEvent::ShipUpgraded,
            GameEvent::DayFinished,
            GameEvent::WinnerClaimed,
        ]
    );
}

#[tokio::test]
async fn test_panicking_listener_does_not_fail_operation() {
    let chain = MockChain::new();
    let client = client(&chain);
    let signer = MockSigner::new(owner());

    client.on(GameEvent::DayFinished, |_| panic!("listener failure"));
    let after = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&after);
    client.on(GameEvent::DayFinished, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let receipt = client.finish_day(Some(&signer)).await;

    assert!(receipt.is_ok());
    assert_eq!(after.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_removed_listener_is_not_called() {
    let chain = MockChain::new();
    let client = client(&chain);
    let signer = MockSigner::new(owner());

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let id = client.on(GameEvent::WinnerClaimed, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert!(client.off(id));

    client.claim_winner_reward(Some(&signer)).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// Approval settles, the voyage submission fails; the retry must not approve again.
#[tokio::test]
async fn test_retry_after_failed_voyage_does_not_reapprove() {
    let chain = MockChain::new();
    chain.fail_next_submit("voyage", "connection reset");
    let client = client(&chain);
    let signer = MockSigner::new(owner());

    let err = client
        .voyage(Some(&signer), U256::from(3u64), U256::from(10u64))
        .await
        .expect_err("first voyage should fail");
    assert!(matches!(err, SdkError::Transport(TransportError::Network(_))));
    assert_eq!(err.to_string(), "Network error: connection reset");

    client
        .voyage(Some(&signer), U256::from(3u64), U256::from(10u64))
        .await
        .expect("retry should settle");

    assert_eq!(
        chain.submitted_functions(),
        vec!["approve", "voyage", "voyage"]
    );
    assert_eq!(chain.read_count("allowance"), 2);
}

#[tokio::test]
async fn test_empty_receipt_fails_without_event() {
    let chain = MockChain::new();
    chain.drop_next_receipt("finishDay");
    let client = client(&chain);
    let signer = MockSigner::new(owner());

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    client.on(GameEvent::DayFinished, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let result = client.finish_day(Some(&signer)).await;

    assert!(matches!(result, Err(SdkError::TransactionFailure(_))));
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reverted_receipt_passes_through() {
    let chain = MockChain::new();
    chain.revert_next("upgradeShip");
    let client = client(&chain);
    let signer = MockSigner::new(owner());

    let result = client
        .upgrade_ship(Some(&signer), U256::from(1u64), U256::from(2u64))
        .await;

    assert!(matches!(
        result,
        Err(SdkError::Transport(TransportError::Reverted(_)))
    ));
}

#[tokio::test]
async fn test_ship_price_policy_approves_before_purchase() {
    let chain = MockChain::new();
    chain.set_read("getShipPrice", uint(25));
    let client = GameClient::builder()
        .config(SdkConfig::new(Network::Local, contracts()))
        .transport(chain.transport())
        .policy(AllowancePolicy::default().with_rule(Operation::BuyShip, SpendRule::ShipPrice))
        .build()
        .expect("client should build");
    let signer = MockSigner::new(owner());

    client
        .buy_ship(Some(&signer), Some(1), Some(4))
        .await
        .expect("buy should settle");

    assert_eq!(
        chain.submissions(),
        vec![
            ("approve".to_string(), vec![DynSolValue::Address(spender()), uint(100)]),
            (
                "buyShip".to_string(),
                vec![DynSolValue::Uint(U256::from(1u64), 8), uint(4)]
            ),
        ]
    );
}

#[tokio::test]
async fn test_fixed_policy_on_finish_day() {
    let chain = MockChain::new();
    chain.set_allowance(owner(), spender(), U256::from(5u64));
    let client = GameClient::builder()
        .config(SdkConfig::new(Network::Local, contracts()))
        .transport(chain.transport())
        .policy(
            AllowancePolicy::empty()
                .with_rule(Operation::FinishDay, SpendRule::Fixed(U256::from(5u64))),
        )
        .build()
        .expect("client should build");
    let signer = MockSigner::new(owner());

    client.finish_day(Some(&signer)).await.unwrap();
    client
        .voyage(Some(&signer), U256::from(1u64), U256::from(50u64))
        .await
        .unwrap();

    // Voyage has no rule here, so only finishDay reads the allowance.
    assert_eq!(chain.read_count("allowance"), 1);
    assert_eq!(chain.submitted_functions(), vec!["finishDay", "voyage"]);
}

#[tokio::test]
async fn test_reads_pass_through() {
    let chain = MockChain::new();
    chain.set_read("balanceOf", uint(1_000));
    chain.set_read("decimals", DynSolValue::Uint(U256::from(18u64), 8));
    chain.set_read("hasPirate", DynSolValue::Bool(false));
    chain.set_read("getShipPrice", uint(25));
    let client = client(&chain);

    assert_eq!(client.token_balance(owner()).await.unwrap(), U256::from(1_000u64));
    assert_eq!(client.token_decimals().await.unwrap(), 18);
    assert!(!client.has_pirate(owner()).await.unwrap());
    assert_eq!(client.ship_price().await.unwrap(), U256::from(25u64));
    assert!(chain.submissions().is_empty());
}

#[tokio::test]
async fn test_client_flow_handle_uses_core_game_as_spender() {
    let chain = MockChain::new();
    let client = client(&chain);
    let signer = MockSigner::new(owner());

    let handle = client.flow_handle();
    assert_eq!(handle.spender(), spender());

    voyage_flow(&handle, Some(&signer), U256::from(2u64), U256::from(8u64))
        .await
        .expect("flow should settle");

    assert_eq!(chain.allowance_of(owner(), spender()), U256::from(8u64));
    assert_eq!(chain.submitted_functions(), vec!["approve", "voyage"]);
}

#[tokio::test]
async fn test_verify_network_compares_chain_ids() {
    let chain = MockChain::new();

    let testnet = GameClient::builder()
        .config(SdkConfig::new(Network::BscTestnet, contracts()))
        .transport(chain.transport())
        .build()
        .expect("client should build");
    testnet.verify_network().await.expect("mock chain is BSC testnet");

    let err = client(&chain)
        .verify_network()
        .await
        .expect_err("local network must not match");
    assert!(matches!(err, SdkError::Configuration(ref m) if m.contains("chain 97")));
}
