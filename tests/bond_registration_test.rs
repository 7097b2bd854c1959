use chrono::{TimeZone, Utc};
use cosmledger::domain::BondExecution;
use cosmledger::projection::{BondOutcome, BondRegistrar};
use cosmledger::{Address, BlockHeader, BlockHeight, ChainId, EntityStore, MemoryStore, TimeMs};
use std::sync::Arc;

fn bond_at(height: i64, sender: &str, referral: Option<&str>) -> BondExecution {
    BondExecution {
        block: BlockHeader {
            height: BlockHeight::new(height),
            chain_id: ChainId::new("osmosis-1"),
            time: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, height as u32).unwrap(),
        },
        sender: Address::new(sender),
        referral: referral.map(str::to_string),
    }
}

fn setup() -> (Arc<MemoryStore>, BondRegistrar) {
    let store = Arc::new(MemoryStore::new());
    let registrar = BondRegistrar::new(store.clone());
    (store, registrar)
}

#[tokio::test]
async fn test_first_bond_records_referrer_and_block() {
    let (store, registrar) = setup();
    let msg = bond_at(10, "osmo1alice", Some("osmo1bob"));

    let outcome = registrar.project_bond_execution(&msg).await.unwrap();
    assert!(matches!(outcome, BondOutcome::Registered(_)));

    let bond = store
        .get_bond(&Address::new("osmo1alice"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bond.referrer, "osmo1bob");
    assert_eq!(bond.height, BlockHeight::new(10));
    assert_eq!(bond.ts, TimeMs::from(msg.block.time));
}

#[tokio::test]
async fn test_first_bond_wins() {
    let (store, registrar) = setup();
    registrar
        .project_bond_execution(&bond_at(10, "osmo1alice", Some("osmo1bob")))
        .await
        .unwrap();

    let outcome = registrar
        .project_bond_execution(&bond_at(20, "osmo1alice", Some("osmo1carol")))
        .await
        .unwrap();
    assert_eq!(outcome, BondOutcome::AlreadyBonded(Address::new("osmo1alice")));

    let bonds = store.bonds().await;
    assert_eq!(bonds.len(), 1);
    assert_eq!(bonds[0].referrer, "osmo1bob");
    assert_eq!(bonds[0].height, BlockHeight::new(10));
}

#[tokio::test]
async fn test_self_referral_creates_nothing() {
    let (store, registrar) = setup();

    let outcome = registrar
        .project_bond_execution(&bond_at(5, "osmo1alice", Some("osmo1alice")))
        .await
        .unwrap();
    assert_eq!(outcome, BondOutcome::SelfReferral(Address::new("osmo1alice")));
    assert!(store.bonds().await.is_empty());

    // A later valid bond is still accepted.
    let outcome = registrar
        .project_bond_execution(&bond_at(6, "osmo1alice", Some("osmo1bob")))
        .await
        .unwrap();
    assert!(matches!(outcome, BondOutcome::Registered(_)));
}

#[tokio::test]
async fn test_missing_referral_stored_as_empty_referrer() {
    let (store, registrar) = setup();
    registrar
        .project_bond_execution(&bond_at(7, "osmo1dave", None))
        .await
        .unwrap();

    let bond = store
        .get_bond(&Address::new("osmo1dave"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bond.referrer, "");
}
