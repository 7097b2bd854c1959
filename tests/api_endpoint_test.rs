use axum::http::StatusCode;
use chrono::NaiveDate;
use cosmledger::api;
use cosmledger::db::init_db;
use cosmledger::domain::BalanceId;
use cosmledger::{
    AccountBalance, Address, Amount, BlockHeight, ChainId, Denom, EntityStore, PoolPosition,
    PositionId, ReferralBond, Repository, TimeMs,
};
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    repo: Arc<Repository>,
    _temp: TempDir,
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));
    let app = api::create_router(api::AppState::new(repo.clone()));

    TestApp {
        app,
        repo,
        _temp: temp_dir,
    }
}

async fn request(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn bond(account: &str, referrer: &str, height: i64) -> ReferralBond {
    ReferralBond {
        id: Address::new(account),
        referrer: referrer.to_string(),
        height: BlockHeight::new(height),
        ts: TimeMs::new(1_700_000_000_000 + height),
    }
}

#[tokio::test]
async fn test_health_and_ready() {
    let test_app = setup_test_app().await;

    let (status, body) = request(test_app.app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = request(test_app.app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_balances_serialized_as_strings() {
    let test_app = setup_test_app().await;
    test_app
        .repo
        .put_balance(&AccountBalance {
            id: BalanceId("osmo1alice".to_string()),
            address: Address::new("osmo1alice"),
            balance: Amount::from_str("340282366920938463463374607431768211456").unwrap(),
            last_height: BlockHeight::new(12),
            last_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            chain_id: ChainId::new("osmosis-1"),
            denom: Denom::new("uosmo"),
        })
        .await
        .unwrap();

    let (status, body) = request(test_app.app, "/v1/balances/osmo1alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "osmo1alice");
    let entry = &body["balances"][0];
    assert_eq!(entry["balance"], "340282366920938463463374607431768211456");
    assert_eq!(entry["denom"], "uosmo");
    assert_eq!(entry["chainId"], "osmosis-1");
    assert_eq!(entry["lastHeight"], 12);
    assert_eq!(entry["lastDate"], "2024-06-01");
}

#[tokio::test]
async fn test_unknown_balance_is_404() {
    let test_app = setup_test_app().await;
    let (status, body) = request(test_app.app, "/v1/balances/osmo1nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("osmo1nobody"));
}

#[tokio::test]
async fn test_bond_and_referrals() {
    let test_app = setup_test_app().await;
    test_app.repo.create_bond(&bond("osmo1alice", "osmo1ref", 10)).await.unwrap();
    test_app.repo.create_bond(&bond("osmo1bob", "osmo1ref", 11)).await.unwrap();

    let (status, body) = request(test_app.app.clone(), "/v1/bonds/osmo1alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["referrer"], "osmo1ref");
    assert_eq!(body["height"], 10);

    let (status, _) = request(test_app.app.clone(), "/v1/bonds/osmo1carol").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(test_app.app, "/v1/referrals/osmo1ref").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["referralCount"], 2);
    assert_eq!(body["referrals"][0]["address"], "osmo1alice");
    assert_eq!(body["referrals"][1]["address"], "osmo1bob");
}

#[tokio::test]
async fn test_positions_endpoints() {
    let test_app = setup_test_app().await;
    let open = PoolPosition::open(
        PositionId::composite("1066", "1"),
        "1066".to_string(),
        BlockHeight::new(100),
        TimeMs::new(5_000),
    );
    let mut closed = PoolPosition::open(
        PositionId::composite("1066", "2"),
        "1066".to_string(),
        BlockHeight::new(101),
        TimeMs::new(6_000),
    );
    closed.close(BlockHeight::new(150), TimeMs::new(9_000));
    test_app.repo.create_position(&open).await.unwrap();
    test_app.repo.create_position(&closed).await.unwrap();

    let (status, body) = request(test_app.app.clone(), "/v1/positions/1066_2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "closed");
    assert_eq!(body["closedHeight"], 150);
    assert_eq!(body["closedAt"], 9_000);

    let (status, body) = request(test_app.app.clone(), "/v1/positions/1066_1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "open");
    assert!(body.get("closedHeight").is_none());

    let (status, body) = request(test_app.app, "/v1/pools/1066/positions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["poolId"], "1066");
    assert_eq!(body["openCount"], 1);
    assert_eq!(body["positions"].as_array().unwrap().len(), 2);
}
