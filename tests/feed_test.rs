mod common;

use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use qrispay::domain::ports::MutationFeed;
use qrispay::infrastructure::okeconnect::HttpMutationFeed;
use qrispay::{SettlementCheck, SettlementPoller, SettlementStatus};
use std::time::Duration;

const HISTORY: &str = r#"{"status":"success","data":[
    {"date":"2025-01-01 10:00:00","amount":"Rp 5.000","type":"CR","brand_name":"OVO"},
    {"date":"2025-01-01 10:02:00","amount":"Rp 10.000","type":"CR","brand_name":"DANA"},
    {"date":"2025-01-01 10:04:00","amount":20099,"type":"CR","brand_name":"GOPAY"}
]}"#;

async fn poller_for(app: Router, timeout: Duration) -> SettlementPoller {
    let base_url = common::spawn_feed(app).await;
    let feed = HttpMutationFeed::new(base_url, timeout).unwrap();
    SettlementPoller::with_timeout(Box::new(feed), timeout)
}

#[tokio::test]
async fn test_formatted_amount_settles() {
    let poller = poller_for(
        common::fixed_feed(StatusCode::OK, HISTORY),
        Duration::from_secs(5),
    )
    .await;

    let check = poller.check_settlement("OK1", "token", "10000").await;
    assert_eq!(check.status, SettlementStatus::Success);

    let check = poller.check_settlement("OK1", "token", "20099").await;
    assert_eq!(check.status, SettlementStatus::Success);
}

#[tokio::test]
async fn test_unmatched_amount_is_pending() {
    let poller = poller_for(
        common::fixed_feed(StatusCode::OK, HISTORY),
        Duration::from_secs(5),
    )
    .await;

    let check = poller.check_settlement("OK1", "token", "10001").await;
    assert_eq!(check, SettlementCheck::pending());
}

#[tokio::test]
async fn test_empty_or_absent_data_is_pending() {
    for body in [r#"{"data":[]}"#, r#"{"status":"failed"}"#, r#"{"data":null}"#] {
        let poller = poller_for(
            common::fixed_feed(StatusCode::OK, body),
            Duration::from_secs(5),
        )
        .await;
        let check = poller.check_settlement("OK1", "token", "10000").await;
        assert_eq!(check, SettlementCheck::pending(), "body: {}", body);
    }
}

#[tokio::test]
async fn test_server_error_is_pending() {
    let poller = poller_for(
        common::fixed_feed(StatusCode::INTERNAL_SERVER_ERROR, HISTORY),
        Duration::from_secs(5),
    )
    .await;

    let check = poller.check_settlement("OK1", "token", "10000").await;
    assert_eq!(check, SettlementCheck::pending());
}

#[tokio::test]
async fn test_malformed_body_is_pending() {
    for body in ["<html>maintenance</html>", r#"{"data":"oops"}"#] {
        let poller = poller_for(
            common::fixed_feed(StatusCode::OK, body),
            Duration::from_secs(5),
        )
        .await;
        let check = poller.check_settlement("OK1", "token", "10000").await;
        assert_eq!(check, SettlementCheck::pending(), "body: {}", body);
    }
}

#[tokio::test]
async fn test_slow_feed_times_out_as_pending() {
    let poller = poller_for(
        common::slow_feed(Duration::from_secs(3), HISTORY),
        Duration::from_millis(200),
    )
    .await;

    let started = std::time::Instant::now();
    let check = poller.check_settlement("OK1", "token", "10000").await;
    assert_eq!(check, SettlementCheck::pending());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_unreachable_feed_is_pending() {
    let base_url = common::closed_port_url().await;
    let feed = HttpMutationFeed::new(base_url, Duration::from_secs(2)).unwrap();
    let poller = SettlementPoller::new(Box::new(feed));

    let check = poller.check_settlement("OK1", "token", "10000").await;
    assert_eq!(check, SettlementCheck::pending());
}

#[tokio::test]
async fn test_request_is_keyed_by_merchant_and_token() {
    let app = Router::new().route(
        common::FEED_PATH,
        get(|Path((merchant, token)): Path<(String, String)>| async move {
            if merchant == "OK1" && token == "secret" {
                (StatusCode::OK, r#"{"data":[{"amount":"15000"}]}"#)
            } else {
                (StatusCode::UNAUTHORIZED, r#"{"status":"failed"}"#)
            }
        }),
    );
    let base_url = common::spawn_feed(app).await;
    let feed = HttpMutationFeed::new(base_url, Duration::from_secs(5)).unwrap();

    let history = feed.fetch("OK1", "secret").await.unwrap();
    assert_eq!(history.data.unwrap().len(), 1);
    assert!(feed.fetch("OK1", "wrong").await.is_err());
}

#[tokio::test]
async fn test_credentials_reach_the_feed_as_single_segments() {
    let app = Router::new().route(
        common::FEED_PATH,
        get(|Path((merchant, token)): Path<(String, String)>| async move {
            if merchant == "OK 1" && token == "a/b?c#d" {
                (StatusCode::OK, r#"{"data":[{"amount":"15000"}]}"#)
            } else {
                (StatusCode::UNAUTHORIZED, r#"{"status":"failed"}"#)
            }
        }),
    );
    let base_url = common::spawn_feed(app).await;
    let feed = HttpMutationFeed::new(base_url, Duration::from_secs(5)).unwrap();

    let history = feed.fetch("OK 1", "a/b?c#d").await.unwrap();
    assert_eq!(history.data.unwrap().len(), 1);
}

#[tokio::test]
async fn test_whole_float_amount_settles() {
    let body = r#"{"data":[{"amount":null},{"amount":10000.0,"type":"CR"}]}"#;
    let poller = poller_for(
        common::fixed_feed(StatusCode::OK, body),
        Duration::from_secs(5),
    )
    .await;

    let check = poller.check_settlement("OK1", "token", "10000").await;
    assert_eq!(check.status, SettlementStatus::Success);
}
