#![allow(dead_code)]

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use std::time::Duration;

/// Static QRIS code of a test merchant, with a valid checksum.
pub const STATIC_QR: &str = "00020101021126660014ID.CO.QRIS.WWW01189360091530225914810215ID10200176114730303UMI5204581253033605802ID5916WARUNG SEDERHANA6008SURABAYA61056025163040439";

/// `STATIC_QR` bound to an amount of 5000.
pub const DYNAMIC_QR_5000: &str = "00020101021226660014ID.CO.QRIS.WWW01189360091530225914810215ID10200176114730303UMI520458125303360540450005802ID5916WARUNG SEDERHANA6008SURABAYA610560251630417EF";

pub const FEED_PATH: &str = "/api/mutasi/qris/{merchant}/{token}";

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_feed(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A feed answering every merchant with the same status and body.
pub fn fixed_feed(status: StatusCode, body: &'static str) -> Router {
    Router::new().route(FEED_PATH, get(move || async move { (status, body) }))
}

/// A feed that answers only after `delay`.
pub fn slow_feed(delay: Duration, body: &'static str) -> Router {
    Router::new().route(
        FEED_PATH,
        get(move || async move {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, body)
        }),
    )
}

/// Base URL on which nothing is listening.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
