//! Audit transport tests against a local stand-in for the bus REST proxy.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::routing::post;
use axum::Router;
use ip_whitelist::audit::{
    AuditLogger, AuditMessage, BusPublisher, Delivery, LogLevel, Transport, BUS_CONTENT_TYPE,
};
use ip_whitelist::http::{router, AppState};
use ip_whitelist::models::build_whitelist;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// (topic, content type, body) of every POST the stub received.
type Received = Arc<Mutex<Vec<(String, String, serde_json::Value)>>>;

async fn receive(
    State(received): State<Received>,
    Path(topic): Path<String>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let json = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    received
        .lock()
        .expect("lock")
        .push((topic, content_type, json));
    StatusCode::OK
}

async fn spawn_stub(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    addr
}

async fn spawn_bus() -> (SocketAddr, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/topics/{topic}", post(receive))
        .with_state(received.clone());
    (spawn_stub(app).await, received)
}

fn publisher(addr: SocketAddr) -> BusPublisher {
    BusPublisher::new(&format!("http://{addr}"), Duration::from_secs(5), false)
        .expect("client builds")
}

fn message(key: LogLevel) -> AuditMessage {
    AuditMessage {
        topic: "ip-whitelist".to_string(),
        partition: 0,
        key,
        value: r#"{"address":"1.2.3.4","allow":true}"#.to_string(),
    }
}

#[tokio::test]
async fn test_publish_record_format() {
    let (addr, received) = spawn_bus().await;
    let transport = Transport::Bus(publisher(addr));

    assert_eq!(
        transport.deliver(&message(LogLevel::Warn)).await,
        Delivery::Published
    );

    let received = received.lock().expect("lock");
    assert_eq!(received.len(), 1);
    let (topic, content_type, body) = &received[0];
    assert_eq!(topic, "ip-whitelist");
    assert_eq!(content_type, BUS_CONTENT_TYPE);
    assert_eq!(body["records"][0]["key"], "warn");
    assert_eq!(body["records"][0]["partition"], 0);
    assert_eq!(
        body["records"][0]["value"],
        r#"{"address":"1.2.3.4","allow":true}"#
    );
}

#[tokio::test]
async fn test_bus_error_status_falls_back() {
    let app = Router::new().route(
        "/topics/{topic}",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let addr = spawn_stub(app).await;
    let transport = Transport::Bus(publisher(addr));

    assert_eq!(
        transport.deliver(&message(LogLevel::Info)).await,
        Delivery::Fallback
    );
}

#[tokio::test]
async fn test_decisions_reach_the_bus_in_order() {
    let (addr, received) = spawn_bus().await;
    let (audit, worker) = AuditLogger::start(Transport::Bus(publisher(addr)), "decisions");
    let whitelist = build_whitelist(Some("10.0.0.0-10.0.0.255")).expect("valid whitelist");
    let app = router(Arc::new(AppState::new(whitelist, audit)));

    for uri in [
        "/v1/verify/10.0.0.7",
        "/v1/verify/10.0.1.7",
        "/v1/verify/bogus",
        "/v1/verify/%FF",
    ] {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        app.clone().oneshot(request).await.expect("router is infallible");
    }
    drop(app);
    worker.await.expect("worker drains and stops");

    let received = received.lock().expect("lock");
    assert_eq!(received.len(), 4, "one audit message per request");

    let records: Vec<(serde_json::Value, serde_json::Value)> = received
        .iter()
        .map(|(topic, _, body)| {
            assert_eq!(topic, "decisions");
            let record = &body["records"][0];
            let value: serde_json::Value =
                serde_json::from_str(record["value"].as_str().expect("value is JSON text"))
                    .expect("record JSON");
            (record["key"].clone(), value)
        })
        .collect();

    assert_eq!(records[0].0, "info");
    assert_eq!(records[0].1["address"], "10.0.0.7");
    assert_eq!(records[0].1["allow"], true);
    assert_eq!(records[1].1["address"], "10.0.1.7");
    assert_eq!(records[1].1["allow"], false);
    assert_eq!(records[2].0, "warn");
    assert_eq!(records[2].1["address"], "bogus");
    assert_eq!(records[2].1["error"], "Invalid IPv4 address: \"bogus\"");
    assert_eq!(records[3].0, "warn");
    assert_eq!(records[3].1["address"], "%FF");
    assert_eq!(records[3].1["error"], "Invalid IPv4 address: \"%FF\"");
}
