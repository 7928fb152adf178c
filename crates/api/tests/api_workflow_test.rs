use async_trait::async_trait;
use kura_api::server::{self, AppState};
use kura_bridge::lifecycle::Lifecycle;
use kura_core::bridge::entity::{Command, Reply};
use kura_core::bridge::error::BridgeError;
use kura_core::bridge::port::CommandGateway;
use kura_core::config::SessionConfig;
use kura_session::{MemSession, ReferenceData};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Once};
use tokio::net::TcpListener;

fn sample_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/refdata.json")
}

// 帮助函数：在随机端口启动测试服务器，返回基地址
async fn spawn_test_server(gateway: Arc<dyn CommandGateway>) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = format!("http://{}", listener.local_addr()?);
    tokio::spawn(server::serve(listener, AppState::new(gateway), std::future::pending()));
    Ok(addr)
}

// 帮助函数：启动以样例数据为底的回环会话
async fn start_loopback() -> anyhow::Result<Lifecycle> {
    let config = SessionConfig {
        name: "API".into(),
        timeout_ms: 50,
        ..SessionConfig::default()
    };
    let path = sample_fixture();
    let lifecycle = Lifecycle::start(&config, move || {
        MemSession::open("API", ReferenceData::from_path(&path)?)
    })
    .await?;
    Ok(lifecycle)
}

// reqwest 未启用内置加密后端，进程内须先安装 ring 提供者
fn http_client() -> reqwest::Client {
    static CRYPTO: Once = Once::new();
    CRYPTO.call_once(|| {
        let installed = rustls::crypto::ring::default_provider().install_default().is_ok();
        assert!(installed || rustls::crypto::CryptoProvider::get_default().is_some());
    });
    reqwest::Client::new()
}

async fn get_json(client: &reqwest::Client, url: &str) -> anyhow::Result<(StatusCode, Value)> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    let body: Value = resp.json().await?;
    Ok((status, body))
}

fn field_set(body: &Value, field: &str) -> BTreeSet<String> {
    body.as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| match &item[field] {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn keys(obj: &Value) -> BTreeSet<String> {
    obj.as_object()
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default()
}

/// 用于模拟会话故障的网关
struct FailingGateway(BridgeError);

#[async_trait]
impl CommandGateway for FailingGateway {
    async fn submit(&self, _command: Command) -> Result<Reply, BridgeError> {
        Err(self.0.clone())
    }
}

#[tokio::test]
async fn test_refdata_workflow() -> anyhow::Result<()> {
    let lifecycle = start_loopback().await?;
    let base = spawn_test_server(Arc::new(lifecycle.bridge())).await?;
    let client = http_client();

    // 1. 不带参数列举全部交易员
    let (status, body) = get_json(&client, &format!("{}/api/trader", base)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field_set(&body, "mnem"), set(&["JTHOMAS", "SFLAYMAN", "WRAMIREZ"]));
    assert_eq!(keys(&body[0]), set(&["id", "mnem", "display", "email"]));

    // 2. 重复与未知助记符、未知参数
    let (status, body) = get_json(
        &client,
        &format!("{}/api/trader?mnem=WRAMIREZ&mnem=NOBODY&mnem=WRAMIREZ&foo=bar", base),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["email"], "wayne.ramirez@swirlyc.com");

    // 3. 账户与交易员互不混淆
    let (_, body) = get_json(&client, &format!("{}/api/accnt", base)).await?;
    assert_eq!(field_set(&body, "mnem"), set(&["DBRA", "DBRB"]));
    let (_, body) = get_json(&client, &format!("{}/api/accnt?mnem=WRAMIREZ", base)).await?;
    assert_eq!(body, Value::Array(vec![]));

    // 4. 合约全部字段
    let (status, body) = get_json(&client, &format!("{}/api/contr?mnem=USDJPY", base)).await?;
    assert_eq!(status, StatusCode::OK);
    let contr = &body[0];
    assert_eq!(keys(contr).len(), 15);
    assert_eq!(contr["id"], 3);
    assert_eq!(contr["asset"], "USD");
    assert_eq!(contr["ccy"], "JPY");
    assert_eq!(contr["tick_denom"], 100);
    assert_eq!(contr["price_dp"], 2);
    assert_eq!(contr["max_lots"], 10);

    lifecycle.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn test_view_query_branches() -> anyhow::Result<()> {
    let lifecycle = start_loopback().await?;
    let base = spawn_test_server(Arc::new(lifecycle.bridge())).await?;
    let client = http_client();

    // 都不给: 全部视图
    let (status, body) = get_json(&client, &format!("{}/api/view", base)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));

    // 只给合约
    let (_, body) = get_json(&client, &format!("{}/api/view?mnem=EURUSD", base)).await?;
    assert_eq!(field_set(&body, "settl_date"), set(&["20140302", "20140303"]));
    assert_eq!(field_set(&body, "cid"), set(&["1"]));
    let bids = &body[0]["list_bid"];
    assert_eq!(bids[0]["ticks"], 12344);
    assert_eq!(bids[1]["ticks"], 12343);
    assert_eq!(keys(&bids[0]), set(&["ticks", "lots", "count"]));

    // 只给结算日 (允许首尾空白)
    let (_, body) = get_json(&client, &format!("{}/api/view?settl_date=%2020140302%20", base)).await?;
    assert_eq!(field_set(&body, "cid"), set(&["1", "2"]));

    // 两者都给
    let (_, body) = get_json(
        &client,
        &format!("{}/api/view?mnem=EURUSD&mnem=GBPUSD&settl_date=20140303", base),
    )
    .await?;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["cid"], 1);
    assert_eq!(body[0]["settl_date"], 20140303);

    // 空盘口也以空数组返回
    let (_, body) = get_json(&client, &format!("{}/api/view?mnem=GBPUSD", base)).await?;
    assert_eq!(body[0]["list_ask"], Value::Array(vec![]));

    // 没有匹配时返回空数组而不是 null
    let (status, body) = get_json(&client, &format!("{}/api/view?mnem=EURUSD&settl_date=19990101", base)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));

    lifecycle.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn test_non_numeric_settl_date_is_bad_request() -> anyhow::Result<()> {
    let lifecycle = start_loopback().await?;
    let base = spawn_test_server(Arc::new(lifecycle.bridge())).await?;
    let client = http_client();

    let (status, body) = get_json(&client, &format!("{}/api/view?settl_date=20140302&settl_date=tomorrow", base)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("tomorrow")));

    lifecycle.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn test_closed_session_is_service_unavailable() -> anyhow::Result<()> {
    let lifecycle = start_loopback().await?;
    let base = spawn_test_server(Arc::new(lifecycle.bridge())).await?;
    let client = http_client();

    lifecycle.shutdown().await?;

    for path in ["/api/trader", "/api/accnt", "/api/contr", "/api/view"] {
        let (status, body) = get_json(&client, &format!("{}{}", base, path)).await?;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{}", path);
        assert_eq!(body["success"], false);
    }
    Ok(())
}

#[tokio::test]
async fn test_session_fault_is_bad_gateway() -> anyhow::Result<()> {
    let gateway = Arc::new(FailingGateway(BridgeError::SessionFault("reset by peer".into())));
    let base = spawn_test_server(gateway).await?;
    let client = http_client();

    let (status, body) = get_json(&client, &format!("{}/api/contr?mnem=EURUSD", base)).await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("reset by peer")));
    Ok(())
}

#[tokio::test]
async fn test_mismatched_reply_is_internal_error() -> anyhow::Result<()> {
    struct ClosedReply;

    #[async_trait]
    impl CommandGateway for ClosedReply {
        async fn submit(&self, _command: Command) -> Result<Reply, BridgeError> {
            Ok(Reply::Closed)
        }
    }

    let base = spawn_test_server(Arc::new(ClosedReply)).await?;
    let client = http_client();
    let (status, body) = get_json(&client, &format!("{}/api/trader", base)).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn test_openapi_document_lists_routes() -> anyhow::Result<()> {
    let gateway = Arc::new(FailingGateway(BridgeError::SessionClosed));
    let base = spawn_test_server(gateway).await?;
    let client = http_client();

    let (status, doc) = get_json(&client, &format!("{}/api-docs/openapi.json", base)).await?;
    assert_eq!(status, StatusCode::OK);
    for path in ["/api/trader", "/api/accnt", "/api/contr", "/api/view"] {
        assert!(doc["paths"].get(path).is_some(), "{} missing from openapi", path);
    }
    Ok(())
}
