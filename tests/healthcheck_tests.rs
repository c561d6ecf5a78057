// tests/healthcheck_tests.rs
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tiny_healthcheck::config::{CheckDefinition, CheckerConfig, ServerConfig};
use tiny_healthcheck::health::CheckKind;
use tiny_healthcheck::{liveness, Check, CheckError, Checker, HealthProbe, HealthcheckServer, ServerError};

struct Flag(bool);

#[async_trait]
impl HealthProbe for Flag {
    async fn check(&self) -> bool {
        self.0
    }
}

fn local_server(checker: Checker) -> Arc<HealthcheckServer> {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::default()
    };
    Arc::new(HealthcheckServer::new(Arc::new(checker), config))
}

#[tokio::test]
async fn test_registration_views() {
    let mut checker = Checker::default();
    checker.add_sync("sync", || true).unwrap();
    checker.add_async("async", || async { true }).unwrap();
    checker.add_check("probe", Check::probe(Flag(true))).unwrap();

    assert_eq!(checker.sync_checks(), vec!["sync"]);
    assert_eq!(checker.async_checks(), vec!["async", "probe"]);
    assert_eq!(checker.checks(), vec!["sync", "async", "probe"]);

    let conflict = checker.add_async("sync", || async { false }).unwrap_err();
    assert_eq!(conflict, CheckError::RegistrationConflict("sync".into()));
    assert_eq!(checker.checks().len(), 3);
}

#[tokio::test]
async fn test_configured_checks() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let open = listener.local_addr().unwrap().to_string();

    let mut upstream = mockito::Server::new_async().await;
    let _status = upstream
        .mock("GET", "/status")
        .with_status(200)
        .create_async()
        .await;

    let mut checker = Checker::new(CheckerConfig {
        timeout_secs: 2.0,
        ..CheckerConfig::default()
    });
    checker
        .add_definition(&CheckDefinition::Tcp {
            name: "socket".into(),
            address: open,
            connect_timeout_ms: 500,
        })
        .unwrap();
    checker
        .add_definition(&CheckDefinition::Http {
            name: "upstream".into(),
            url: format!("{}/status", upstream.url()),
            expect_status: None,
        })
        .unwrap();

    let invalid = checker.add_definition(&CheckDefinition::Http {
        name: "broken".into(),
        url: "::nonsense::".into(),
        expect_status: None,
    });
    assert!(matches!(invalid, Err(CheckError::InvalidCheckType { .. })));
    assert_eq!(checker.checks(), vec!["socket", "upstream"]);

    let response = checker.check_handler().await.unwrap();
    assert_eq!(response.code(), 200);
    assert_eq!(response.body().get("socket"), Some(&true));
    assert_eq!(response.body().get("upstream"), Some(&true));
}

#[tokio::test]
async fn test_probe_struct_is_async() {
    let check = Check::probe(Flag(false));
    assert_eq!(check.kind(), CheckKind::Async);

    let mut checker = Checker::default();
    checker.add_check("flag", check).unwrap();

    let response = checker.check_handler().await.unwrap();
    assert_eq!(response.code(), 500);
    assert_eq!(response.body().get("flag"), Some(&false));
}

#[tokio::test]
async fn test_server_serves_aggregation() {
    let mut checker = Checker::default();
    checker.add_sync("sync_false", || false).unwrap();
    checker.add_async("async_true", || async { true }).unwrap();

    let server = local_server(checker);
    let running = server.start().await.unwrap();
    let base = format!("http://{}", running.local_addr());

    let response = reqwest::get(format!("{}/healthcheck/", base)).await.unwrap();
    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "async_true": true, "sync_false": false })
    );

    let missing = reqwest::get(format!("{}/other", base)).await.unwrap();
    assert_eq!(missing.status(), 404);
    assert_eq!(missing.text().await.unwrap(), "404 Not Found");

    server.stop();
    tokio::time::timeout(Duration::from_secs(5), running.wait())
        .await
        .unwrap()
        .unwrap();
    assert!(!server.is_running());
}

#[tokio::test]
async fn test_server_rejects_second_start() {
    let server = local_server(Checker::default());
    let running = server.start().await.unwrap();

    assert!(matches!(server.start().await, Err(ServerError::AlreadyRunning)));

    server.stop();
    running.wait().await.unwrap();

    // Stopped servers can be started again.
    let again = server.start().await.unwrap();
    server.stop();
    again.wait().await.unwrap();
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let server = Arc::new(HealthcheckServer::new(
        Arc::new(Checker::default()),
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
            ..ServerConfig::default()
        },
    ));

    assert!(matches!(server.start().await, Err(ServerError::Bind { .. })));
    assert!(!server.is_running());
}

#[tokio::test]
async fn test_liveness_probe_against_server() {
    let mut checker = Checker::default();
    checker.add_sync("ok", || true).unwrap();

    let server = local_server(checker);
    let running = server.start().await.unwrap();
    let url = format!("http://{}/healthcheck", running.local_addr());

    let status = liveness::probe(&url, Duration::from_secs(5)).await.unwrap();
    assert_eq!(status, 200);

    server.stop();
    running.wait().await.unwrap();
}

#[tokio::test]
async fn test_stop_closes_keep_alive_connections() {
    let mut checker = Checker::default();
    checker.add_sync("ok", || true).unwrap();

    let server = local_server(checker);
    let running = server.start().await.unwrap();
    let url = format!("http://{}/healthcheck", running.local_addr());

    let client = reqwest::Client::new();
    let before = client.get(&url).send().await.unwrap();
    assert_eq!(before.status(), 200);
    assert_eq!(before.text().await.unwrap(), r#"{"ok":true}"#);

    server.stop();
    tokio::time::timeout(Duration::from_secs(5), running.wait())
        .await
        .unwrap()
        .unwrap();
    assert!(!server.is_running());

    let after = client
        .get(&url)
        .timeout(Duration::from_secs(2))
        .send()
        .await;
    assert!(after.is_err(), "stopped server answered: {:?}", after.map(|r| r.status()));
}
