use std::net::SocketAddr;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::Level;
use venturehub::{config::Config, create_app, db, AppState};

#[tokio::test]
async fn test_main_server_startup() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .try_init();

    let config = Config::for_tests();
    let db = db::connect(&config).await.unwrap();
    let app = create_app(AppState::new(db, &config), &config);

    // Port 0 lets the OS pick a free port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_task: JoinHandle<()> = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = reqwest::Client::new();
    let health = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .expect("server did not respond");
    assert!(health.status().is_success());

    let created = client
        .post(format!("http://{}/tools", addr))
        .json(&serde_json::json!({ "name": "Linear", "tags": ["issues"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), reqwest::StatusCode::CREATED);

    let tools: serde_json::Value = client
        .get(format!("http://{}/tools", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tools[0]["name"], "Linear");

    server_task.abort();
}

#[tokio::test]
async fn test_rate_limit_rejects_bursts() {
    let config = Config {
        rate_limit_per_minute: 1,
        rate_limit_burst: 1,
        ..Config::for_tests()
    };
    let db = db::connect(&config).await.unwrap();
    let app = create_app(AppState::new(db, &config), &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_task = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = reqwest::Client::new();
    let url = format!("http://{}/health", addr);
    let first = client.get(&url).send().await.unwrap();
    let second = client.get(&url).send().await.unwrap();
    assert!(first.status().is_success());
    assert_eq!(second.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);

    server_task.abort();
}
