//! Integration tests for DataService against a local HTTP server

use sheetdash::core::{DashboardState, DataSource, FilterOperator, FilterPredicate, LoadError, Notifications};
use sheetdash::services::{DataService, ExportService};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const PLAY_BODY: &str = r#"{
    "status": "success",
    "message": "ok",
    "data": {
        "GLOBAL": [
            {"publisher": "ShowHeroes", "cpm": 2.5, "impressions": 1200},
            {"publisher": "Acme Media", "cpm": 0.8, "impressions": 300},
            {"publisher": "Blue Sky", "cpm": null, "impressions": 75}
        ],
        "EMEA": [
            {"publisher": "Nordic Ads", "cpm": 1.1, "impressions": 900}
        ]
    }
}"#;

/// Serve one canned response per connection, `count` times
async fn serve(status_line: &'static str, body: &'static str, count: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        for _ in 0..count {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{}/api/play", addr)
}

fn service(endpoint: String) -> DataService {
    DataService::new(endpoint, Duration::from_secs(5)).unwrap()
}

fn dashboard() -> DashboardState {
    DashboardState::new(DataSource::Play, 25, Notifications::default())
}

#[tokio::test]
async fn test_successful_load_drives_dashboard() {
    let endpoint = serve("200 OK", PLAY_BODY, 1).await;
    let mut state = dashboard();

    let request = state.begin_load();
    let result = service(endpoint).load().await;
    state.complete_load(request, result);

    assert!(!state.is_loading());
    assert_eq!(state.dataset().region_names(), vec!["GLOBAL", "EMEA"]);
    assert_eq!(state.active_tab(), Some("GLOBAL"));
    assert_eq!(
        state.visible_columns(),
        &["publisher".to_string(), "cpm".to_string(), "impressions".to_string()]
    );
    assert!(state.notifications().is_empty());

    state.apply_filters(vec![FilterPredicate::new("cpm", FilterOperator::GreaterThan, "1")]);
    let rows = state.filtered_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].display("publisher"), "ShowHeroes");
}

#[tokio::test]
async fn test_http_error_is_network_failure() {
    let endpoint = serve("500 Internal Server Error", r#"{"status":"error"}"#, 1).await;

    let result = service(endpoint).load().await;

    match result {
        Err(LoadError::Network(message)) => assert!(message.contains("500"), "got {}", message),
        other => panic!("expected a network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_clears_previous_data() {
    let good = serve("200 OK", PLAY_BODY, 1).await;
    let bad = serve("200 OK", r#"{"status":"success","data":[1,2,3]}"#, 1).await;
    let mut state = dashboard();

    let first = state.begin_load();
    state.complete_load(first, service(good).load().await);
    assert_eq!(state.dataset().total_records(), 4);

    let second = state.begin_load();
    let result = service(bad).load().await;
    assert!(matches!(result, Err(LoadError::MalformedResponse(_))));
    state.complete_load(second, result);

    assert!(state.dataset().is_empty());
    assert_eq!(
        state.notifications().current().map(|n| n.description.as_str()),
        Some("The data format received was not as expected")
    );
}

#[tokio::test]
async fn test_export_of_loaded_view() {
    let endpoint = serve("200 OK", PLAY_BODY, 1).await;
    let mut state = dashboard();
    let request = state.begin_load();
    state.complete_load(request, service(endpoint).load().await);
    state.toggle_column("impressions");
    state.set_search_term("S");

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("play.csv");
    let rows = state.filtered_rows();
    let written = ExportService::export_csv(&path, state.visible_columns(), &rows).unwrap();

    // Case-insensitive: ShowHeroes and Blue Sky; null cpm exports empty
    assert_eq!(written, 2);
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "publisher,cpm\nShowHeroes,2.5\nBlue Sky,\n");
}
