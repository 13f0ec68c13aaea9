use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

use super::*;
use axum::{http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;

const FULL_DOCUMENT: &str = r#"{
    "sheetId": "sheet-1",
    "clientId": "client-1.apps.googleusercontent.com",
    "apiKey": "key-1",
    "driveFolderId": "folder-1"
}"#;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn temp_config(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("rater_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("config.json");
    fs::write(&path, contents).expect("write config");
    path
}

async fn spawn_config_server(status: StatusCode, body: &'static str) -> anyhow::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route("/config.json", get(move || async move { (status, body) }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/config.json"))
}

#[tokio::test]
async fn loads_config_from_file() {
    let path = temp_config(FULL_DOCUMENT);

    let config = load_config_with(
        &reqwest::Client::new(),
        path.to_string_lossy().as_ref(),
        no_env,
    )
    .await
    .expect("config");

    assert_eq!(config.sheet_id, SheetId::from("sheet-1"));
    assert_eq!(config.client_id, "client-1.apps.googleusercontent.com");
    assert_eq!(config.api_key, "key-1");
    assert_eq!(config.drive_folder_id, Some(FolderId::from("folder-1")));
    assert_eq!(config.drive_api_base, DRIVE_API_BASE);
    assert_eq!(config.sheets_api_base, SHEETS_API_BASE);
    assert!(config.access_token.is_none());

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[tokio::test]
async fn loads_config_over_http() {
    let url = spawn_config_server(StatusCode::OK, FULL_DOCUMENT)
        .await
        .expect("spawn server");

    let config = load_config_with(&reqwest::Client::new(), &url, no_env)
        .await
        .expect("config");

    assert_eq!(config.sheet_id, SheetId::from("sheet-1"));
}

#[tokio::test]
async fn http_error_status_is_a_fetch_failure() {
    let url = spawn_config_server(StatusCode::NOT_FOUND, "missing")
        .await
        .expect("spawn server");

    let err = load_config_with(&reqwest::Client::new(), &url, no_env)
        .await
        .expect_err("must fail");

    assert!(matches!(err, ConfigError::Fetch { .. }), "unexpected: {err}");
    assert!(err.to_string().contains("404"), "unexpected: {err}");
}

#[tokio::test]
async fn missing_file_is_a_fetch_failure() {
    let err = load_config_with(
        &reqwest::Client::new(),
        "/definitely/not/here/config.json",
        no_env,
    )
    .await
    .expect_err("must fail");

    assert!(matches!(err, ConfigError::Fetch { .. }));
}

#[tokio::test]
async fn malformed_document_is_a_parse_failure() {
    let path = temp_config("{ not json");

    let err = load_config_with(
        &reqwest::Client::new(),
        path.to_string_lossy().as_ref(),
        no_env,
    )
    .await
    .expect_err("must fail");

    assert!(matches!(err, ConfigError::Parse { .. }));
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn required_fields_are_enforced() {
    let document: ConfigDocument =
        serde_json::from_str(r#"{"sheetId": "s", "clientId": "c", "apiKey": "  "}"#)
            .expect("document");

    let err = document.validate().expect_err("must fail");

    assert!(matches!(err, ConfigError::MissingField("apiKey")));
}

#[test]
fn folder_is_optional() {
    let document: ConfigDocument =
        serde_json::from_str(r#"{"sheetId": "s", "clientId": "c", "apiKey": "k"}"#)
            .expect("document");

    let config = document.validate().expect("config");

    assert!(config.drive_folder_id.is_none());
}

#[test]
fn environment_overrides_document_values() {
    let mut document: ConfigDocument = serde_json::from_str(FULL_DOCUMENT).expect("document");

    document.apply_overrides(env_from(&[
        ("RATER__SHEET_ID", "sheet-from-env"),
        ("RATER__DRIVE_FOLDER_ID", "folder-from-env"),
        ("RATER__SHEETS_API_BASE", "http://127.0.0.1:9/v4"),
    ]));
    let config = document.validate().expect("config");

    assert_eq!(config.sheet_id, SheetId::from("sheet-from-env"));
    assert_eq!(config.drive_folder_id, Some(FolderId::from("folder-from-env")));
    assert_eq!(config.sheets_api_base, "http://127.0.0.1:9/v4");
    assert_eq!(config.api_key, "key-1");
}

#[test]
fn blank_environment_values_keep_document_values() {
    let mut document: ConfigDocument = serde_json::from_str(FULL_DOCUMENT).expect("document");

    document.apply_overrides(env_from(&[
        ("RATER__API_KEY", ""),
        ("RATER__SHEET_ID", "   "),
        ("RATER__ACCESS_TOKEN", ""),
        ("GOOGLE_ACCESS_TOKEN", "ambient"),
    ]));
    let config = document.validate().expect("config");

    assert_eq!(config.api_key, "key-1");
    assert_eq!(config.sheet_id, SheetId::from("sheet-1"));
    assert_eq!(config.access_token.as_deref(), Some("ambient"));
}

#[test]
fn google_access_token_only_fills_missing_token() {
    let mut without: ConfigDocument = serde_json::from_str(FULL_DOCUMENT).expect("document");
    without.apply_overrides(env_from(&[("GOOGLE_ACCESS_TOKEN", "ambient")]));
    assert_eq!(
        without.validate().expect("config").access_token.as_deref(),
        Some("ambient")
    );

    let mut with: ConfigDocument =
        serde_json::from_str(r#"{"sheetId":"s","clientId":"c","apiKey":"k","accessToken":"doc"}"#)
            .expect("document");
    with.apply_overrides(env_from(&[("GOOGLE_ACCESS_TOKEN", "ambient")]));
    assert_eq!(
        with.validate().expect("config").access_token.as_deref(),
        Some("doc")
    );
}

#[test]
fn debug_output_redacts_credentials() {
    let document: ConfigDocument = serde_json::from_str(
        r#"{"sheetId":"s","clientId":"c","apiKey":"super-secret","accessToken":"tok-secret"}"#,
    )
    .expect("document");
    let rendered = format!("{:?}", document.validate().expect("config"));

    assert!(!rendered.contains("super-secret"));
    assert!(!rendered.contains("tok-secret"));
}
