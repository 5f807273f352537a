mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn whitelisted() -> Result<common::TestServer> {
    common::TestServer::start(&[("WHITELISTED_IPS", "127.0.0.1")]).await
}

#[tokio::test]
async fn create_with_invalid_fields_is_unprocessable() -> Result<()> {
    let server = whitelisted().await?;

    let res = reqwest::Client::new()
        .post(server.url("/companies"))
        .json(&json!({"name": "", "website": "x".repeat(300)}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = res.json::<Value>().await?;
    assert!(body["field_errors"]["name"].is_string());
    assert!(body["field_errors"]["website"].is_string());
    Ok(())
}

#[tokio::test]
async fn experience_dates_must_be_ordered() -> Result<()> {
    let server = whitelisted().await?;

    let res = reqwest::Client::new()
        .post(server.url("/experiences"))
        .json(&json!({"title": "Engineer", "start_date": "2022-05-01", "end_date": "2021-01-01"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn empty_patch_is_bad_request() -> Result<()> {
    let server = whitelisted().await?;

    let res = reqwest::Client::new()
        .patch(server.url("/blogs/1"))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "No fields to update");
    Ok(())
}

#[tokio::test]
async fn write_against_unreachable_database_is_bad_request() -> Result<()> {
    let server = whitelisted().await?;

    let res = reqwest::Client::new()
        .post(server.url("/technologies"))
        .json(&json!({"name": "Rust", "abbr": "rs"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["success"], false);
    Ok(())
}

#[tokio::test]
async fn read_against_unreachable_database_is_server_error() -> Result<()> {
    let server = whitelisted().await?;

    let res = reqwest::get(server.url("/technologies?name=ru")).await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}
