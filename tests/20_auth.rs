mod common;

use anyhow::Result;
use axum::http::{header, Method, StatusCode};
use serde_json::json;

const CHALLENGE: &str = "Basic realm=\"Secure Area\"";

fn challenge_of(res: &common::TestResponse) -> Option<&str> {
    res.headers.get(header::WWW_AUTHENTICATE).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn create_without_credentials_is_rejected() -> Result<()> {
    let app = common::test_app().await?;
    let body = json!({ "name": "Trà đá", "category": "drink" });

    let res = common::send(&app, Method::POST, "/api/items", None, Some(body)).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge_of(&res), Some(CHALLENGE));

    assert!(common::list_items(&app, "/api/items").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_with_wrong_credentials_is_rejected() -> Result<()> {
    let app = common::test_app().await?;
    let body = json!({ "name": "Trà đá", "category": "drink" });

    let wrong = common::basic_auth(common::ADMIN_USER, "guess");
    let res = common::send(&app, Method::POST, "/api/items", Some(&wrong), Some(body.clone())).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge_of(&res), Some(CHALLENGE));

    let res = common::send(&app, Method::POST, "/api/items", Some("Bearer token"), Some(body)).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    assert!(common::list_items(&app, "/api/items").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_with_correct_credentials_defaults_price_to_zero() -> Result<()> {
    let app = common::test_app().await?;
    let body = json!({ "name": "Trà đá", "category": "drink" });

    let res = common::send(&app, Method::POST, "/api/items", Some(&common::admin_auth()), Some(body)).await?;
    assert_eq!(res.status, StatusCode::CREATED, "body: {}", res.body);
    assert_eq!(res.body["price"], 0);
    assert!(res.body["id"].as_i64().unwrap_or(0) > 0);

    assert_eq!(common::list_items(&app, "/api/items").await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_are_guarded() -> Result<()> {
    let app = common::test_app().await?;
    let item = common::create_item(&app, json!({ "name": "Chè ba màu", "category": "food" })).await?;
    let uri = format!("/api/items/{}", item["id"]);

    let res = common::send(&app, Method::PUT, &uri, None, Some(json!({ "name": "x", "category": "food" }))).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = common::send(&app, Method::DELETE, &uri, None, None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let unchanged = common::get(&app, &uri).await?;
    assert_eq!(unchanged.body, item);
    Ok(())
}

#[tokio::test]
async fn reads_are_open() -> Result<()> {
    let app = common::test_app().await?;
    let item = common::create_item(&app, json!({ "name": "Nem rán", "category": "food" })).await?;

    assert_eq!(common::get(&app, "/api/items").await?.status, StatusCode::OK);
    assert_eq!(common::get(&app, &format!("/api/items/{}", item["id"])).await?.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn admin_page_requires_credentials() -> Result<()> {
    let app = common::test_app().await?;

    let res = common::get(&app, "/admin.html").await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge_of(&res), Some(CHALLENGE));

    let res = common::send(&app, Method::GET, "/admin.html", Some(&common::admin_auth()), None).await?;
    assert_ne!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}
