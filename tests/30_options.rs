mod common;

use anyhow::Result;
use reqwest::{header, Method, StatusCode};

use common::TestServer;

#[tokio::test]
async fn options_on_item_needs_no_token() -> Result<()> {
    let server = TestServer::spawn().await?;

    let resp = server
        .client
        .request(Method::OPTIONS, server.results("/5"))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(resp.headers()[header::ALLOW], "GET, PUT, DELETE, OPTIONS");
    assert_eq!(resp.headers()[header::CACHE_CONTROL], "public, immutable");
    assert!(resp.headers().get(header::CONTENT_TYPE).is_none());
    assert!(resp.bytes().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn options_on_collection() -> Result<()> {
    let server = TestServer::spawn().await?;

    for path in ["", ".json", ".xml"] {
        let resp = server
            .client
            .request(Method::OPTIONS, server.results(path))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()[header::ALLOW], "GET, POST, OPTIONS");
    }

    // id 0 describes the collection too
    let resp = server
        .client
        .request(Method::OPTIONS, server.results("/0.json"))
        .send()
        .await?;
    assert_eq!(resp.headers()[header::ALLOW], "GET, POST, OPTIONS");
    Ok(())
}

#[tokio::test]
async fn options_with_origin_but_no_requested_method_reaches_resource() -> Result<()> {
    let server = TestServer::spawn().await?;

    let resp = server
        .client
        .request(Method::OPTIONS, server.results("/5.json"))
        .header(header::ORIGIN, "http://localhost:3000")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(resp.headers()[header::ALLOW], "GET, PUT, DELETE, OPTIONS");
    Ok(())
}

#[tokio::test]
async fn cors_preflight_is_answered_by_cors_layer() -> Result<()> {
    let server = TestServer::spawn().await?;
    if !results_api::config::config().security.enable_cors {
        return Ok(());
    }

    let resp = server
        .client
        .request(Method::OPTIONS, server.results("/5"))
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .send()
        .await?;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    Ok(())
}

#[tokio::test]
async fn negative_ids_are_not_routes() -> Result<()> {
    let server = TestServer::spawn().await?;

    let resp = server
        .client
        .request(Method::OPTIONS, server.results("/-3"))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}
