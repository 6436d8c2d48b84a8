use bookmarks_dal::bookmark::Bookmark;
use bookmarks_e2e_tests::{extend_url, launch_env, prepare_env, rest::create_bookmark};
use serde_json::json;
use tracing::info;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_bookmarks() {
    let (args, mut config_guard) = prepare_env("test_bookmarks", &[]).await.unwrap();
    let (client, base_url) = launch_env(args, &mut config_guard).await.unwrap();

    let api_url = base_url.join("bookmarks").unwrap();

    let response = client.get(api_url.clone()).send().await.unwrap();
    assert!(response.status().is_success());
    let records: Vec<Bookmark> = response.json().await.unwrap();
    assert!(records.is_empty());

    let new_bookmark = create_bookmark(
        &client,
        &api_url,
        "Rust",
        "https://www.rust-lang.org",
        "A language empowering everyone",
        None,
    )
    .await
    .unwrap();
    assert_eq!(new_bookmark.rating, 1);
    let id = new_bookmark.id;
    info!("ID: {}", id);

    let record_url = extend_url(&api_url, id);

    let response = client.get(record_url.clone()).send().await.unwrap();
    assert!(response.status().is_success());
    let rec: Bookmark = response.json().await.unwrap();
    assert_eq!(rec, new_bookmark);

    let response = client
        .patch(record_url.clone())
        .json(&json!({"rating": "4", "description": ""}))
        .send()
        .await
        .unwrap();
    info!("Response: {:#?}", response);
    assert_eq!(response.status().as_u16(), 204);

    let response = client.get(record_url.clone()).send().await.unwrap();
    let rec: Bookmark = response.json().await.unwrap();
    assert_eq!(rec.rating, 4);
    assert_eq!(rec.description, "A language empowering everyone");

    let response = client
        .post(api_url.clone())
        .json(&json!({"title": "No url", "description": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["message"], "Missing 'url' in request body");

    let response = client.delete(record_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let response = client.get(record_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": {"message": "resource not found"}}));
}

#[tokio::test]
#[traced_test]
async fn test_api_prefix_and_cors() {
    let (args, mut config_guard) = prepare_env("test_api_prefix", &["--api-prefix", "/api", "--cors"])
        .await
        .unwrap();
    let (client, base_url) = launch_env(args, &mut config_guard).await.unwrap();

    let api_url = base_url.join("api/bookmarks").unwrap();
    create_bookmark(
        &client,
        &api_url,
        "MDN",
        "https://developer.mozilla.org",
        "Web docs",
        Some(5),
    )
    .await
    .unwrap();

    let response = client
        .get(api_url.clone())
        .header("Origin", "http://example.com")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert!(response.headers().contains_key("access-control-allow-origin"));
    let records: Vec<Bookmark> = response.json().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rating, 5);

    let response = client.get(base_url.join("bookmarks").unwrap()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
