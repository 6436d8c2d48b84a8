use anyhow::Result;
use bookmarks_dal::bookmark::Bookmark;
use serde_json::json;
use url::Url;

pub async fn create_bookmark(
    client: &reqwest::Client,
    api_url: &Url,
    title: &str,
    url: &str,
    description: &str,
    rating: Option<i64>,
) -> Result<Bookmark> {
    let mut payload = json!({"title": title, "url": url, "description": description});
    if let Some(rating) = rating {
        payload["rating"] = json!(rating);
    }

    let response = client.post(api_url.clone()).json(&payload).send().await?;
    assert_eq!(response.status().as_u16(), 201);

    let new_bookmark: Bookmark = response.json().await?;
    Ok(new_bookmark)
}
