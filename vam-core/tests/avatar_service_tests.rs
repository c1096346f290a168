// File: vam-core/tests/avatar_service_tests.rs

mod common;

use std::sync::Arc;

use serde_json::json;

use common::MockHttpClient;
use common::avatar_page;
use vam_core::platforms::vrchat::{VRChatAvatarJson, VRChatClient};
use vam_core::services::avatar_service;

const BASE: &str = "https://vrc.test/api/1";

fn named_page(names: &[&str]) -> String {
    let items: Vec<serde_json::Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| common::avatar_json(&format!("avtr_{i}"), name))
        .collect();
    serde_json::Value::Array(items).to_string()
}

#[tokio::test]
async fn the_first_page_includes_the_collection_total() {
    let mock = Arc::new(MockHttpClient::new());
    // The requested page itself...
    mock.push_response(200, &avatar_page(0, 2));
    // ...then the counting scan (one short page).
    mock.push_response(200, &avatar_page(0, 40));
    let client = VRChatClient::with_base_url(mock.clone(), BASE);

    let page = avatar_service::page(&client, 2, 0).await.unwrap();
    assert_eq!(page.avatars.len(), 2);
    assert!(page.has_more);
    assert_eq!(page.total, Some(40));

    let requests = mock.recorded();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].url.contains("n=2&offset=0"));
    assert!(requests[1].url.contains("n=100&offset=0"));
}

#[tokio::test]
async fn later_pages_skip_the_total_scan() {
    let mock = Arc::new(MockHttpClient::new());
    mock.push_response(200, &avatar_page(50, 10));
    let client = VRChatClient::with_base_url(mock.clone(), BASE);

    let page = avatar_service::page(&client, 50, 50).await.unwrap();
    assert_eq!(page.avatars.len(), 10);
    assert!(!page.has_more);
    assert_eq!(page.total, None);
    assert_eq!(mock.recorded().len(), 1);
}

#[tokio::test]
async fn search_is_case_insensitive_and_sliced() {
    let names = [
        "Manuka Cat",
        "manuka base",
        "Rusk",
        "MANUKA Deluxe",
        "Shiro",
    ];

    let mock = Arc::new(MockHttpClient::new());
    mock.push_response(200, &named_page(&names));
    let client = VRChatClient::with_base_url(mock, BASE);

    let found = avatar_service::search(&client, "manuka", 2, 0).await.unwrap();
    assert_eq!(found.total_matches, 3);
    assert!(found.has_more);
    let got: Vec<&str> = found.avatars.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(got, vec!["Manuka Cat", "manuka base"]);

    // The tail slice of the same query.
    let mock = Arc::new(MockHttpClient::new());
    mock.push_response(200, &named_page(&names));
    let client = VRChatClient::with_base_url(mock, BASE);

    let found = avatar_service::search(&client, "manuka", 2, 2).await.unwrap();
    assert_eq!(found.total_matches, 3);
    assert!(!found.has_more);
    let got: Vec<&str> = found.avatars.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(got, vec!["MANUKA Deluxe"]);
}

#[tokio::test]
async fn search_with_no_hits_reports_zero_matches() {
    let mock = Arc::new(MockHttpClient::new());
    mock.push_response(200, &named_page(&["Rusk", "Shiro"]));
    let client = VRChatClient::with_base_url(mock, BASE);

    let found = avatar_service::search(&client, "manuka", 50, 0).await.unwrap();
    assert_eq!(found.total_matches, 0);
    assert!(!found.has_more);
    assert!(found.avatars.is_empty());
}

#[test]
fn summarize_flattens_platforms_thumbnail_and_performance() {
    let raw: VRChatAvatarJson = serde_json::from_value(json!({
        "id": "avtr_x",
        "name": "Manuka Cat",
        "imageUrl": "https://files.example/full.png",
        "thumbnailImageUrl": "",
        "createdAt": "2024-05-01T12:00:00.000Z",
        "updatedAt": "2025-02-10T08:30:00.000Z",
        "unityPackages": [
            { "platform": "standalonewindows" },
            { "platform": "android" },
            { "platform": "standalonewindows" }
        ],
        "performance": { "standalonewindows": { "rating": "Good" } }
    }))
    .unwrap();

    let avatar = avatar_service::summarize_avatar(raw);
    assert_eq!(avatar.id, "avtr_x");
    // Empty thumbnail falls back to the full image.
    assert_eq!(avatar.thumbnail, "https://files.example/full.png");
    assert_eq!(avatar.platforms, vec!["standalonewindows", "android"]);
    assert_eq!(avatar.created_at.as_deref(), Some("2024-05-01T12:00:00.000Z"));
    assert_eq!(avatar.performance.as_deref(), Some("Good"));
}

#[test]
fn summarize_tolerates_sparse_records() {
    let raw: VRChatAvatarJson =
        serde_json::from_value(json!({ "id": "avtr_y", "name": "Bare" })).unwrap();

    let avatar = avatar_service::summarize_avatar(raw);
    assert_eq!(avatar.name, "Bare");
    assert!(avatar.thumbnail.is_empty());
    assert!(avatar.platforms.is_empty());
    assert_eq!(avatar.performance, None);
}
