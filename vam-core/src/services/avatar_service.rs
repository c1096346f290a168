//! Assembles UI-facing avatar pages from raw platform records.

use serde::Serialize;

use vam_common::models::avatar::Avatar;

use crate::Error;
use crate::platforms::vrchat::{VRChatAvatarJson, VRChatClient};
use crate::utils::performance::rank_for_platform;

/// One page of the user's own avatars.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarPage {
    pub avatars: Vec<Avatar>,
    pub has_more: bool,
    /// Collection total, populated only for the first page because it
    /// costs a full sequential scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

/// Search outcome over the whole collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarSearchPage {
    pub avatars: Vec<Avatar>,
    pub total_matches: usize,
    pub has_more: bool,
}

/// Fetch one page. `has_more` assumes a full page means more may follow,
/// matching how the platform paginates.
pub async fn page(client: &VRChatClient, n: usize, offset: usize) -> Result<AvatarPage, Error> {
    let raw = client.list_avatars(n, offset).await?;
    let has_more = raw.len() == n;
    let total = if offset == 0 {
        Some(client.count_avatars().await?)
    } else {
        None
    };

    Ok(AvatarPage {
        avatars: raw.into_iter().map(summarize_avatar).collect(),
        has_more,
        total,
    })
}

/// Case-insensitive name search over the whole collection, sliced by
/// offset/n after filtering.
pub async fn search(
    client: &VRChatClient,
    query: &str,
    n: usize,
    offset: usize,
) -> Result<AvatarSearchPage, Error> {
    let needle = query.trim().to_lowercase();
    let all = client.list_all_avatars().await?;

    let matched: Vec<VRChatAvatarJson> = all
        .into_iter()
        .filter(|a| a.name.to_lowercase().contains(&needle))
        .collect();

    let total_matches = matched.len();
    let has_more = offset + n < total_matches;
    let avatars = matched
        .into_iter()
        .skip(offset)
        .take(n)
        .map(summarize_avatar)
        .collect();

    Ok(AvatarSearchPage {
        avatars,
        total_matches,
        has_more,
    })
}

/// Flatten one platform record into the summary the UI renders.
pub fn summarize_avatar(raw: VRChatAvatarJson) -> Avatar {
    let thumbnail = if raw.thumbnail_image_url.is_empty() {
        raw.image_url
    } else {
        raw.thumbnail_image_url
    };

    let mut platforms: Vec<String> = Vec::new();
    for pkg in &raw.unity_packages {
        if !pkg.platform.is_empty() && !platforms.contains(&pkg.platform) {
            platforms.push(pkg.platform.clone());
        }
    }

    let performance = rank_for_platform(&raw.performance, "standalonewindows")
        .or_else(|| rank_for_platform(&raw.performance, "android"));

    Avatar {
        id: raw.id,
        name: raw.name,
        thumbnail,
        platforms,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
        performance,
    }
}
