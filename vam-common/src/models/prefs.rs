use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User-defined label used to group avatars by their body base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyBase {
    pub id: Uuid,
    pub name: String,
}

impl BodyBase {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }
}

/// User-defined favorites folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavFolder {
    pub id: Uuid,
    pub name: String,
}

impl FavFolder {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }
}

/// Avatar id -> body base id. Each avatar maps to at most one base.
pub type AvatarBaseMap = HashMap<String, Uuid>;

/// Avatar id -> favorites folder id.
pub type AvatarFavMap = HashMap<String, Uuid>;

/// Avatar id -> free-text tags.
pub type AvatarTagMap = HashMap<String, Vec<String>>;

/// Everything the preference store persists, as one exportable unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefsSnapshot {
    #[serde(default)]
    pub body_bases: Vec<BodyBase>,
    #[serde(default)]
    pub avatar_base_map: AvatarBaseMap,
    #[serde(default)]
    pub fav_folders: Vec<FavFolder>,
    #[serde(default)]
    pub avatar_fav_map: AvatarFavMap,
    #[serde(default)]
    pub avatar_tag_map: AvatarTagMap,
    #[serde(default)]
    pub confirm_avatar_change: bool,
}
