use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Error;
use crate::models::prefs::{
    AvatarBaseMap, AvatarFavMap, AvatarTagMap, BodyBase, FavFolder, PrefsSnapshot,
};

/// Persistence for the user's local avatar preferences: body-base
/// groupings, favorites, tags, and the avatar-change confirmation flag.
///
/// Each of the five stores loads and saves independently. Removal of a
/// grouping label cascades into the corresponding avatar map so no entry
/// is left pointing at a label that no longer exists.
#[async_trait]
pub trait PrefsRepository: Send + Sync {
    async fn body_bases(&self) -> Result<Vec<BodyBase>, Error>;
    async fn save_body_bases(&self, list: &[BodyBase]) -> Result<(), Error>;

    async fn avatar_base_map(&self) -> Result<AvatarBaseMap, Error>;
    async fn save_avatar_base_map(&self, map: &AvatarBaseMap) -> Result<(), Error>;

    async fn fav_folders(&self) -> Result<Vec<FavFolder>, Error>;
    async fn save_fav_folders(&self, list: &[FavFolder]) -> Result<(), Error>;

    async fn avatar_fav_map(&self) -> Result<AvatarFavMap, Error>;
    async fn save_avatar_fav_map(&self, map: &AvatarFavMap) -> Result<(), Error>;

    async fn avatar_tags(&self) -> Result<AvatarTagMap, Error>;
    async fn save_avatar_tags(&self, map: &AvatarTagMap) -> Result<(), Error>;

    async fn confirm_avatar_change(&self) -> Result<bool, Error>;
    async fn set_confirm_avatar_change(&self, enabled: bool) -> Result<(), Error>;

    /// Create a body base with a fresh id and persist it.
    async fn add_body_base(&self, name: &str) -> Result<BodyBase, Error>;

    /// Remove a body base and every avatar-map entry that references it.
    /// Removing an unknown id is a no-op.
    async fn remove_body_base(&self, id: Uuid) -> Result<(), Error>;

    /// Create a favorites folder with a fresh id and persist it.
    async fn add_fav_folder(&self, name: &str) -> Result<FavFolder, Error>;

    /// Remove a favorites folder and every avatar-map entry that
    /// references it. Removing an unknown id is a no-op.
    async fn remove_fav_folder(&self, id: Uuid) -> Result<(), Error>;

    async fn export_snapshot(&self) -> Result<PrefsSnapshot, Error>;
    async fn import_snapshot(&self, snapshot: &PrefsSnapshot) -> Result<(), Error>;
}
