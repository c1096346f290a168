//! File-backed preference store.
//!
//! Each entry lives in its own JSON file under the data directory, named
//! after its versioned key (`vam.bodyBases.v1.json` and so on). Entries
//! that are missing or unreadable load as their defaults; saves are
//! direct key-value serialization. A single async mutex serializes every
//! read-modify-write cycle.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use vam_common::models::prefs::{
    AvatarBaseMap, AvatarFavMap, AvatarTagMap, BodyBase, FavFolder, PrefsSnapshot,
};
use vam_common::traits::repository_traits::PrefsRepository;

use crate::Error;

const BODY_BASES_KEY: &str = "vam.bodyBases.v1";
const AVATAR_BASE_MAP_KEY: &str = "vam.avatarBaseMap.v1";
const FAV_FOLDERS_KEY: &str = "vam.favFolders.v1";
const AVATAR_FAV_MAP_KEY: &str = "vam.avatarFavMap.v1";
const AVATAR_TAG_MAP_KEY: &str = "vam.avatarTagMap.v1";
const CONFIRM_AVATAR_CHANGE_KEY: &str = "vam.confirmAvatarChange.v1";

pub struct FilePrefsRepository {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePrefsRepository {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn load_or_default<T>(&self, key: &str) -> Result<T, Error>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("Unreadable preference entry {key}, using defaults: {e}");
                Ok(T::default())
            }
        }
    }

    async fn store<T>(&self, key: &str, value: &T) -> Result<(), Error>
    where
        T: Serialize,
    {
        let raw = serde_json::to_string_pretty(value)?;
        fs::write(self.path_for(key), raw).await?;
        Ok(())
    }
}

#[async_trait]
impl PrefsRepository for FilePrefsRepository {
    async fn body_bases(&self) -> Result<Vec<BodyBase>, Error> {
        self.load_or_default(BODY_BASES_KEY).await
    }

    async fn save_body_bases(&self, list: &[BodyBase]) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        self.store(BODY_BASES_KEY, &list).await
    }

    async fn avatar_base_map(&self) -> Result<AvatarBaseMap, Error> {
        self.load_or_default(AVATAR_BASE_MAP_KEY).await
    }

    async fn save_avatar_base_map(&self, map: &AvatarBaseMap) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        self.store(AVATAR_BASE_MAP_KEY, map).await
    }

    async fn fav_folders(&self) -> Result<Vec<FavFolder>, Error> {
        self.load_or_default(FAV_FOLDERS_KEY).await
    }

    async fn save_fav_folders(&self, list: &[FavFolder]) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        self.store(FAV_FOLDERS_KEY, &list).await
    }

    async fn avatar_fav_map(&self) -> Result<AvatarFavMap, Error> {
        self.load_or_default(AVATAR_FAV_MAP_KEY).await
    }

    async fn save_avatar_fav_map(&self, map: &AvatarFavMap) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        self.store(AVATAR_FAV_MAP_KEY, map).await
    }

    async fn avatar_tags(&self) -> Result<AvatarTagMap, Error> {
        self.load_or_default(AVATAR_TAG_MAP_KEY).await
    }

    async fn save_avatar_tags(&self, map: &AvatarTagMap) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        // Tag lists stay duplicate-free per avatar.
        let mut deduped = AvatarTagMap::new();
        for (avatar_id, tags) in map {
            let mut seen = Vec::new();
            for tag in tags {
                if !seen.contains(tag) {
                    seen.push(tag.clone());
                }
            }
            deduped.insert(avatar_id.clone(), seen);
        }
        self.store(AVATAR_TAG_MAP_KEY, &deduped).await
    }

    async fn confirm_avatar_change(&self) -> Result<bool, Error> {
        self.load_or_default(CONFIRM_AVATAR_CHANGE_KEY).await
    }

    async fn set_confirm_avatar_change(&self, enabled: bool) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        self.store(CONFIRM_AVATAR_CHANGE_KEY, &enabled).await
    }

    async fn add_body_base(&self, name: &str) -> Result<BodyBase, Error> {
        let _guard = self.write_lock.lock().await;
        let mut bases: Vec<BodyBase> = self.load_or_default(BODY_BASES_KEY).await?;
        let base = BodyBase::new(name);
        bases.push(base.clone());
        self.store(BODY_BASES_KEY, &bases).await?;
        Ok(base)
    }

    async fn remove_body_base(&self, id: Uuid) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;

        let mut bases: Vec<BodyBase> = self.load_or_default(BODY_BASES_KEY).await?;
        bases.retain(|b| b.id != id);
        self.store(BODY_BASES_KEY, &bases).await?;

        // Cascade: no map entry may keep pointing at the removed base.
        let mut map: AvatarBaseMap = self.load_or_default(AVATAR_BASE_MAP_KEY).await?;
        map.retain(|_, base_id| *base_id != id);
        self.store(AVATAR_BASE_MAP_KEY, &map).await
    }

    async fn add_fav_folder(&self, name: &str) -> Result<FavFolder, Error> {
        let _guard = self.write_lock.lock().await;
        let mut folders: Vec<FavFolder> = self.load_or_default(FAV_FOLDERS_KEY).await?;
        let folder = FavFolder::new(name);
        folders.push(folder.clone());
        self.store(FAV_FOLDERS_KEY, &folders).await?;
        Ok(folder)
    }

    async fn remove_fav_folder(&self, id: Uuid) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;

        let mut folders: Vec<FavFolder> = self.load_or_default(FAV_FOLDERS_KEY).await?;
        folders.retain(|f| f.id != id);
        self.store(FAV_FOLDERS_KEY, &folders).await?;

        let mut map: AvatarFavMap = self.load_or_default(AVATAR_FAV_MAP_KEY).await?;
        map.retain(|_, folder_id| *folder_id != id);
        self.store(AVATAR_FAV_MAP_KEY, &map).await
    }

    async fn export_snapshot(&self) -> Result<PrefsSnapshot, Error> {
        Ok(PrefsSnapshot {
            body_bases: self.load_or_default(BODY_BASES_KEY).await?,
            avatar_base_map: self.load_or_default(AVATAR_BASE_MAP_KEY).await?,
            fav_folders: self.load_or_default(FAV_FOLDERS_KEY).await?,
            avatar_fav_map: self.load_or_default(AVATAR_FAV_MAP_KEY).await?,
            avatar_tag_map: self.load_or_default(AVATAR_TAG_MAP_KEY).await?,
            confirm_avatar_change: self.load_or_default(CONFIRM_AVATAR_CHANGE_KEY).await?,
        })
    }

    async fn import_snapshot(&self, snapshot: &PrefsSnapshot) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        self.store(BODY_BASES_KEY, &snapshot.body_bases).await?;
        self.store(AVATAR_BASE_MAP_KEY, &snapshot.avatar_base_map)
            .await?;
        self.store(FAV_FOLDERS_KEY, &snapshot.fav_folders).await?;
        self.store(AVATAR_FAV_MAP_KEY, &snapshot.avatar_fav_map)
            .await?;
        self.store(AVATAR_TAG_MAP_KEY, &snapshot.avatar_tag_map)
            .await?;
        self.store(CONFIRM_AVATAR_CHANGE_KEY, &snapshot.confirm_avatar_change)
            .await
    }
}
