// File: vam-core/tests/prefs_repository_tests.rs

use std::collections::HashMap;

use tempfile::tempdir;
use uuid::Uuid;

use vam_common::Error;
use vam_common::models::prefs::{
    AvatarBaseMap, AvatarFavMap, AvatarTagMap, BodyBase, FavFolder, PrefsSnapshot,
};
use vam_common::traits::repository_traits::PrefsRepository;
use vam_core::repositories::file::FilePrefsRepository;

#[tokio::test]
async fn the_five_stores_round_trip() -> Result<(), Error> {
    let dir = tempdir()?;
    let repo = FilePrefsRepository::new(dir.path()).await?;

    let bases = vec![BodyBase::new("Manuka"), BodyBase::new("Selestia")];
    let folders = vec![FavFolder::new("Main"), FavFolder::new("Events")];
    let base_map: AvatarBaseMap =
        HashMap::from([("avtr_1".to_string(), bases[0].id), ("avtr_2".to_string(), bases[1].id)]);
    let fav_map: AvatarFavMap = HashMap::from([("avtr_1".to_string(), folders[1].id)]);
    let tags: AvatarTagMap = HashMap::from([(
        "avtr_1".to_string(),
        vec!["cute".to_string(), "winter".to_string()],
    )]);

    repo.save_body_bases(&bases).await?;
    repo.save_avatar_base_map(&base_map).await?;
    repo.save_fav_folders(&folders).await?;
    repo.save_avatar_fav_map(&fav_map).await?;
    repo.save_avatar_tags(&tags).await?;
    repo.set_confirm_avatar_change(true).await?;

    // A second repository over the same directory sees identical data.
    let reopened = FilePrefsRepository::new(dir.path()).await?;
    assert_eq!(reopened.body_bases().await?, bases);
    assert_eq!(reopened.avatar_base_map().await?, base_map);
    assert_eq!(reopened.fav_folders().await?, folders);
    assert_eq!(reopened.avatar_fav_map().await?, fav_map);
    assert_eq!(reopened.avatar_tags().await?, tags);
    assert!(reopened.confirm_avatar_change().await?);
    Ok(())
}

#[tokio::test]
async fn missing_entries_load_as_defaults() -> Result<(), Error> {
    let dir = tempdir()?;
    let repo = FilePrefsRepository::new(dir.path()).await?;

    assert!(repo.body_bases().await?.is_empty());
    assert!(repo.avatar_base_map().await?.is_empty());
    assert!(repo.fav_folders().await?.is_empty());
    assert!(repo.avatar_fav_map().await?.is_empty());
    assert!(repo.avatar_tags().await?.is_empty());
    assert!(!repo.confirm_avatar_change().await?);
    Ok(())
}

#[tokio::test]
async fn a_corrupt_entry_falls_back_to_its_default() -> Result<(), Error> {
    let dir = tempdir()?;
    let repo = FilePrefsRepository::new(dir.path()).await?;
    repo.save_body_bases(&[BodyBase::new("Manuka")]).await?;

    std::fs::write(dir.path().join("vam.bodyBases.v1.json"), "{not json")?;
    assert!(repo.body_bases().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn removing_a_body_base_cascades_into_the_avatar_map() -> Result<(), Error> {
    let dir = tempdir()?;
    let repo = FilePrefsRepository::new(dir.path()).await?;

    let manuka = repo.add_body_base("Manuka").await?;
    let selestia = repo.add_body_base("Selestia").await?;
    let base_map: AvatarBaseMap = HashMap::from([
        ("avtr_1".to_string(), manuka.id),
        ("avtr_2".to_string(), selestia.id),
        ("avtr_3".to_string(), manuka.id),
    ]);
    repo.save_avatar_base_map(&base_map).await?;

    repo.remove_body_base(manuka.id).await?;

    assert_eq!(repo.body_bases().await?, vec![selestia.clone()]);
    let map = repo.avatar_base_map().await?;
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("avtr_2"), Some(&selestia.id));
    Ok(())
}

#[tokio::test]
async fn removing_an_unknown_base_is_a_noop() -> Result<(), Error> {
    let dir = tempdir()?;
    let repo = FilePrefsRepository::new(dir.path()).await?;

    let manuka = repo.add_body_base("Manuka").await?;
    let base_map: AvatarBaseMap = HashMap::from([("avtr_1".to_string(), manuka.id)]);
    repo.save_avatar_base_map(&base_map).await?;

    repo.remove_body_base(Uuid::new_v4()).await?;

    assert_eq!(repo.body_bases().await?, vec![manuka]);
    assert_eq!(repo.avatar_base_map().await?, base_map);
    Ok(())
}

#[tokio::test]
async fn removing_a_fav_folder_cascades_too() -> Result<(), Error> {
    let dir = tempdir()?;
    let repo = FilePrefsRepository::new(dir.path()).await?;

    let main = repo.add_fav_folder("Main").await?;
    let events = repo.add_fav_folder("Events").await?;
    let fav_map: AvatarFavMap = HashMap::from([
        ("avtr_1".to_string(), main.id),
        ("avtr_2".to_string(), events.id),
    ]);
    repo.save_avatar_fav_map(&fav_map).await?;

    repo.remove_fav_folder(main.id).await?;

    assert_eq!(repo.fav_folders().await?, vec![events.clone()]);
    let map = repo.avatar_fav_map().await?;
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("avtr_2"), Some(&events.id));
    Ok(())
}

#[tokio::test]
async fn tags_deduplicate_on_save() -> Result<(), Error> {
    let dir = tempdir()?;
    let repo = FilePrefsRepository::new(dir.path()).await?;

    let tags: AvatarTagMap = HashMap::from([(
        "avtr_1".to_string(),
        vec![
            "cute".to_string(),
            "cute".to_string(),
            "cool".to_string(),
        ],
    )]);
    repo.save_avatar_tags(&tags).await?;

    assert_eq!(
        repo.avatar_tags().await?.get("avtr_1"),
        Some(&vec!["cute".to_string(), "cool".to_string()])
    );
    Ok(())
}

#[tokio::test]
async fn snapshot_export_import_round_trips() -> Result<(), Error> {
    let source_dir = tempdir()?;
    let source = FilePrefsRepository::new(source_dir.path()).await?;

    let manuka = source.add_body_base("Manuka").await?;
    let folder = source.add_fav_folder("Main").await?;
    source
        .save_avatar_base_map(&HashMap::from([("avtr_1".to_string(), manuka.id)]))
        .await?;
    source
        .save_avatar_fav_map(&HashMap::from([("avtr_1".to_string(), folder.id)]))
        .await?;
    source
        .save_avatar_tags(&HashMap::from([(
            "avtr_1".to_string(),
            vec!["cute".to_string()],
        )]))
        .await?;
    source.set_confirm_avatar_change(true).await?;

    let snapshot: PrefsSnapshot = source.export_snapshot().await?;

    let target_dir = tempdir()?;
    let target = FilePrefsRepository::new(target_dir.path()).await?;
    target.import_snapshot(&snapshot).await?;

    assert_eq!(target.export_snapshot().await?, snapshot);
    Ok(())
}
