//! vam-server/src/context.rs
//!
//! The shared state handed to every handler: session registry plus the
//! preference repository.

use std::sync::Arc;

use tracing::info;

use vam_common::Error;
use vam_common::traits::repository_traits::PrefsRepository;
use vam_core::repositories::file::FilePrefsRepository;
use vam_core::sessions::SessionRegistry;

use crate::Args;

#[derive(Clone)]
pub struct ServerContext {
    pub sessions: Arc<SessionRegistry>,
    pub prefs: Arc<dyn PrefsRepository>,
}

impl ServerContext {
    pub async fn new(args: &Args) -> Result<Self, Error> {
        let data_dir = match &args.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .ok_or_else(|| Error::Platform("No platform data directory available".into()))?
                .join("vrchat-avatar-manager"),
        };
        info!("Preference store directory: {}", data_dir.display());

        let prefs = FilePrefsRepository::new(&data_dir).await?;
        Ok(Self {
            sessions: Arc::new(SessionRegistry::new(
                &args.vrchat_base_url,
                &args.user_agent,
            )),
            prefs: Arc::new(prefs),
        })
    }
}
