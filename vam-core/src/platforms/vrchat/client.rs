use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use vam_common::models::auth::{CurrentUser, LoginOutcome, TwoFactorMethod};

use crate::Error;
use crate::http::{HttpClient, HttpResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.vrchat.cloud/api/1";

/// Page size used when scanning the whole collection.
const SCAN_PAGE_SIZE: usize = 100;

/// Encapsulates VRChat REST calls that ride on one session's cookie jar.
///
/// No retry, backoff, or rate-limit handling: every non-2xx answer is
/// surfaced to the caller unchanged as `Error::UpstreamStatus`.
pub struct VRChatClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

/// JSON shape for `GET /auth/user`.
#[derive(Debug, Deserialize)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
struct VRChatAuthUserJson {
    id: String,
    display_name: String,
    requires_two_factor_auth: Vec<String>,
}

impl Default for VRChatAuthUserJson {
    fn default() -> Self {
        Self {
            id: String::new(),
            display_name: String::new(),
            requires_two_factor_auth: Vec::new(),
        }
    }
}

/// JSON shape for one record of `GET /avatars`.
///
/// Only the fields the manager reads are listed; `performance` is kept
/// as raw JSON because the platform serves it in several shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct VRChatAvatarJson {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub thumbnail_image_url: String,
    pub release_status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub performance: Value,
    pub unity_packages: Vec<VRChatUnityPackageJson>,
}

impl Default for VRChatAvatarJson {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            image_url: String::new(),
            thumbnail_image_url: String::new(),
            release_status: String::new(),
            created_at: None,
            updated_at: None,
            performance: Value::Null,
            unity_packages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[serde(rename_all = "camelCase")]
pub struct VRChatUnityPackageJson {
    pub platform: String,
}

impl VRChatClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(http: Arc<dyn HttpClient>, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn basic_auth(username: &str, password: &str) -> String {
        let token = BASE64.encode(format!("{username}:{password}"));
        format!("Basic {token}")
    }

    fn ensure_success(resp: HttpResponse) -> Result<HttpResponse, Error> {
        if resp.is_success() {
            Ok(resp)
        } else {
            Err(resp.into_upstream_error())
        }
    }

    /// Basic-auth login against `/auth/user`.
    ///
    /// A 2xx answer that still lists `requiresTwoFactorAuth` methods
    /// leaves the session unauthenticated until `verify_two_factor`
    /// succeeds with one of them.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, Error> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::Auth("username and password are required".into()));
        }

        let url = format!("{}/auth/user", self.base_url);
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_string(),
            Self::basic_auth(username, password),
        );

        let resp = Self::ensure_success(self.http.get(url, headers).await?)?;
        let user: VRChatAuthUserJson = serde_json::from_str(&resp.body)?;

        if !user.requires_two_factor_auth.is_empty() {
            info!(
                "VRChat login needs a second factor: {:?}",
                user.requires_two_factor_auth
            );
            return Ok(LoginOutcome::TwoFactorRequired {
                methods: user.requires_two_factor_auth,
            });
        }

        Ok(LoginOutcome::LoggedIn {
            user: CurrentUser {
                id: user.id,
                display_name: user.display_name,
            },
        })
    }

    /// Submit a second-factor code, then re-confirm identity via
    /// `/auth/user`. Either upstream failure is passed through as-is.
    pub async fn verify_two_factor(
        &self,
        method: TwoFactorMethod,
        code: &str,
    ) -> Result<CurrentUser, Error> {
        let url = format!("{}{}", self.base_url, method.verify_path());
        let body = json!({ "code": code }).to_string();

        Self::ensure_success(self.http.post_json(url, HashMap::new(), body).await?)?;

        info!("Second factor accepted ({})", method.as_str());
        self.current_user().await
    }

    /// Fetch the logged-in user with the session cookie alone.
    pub async fn current_user(&self) -> Result<CurrentUser, Error> {
        let url = format!("{}/auth/user", self.base_url);
        let resp = Self::ensure_success(self.http.get(url, HashMap::new()).await?)?;
        let user: VRChatAuthUserJson = serde_json::from_str(&resp.body)?;
        Ok(CurrentUser {
            id: user.id,
            display_name: user.display_name,
        })
    }

    /// One page of the user's own avatars. The caller manages offset
    /// advancement.
    pub async fn list_avatars(
        &self,
        n: usize,
        offset: usize,
    ) -> Result<Vec<VRChatAvatarJson>, Error> {
        let url = format!(
            "{}/avatars?ownerId=me&releaseStatus=all&n={}&offset={}",
            self.base_url, n, offset
        );
        let resp = Self::ensure_success(self.http.get(url, HashMap::new()).await?)?;
        let avatars: Vec<VRChatAvatarJson> = serde_json::from_str(&resp.body)?;
        Ok(avatars)
    }

    /// Count every avatar the user owns: fixed-size pages summed
    /// sequentially, terminating on the first short page. The first
    /// upstream error aborts the scan and is returned unchanged.
    pub async fn count_avatars(&self) -> Result<usize, Error> {
        let mut offset = 0;
        let mut total = 0;

        loop {
            let page = self.list_avatars(SCAN_PAGE_SIZE, offset).await?;
            total += page.len();
            if page.len() < SCAN_PAGE_SIZE {
                break;
            }
            offset += SCAN_PAGE_SIZE;
        }

        Ok(total)
    }

    /// Every avatar the user owns, for whole-collection search. Same
    /// sequential scan and failure policy as `count_avatars`.
    pub async fn list_all_avatars(&self) -> Result<Vec<VRChatAvatarJson>, Error> {
        let mut offset = 0;
        let mut all = Vec::new();

        loop {
            let page = self.list_avatars(SCAN_PAGE_SIZE, offset).await?;
            let page_len = page.len();
            all.extend(page);
            if page_len < SCAN_PAGE_SIZE {
                break;
            }
            offset += SCAN_PAGE_SIZE;
        }

        Ok(all)
    }
}
