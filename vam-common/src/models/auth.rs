use serde::{Deserialize, Serialize};

/// The two second-factor methods the avatar platform accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TwoFactorMethod {
    #[serde(rename = "totp")]
    Totp,
    #[serde(rename = "emailOtp")]
    EmailOtp,
}

impl TwoFactorMethod {
    /// Verification endpoint for this method, relative to the API base.
    pub fn verify_path(&self) -> &'static str {
        match self {
            TwoFactorMethod::Totp => "/auth/twofactorauth/totp/verify",
            TwoFactorMethod::EmailOtp => "/auth/twofactorauth/emailotp/verify",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TwoFactorMethod::Totp => "totp",
            TwoFactorMethod::EmailOtp => "emailOtp",
        }
    }
}

/// The slice of `GET /auth/user` the manager cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub display_name: String,
}

/// Result of a basic-auth login attempt.
///
/// A 2xx answer that still lists second-factor methods leaves the session
/// unauthenticated; the caller must verify a code before anything else
/// succeeds. Method names are passed through exactly as the platform
/// sent them.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    LoggedIn { user: CurrentUser },
    TwoFactorRequired { methods: Vec<String> },
}
