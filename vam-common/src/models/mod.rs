pub mod auth;
pub mod avatar;
pub mod prefs;

pub use auth::{CurrentUser, LoginOutcome, TwoFactorMethod};
pub use avatar::Avatar;
pub use prefs::{
    AvatarBaseMap, AvatarFavMap, AvatarTagMap, BodyBase, FavFolder, PrefsSnapshot,
};
