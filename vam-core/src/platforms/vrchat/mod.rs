// File: src/platforms/vrchat/mod.rs

pub mod client;

pub use client::VRChatClient;
pub use client::{VRChatAvatarJson, VRChatUnityPackageJson, DEFAULT_BASE_URL};
