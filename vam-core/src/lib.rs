// vam-core/src/lib.rs

pub mod http;
pub mod platforms;
pub mod repositories;
pub mod services;
pub mod sessions;
pub mod utils;

pub use http::{DefaultHttpClient, HttpClient, HttpResponse};
pub use sessions::SessionRegistry;
pub use vam_common::Error;
