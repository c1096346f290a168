pub mod file;

pub use vam_common::traits::repository_traits::PrefsRepository;
