pub mod prefs;

pub use prefs::FilePrefsRepository;
