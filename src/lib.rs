pub mod error;
pub mod prefs;

pub use error::{AppError, BackendError, SettingsError};
pub use prefs::{PrefKey, PrefValue, SettingsStore};
