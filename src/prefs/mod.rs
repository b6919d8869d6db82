//! 持久化用户设置：键定义、存储介质、后台写入与进程级存储

mod backend;
mod keys;
mod store;
mod writer;

pub use backend::{JsonFileBackend, MemoryBackend, PrefsBackend, prefs_path};
pub use keys::{
    APP_PREFS, IS_FIRST_TIME, NIGHT_MODE, PrefKey, PrefKind, PrefValue, PreferenceSet,
    SELECTED_LANGUAGE, SIMPLE_REMOTE_MODE, TOUCHPAD_ENABLED, VIBRATION_ENABLED,
    validate_language_code,
};
pub use store::SettingsStore;
