use std::fs;
use std::sync::Arc;
use std::thread;
use tv_remote::error::{BackendError, SettingsError};
use tv_remote::prefs::{APP_PREFS, JsonFileBackend, PrefKey, PrefValue, SettingsStore};

fn open(data_dir: &std::path::Path) -> SettingsStore {
    let store = SettingsStore::new();
    store.initialize_at(data_dir).expect("initialize");
    store
}

#[test]
fn fresh_install_returns_documented_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open(dir.path());

    assert!(!store.vibration_enabled().expect("vibration"));
    assert!(!store.simple_remote_mode().expect("simple"));
    assert!(!store.touchpad_enabled().expect("touchpad"));
    assert!(store.is_first_time().expect("first"));
    assert!(!store.night_mode().expect("night"));
    assert_eq!(store.selected_language().expect("language"), None);
}

#[test]
fn write_then_read_in_process() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open(dir.path());

    store.set_vibration_enabled(true).expect("set");
    store.set_simple_remote_mode(true).expect("set");
    store.set_night_mode(true).expect("set");
    store.set_selected_language("fr").expect("set");

    assert!(store.vibration_enabled().expect("get"));
    assert!(store.simple_remote_mode().expect("get"));
    assert!(store.night_mode().expect("get"));
    assert!(!store.touchpad_enabled().expect("get"));
    assert_eq!(store.selected_language().expect("get").as_deref(), Some("fr"));
    assert_eq!(
        store.get(PrefKey::SelectedLanguage).expect("get"),
        Some(PrefValue::Text("fr".to_owned()))
    );
}

#[test]
fn first_time_flag_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let store = open(dir.path());
        assert!(store.is_first_time().expect("get"));
        store.set_is_first_time(false).expect("set");
        assert!(!store.is_first_time().expect("get"));
    }

    let store = open(dir.path());
    assert!(!store.is_first_time().expect("get after restart"));
}

#[test]
fn values_survive_restart_after_flush() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open(dir.path());
    store.set_touchpad_enabled(true).expect("set");
    store.set_selected_language("pt-BR").expect("set");
    store.flush().expect("flush");

    let reopened = open(dir.path());
    assert!(reopened.touchpad_enabled().expect("get"));
    assert_eq!(
        reopened.selected_language().expect("get").as_deref(),
        Some("pt-BR")
    );
}

#[test]
fn accessors_before_initialize_are_rejected() {
    let store = SettingsStore::new();
    assert!(matches!(
        store.vibration_enabled(),
        Err(SettingsError::Uninitialized)
    ));
    assert!(matches!(
        store.set_selected_language("fr"),
        Err(SettingsError::Uninitialized)
    ));
    assert!(matches!(
        store.get(PrefKey::NightMode),
        Err(SettingsError::Uninitialized)
    ));
    assert!(matches!(store.snapshot(), Err(SettingsError::Uninitialized)));
}

#[test]
fn corrupt_record_fails_initialization() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(format!("{APP_PREFS}.json")), b"{not-json").expect("write");

    let store = SettingsStore::new();
    let err = store.initialize_at(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Backend(BackendError::Parse { .. })
    ));
    assert!(!store.is_ready());
}

#[test]
fn unknown_keys_survive_rewrite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(format!("{APP_PREFS}.json"));
    fs::write(&path, br#"{"legacy_theme":"amoled","night_mode":false}"#).expect("write");

    let store = open(dir.path());
    store.set_night_mode(true).expect("set");
    store.flush().expect("flush");

    let raw: serde_json::Value =
        serde_json::from_slice(&fs::read(&path).expect("read")).expect("json");
    assert_eq!(raw["legacy_theme"], "amoled");
    assert_eq!(raw["night_mode"], true);
}

#[test]
fn namespaces_do_not_share_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = SettingsStore::new();
    a.initialize(JsonFileBackend::new(dir.path(), APP_PREFS))
        .expect("initialize");
    let b = SettingsStore::new();
    b.initialize(JsonFileBackend::new(dir.path(), "GUEST_PREFS"))
        .expect("initialize");

    a.set_night_mode(true).expect("set");
    assert!(!b.night_mode().expect("get"));
}

#[test]
fn reset_restores_defaults_durably() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let store = open(dir.path());
        store.set_is_first_time(false).expect("set");
        store.set_selected_language("zh_CN").expect("set");
        store.reset().expect("reset");
    }
    let store = open(dir.path());
    assert!(store.is_first_time().expect("get"));
    assert_eq!(store.selected_language().expect("get"), None);
}

#[test]
fn concurrent_writes_resolve_to_one_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(open(dir.path()));

    let handles: Vec<_> = [true, false]
        .into_iter()
        .map(|on| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..200 {
                    store.set_vibration_enabled(on).expect("set");
                    store.vibration_enabled().expect("get");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("join");
    }

    let in_memory = store.vibration_enabled().expect("get");
    store.flush().expect("flush");
    drop(store);

    let reopened = open(dir.path());
    assert_eq!(reopened.vibration_enabled().expect("get"), in_memory);
}

#[test]
fn mismatched_value_type_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open(dir.path());
    let err = store
        .set(PrefKey::IsFirstTime, PrefValue::Text("no".to_owned()))
        .unwrap_err();
    assert!(matches!(err, SettingsError::TypeMismatch { .. }));
    assert!(store.is_first_time().expect("get"));
}
