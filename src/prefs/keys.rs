use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 设置记录所在的命名空间（固定）
pub const APP_PREFS: &str = "APP_PREFS";

pub const VIBRATION_ENABLED: &str = "vibration_enabled";
pub const SIMPLE_REMOTE_MODE: &str = "simple_remote_mode";
pub const TOUCHPAD_ENABLED: &str = "touchpad_enabled";
pub const IS_FIRST_TIME: &str = "is_first_time";
pub const NIGHT_MODE: &str = "night_mode";
pub const SELECTED_LANGUAGE: &str = "selected_language";

const LANGUAGE_CODE_MAX_LEN: usize = 35;

/// 已知的设置项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrefKey {
    VibrationEnabled,
    SimpleRemoteMode,
    TouchpadEnabled,
    IsFirstTime,
    NightMode,
    SelectedLanguage,
}

impl PrefKey {
    pub const ALL: [PrefKey; 6] = [
        PrefKey::VibrationEnabled,
        PrefKey::SimpleRemoteMode,
        PrefKey::TouchpadEnabled,
        PrefKey::IsFirstTime,
        PrefKey::NightMode,
        PrefKey::SelectedLanguage,
    ];

    /// 持久化时使用的键名
    pub fn as_str(self) -> &'static str {
        match self {
            PrefKey::VibrationEnabled => VIBRATION_ENABLED,
            PrefKey::SimpleRemoteMode => SIMPLE_REMOTE_MODE,
            PrefKey::TouchpadEnabled => TOUCHPAD_ENABLED,
            PrefKey::IsFirstTime => IS_FIRST_TIME,
            PrefKey::NightMode => NIGHT_MODE,
            PrefKey::SelectedLanguage => SELECTED_LANGUAGE,
        }
    }

    pub fn kind(self) -> PrefKind {
        match self {
            PrefKey::SelectedLanguage => PrefKind::Text,
            _ => PrefKind::Bool,
        }
    }

    /// 未写入时的默认值；`None` 表示未设置
    pub fn default_value(self) -> Option<PrefValue> {
        match self {
            PrefKey::IsFirstTime => Some(PrefValue::Bool(true)),
            PrefKey::SelectedLanguage => None,
            _ => Some(PrefValue::Bool(false)),
        }
    }
}

impl fmt::Display for PrefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrefKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrefKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKind {
    Bool,
    Text,
}

impl fmt::Display for PrefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefKind::Bool => f.write_str("bool"),
            PrefKind::Text => f.write_str("string"),
        }
    }
}

/// 设置值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    Bool(bool),
    Text(String),
}

impl PrefValue {
    pub fn kind(&self) -> PrefKind {
        match self {
            PrefValue::Bool(_) => PrefKind::Bool,
            PrefValue::Text(_) => PrefKind::Text,
        }
    }

    /// 按键的类型解析命令行输入
    pub fn parse_for(key: PrefKey, raw: &str) -> Result<Self, SettingsError> {
        match key.kind() {
            PrefKind::Bool => parse_bool(raw)
                .map(PrefValue::Bool)
                .ok_or_else(|| SettingsError::InvalidValue(format!("{key}={raw}"))),
            PrefKind::Text => Ok(PrefValue::Text(raw.trim().to_owned())),
        }
    }

    fn from_json(key: PrefKey, v: &Value) -> Result<Self, SettingsError> {
        match (key.kind(), v) {
            (PrefKind::Bool, Value::Bool(b)) => Ok(PrefValue::Bool(*b)),
            (PrefKind::Text, Value::String(s)) => Ok(PrefValue::Text(s.clone())),
            (expected, _) => Err(SettingsError::TypeMismatch { key, expected }),
        }
    }

    fn into_json(self) -> Value {
        match self {
            PrefValue::Bool(b) => Value::Bool(b),
            PrefValue::Text(s) => Value::String(s),
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{b}"),
            PrefValue::Text(s) => f.write_str(s),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 语言代码：字母数字片段，以 `-` 或 `_` 分隔，例如 `fr`、`pt-BR`、`zh_CN`
pub fn validate_language_code(code: &str) -> Result<(), SettingsError> {
    let ok = !code.is_empty()
        && code.len() <= LANGUAGE_CODE_MAX_LEN
        && code
            .split(['-', '_'])
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));
    if ok {
        Ok(())
    } else {
        Err(SettingsError::InvalidValue(format!(
            "{SELECTED_LANGUAGE}={code:?}"
        )))
    }
}

/// 一个命名空间下的全部设置
///
/// 未知的键原样保留，重写文件时不会丢失。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceSet {
    entries: BTreeMap<String, Value>,
}

impl PreferenceSet {
    /// 读取设置；缺失时返回默认值，类型不符时报错
    pub fn get(&self, key: PrefKey) -> Result<Option<PrefValue>, SettingsError> {
        match self.entries.get(key.as_str()) {
            Some(v) => PrefValue::from_json(key, v).map(Some),
            None => Ok(key.default_value()),
        }
    }

    pub fn insert(&mut self, key: PrefKey, value: PrefValue) -> Result<(), SettingsError> {
        if value.kind() != key.kind() {
            return Err(SettingsError::TypeMismatch {
                key,
                expected: key.kind(),
            });
        }
        if let (PrefKey::SelectedLanguage, PrefValue::Text(code)) = (key, &value) {
            validate_language_code(code)?;
        }
        self.entries.insert(key.as_str().to_owned(), value.into_json());
        Ok(())
    }

    /// 删除设置，之后读取回到默认值；返回之前是否存在
    pub fn remove(&mut self, key: PrefKey) -> bool {
        self.entries.remove(key.as_str()).is_some()
    }

    /// 清空所有已知设置，未知键保留
    pub fn clear_known(&mut self) {
        for key in PrefKey::ALL {
            self.entries.remove(key.as_str());
        }
    }

    pub fn contains(&self, key: PrefKey) -> bool {
        self.entries.contains_key(key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_keys() {
        let set = PreferenceSet::default();
        assert_eq!(
            set.get(PrefKey::IsFirstTime).unwrap(),
            Some(PrefValue::Bool(true))
        );
        assert_eq!(
            set.get(PrefKey::NightMode).unwrap(),
            Some(PrefValue::Bool(false))
        );
        assert_eq!(set.get(PrefKey::SelectedLanguage).unwrap(), None);
    }

    #[test]
    fn key_names_roundtrip_through_from_str() {
        for key in PrefKey::ALL {
            assert_eq!(key.as_str().parse::<PrefKey>().unwrap(), key);
        }
        assert!(matches!(
            "IS_FIRST_TIME".parse::<PrefKey>(),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn insert_rejects_wrong_kind() {
        let mut set = PreferenceSet::default();
        let err = set
            .insert(PrefKey::TouchpadEnabled, PrefValue::Text("yes".to_owned()))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::TypeMismatch {
                key: PrefKey::TouchpadEnabled,
                expected: PrefKind::Bool
            }
        ));
        assert!(!set.contains(PrefKey::TouchpadEnabled));
    }

    #[test]
    fn stored_value_of_wrong_type_is_reported() {
        let set: PreferenceSet = serde_json::from_str(r#"{"night_mode":"dark"}"#).unwrap();
        assert!(matches!(
            set.get(PrefKey::NightMode),
            Err(SettingsError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn persisted_layout_is_plain_json() {
        let mut set = PreferenceSet::default();
        set.insert(PrefKey::IsFirstTime, PrefValue::Bool(false))
            .unwrap();
        set.insert(PrefKey::SelectedLanguage, PrefValue::Text("fr".to_owned()))
            .unwrap();
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            serde_json::json!({"is_first_time": false, "selected_language": "fr"})
        );
    }

    #[test]
    fn clear_known_keeps_foreign_keys() {
        let mut set: PreferenceSet =
            serde_json::from_str(r#"{"legacy_counter":3,"night_mode":true}"#).unwrap();
        set.clear_known();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(PrefKey::NightMode).unwrap(), Some(PrefValue::Bool(false)));
    }

    #[test]
    fn language_codes() {
        for ok in ["fr", "pt-BR", "zh_CN", "sr-Latn-RS"] {
            assert!(validate_language_code(ok).is_ok(), "{ok}");
        }
        for bad in ["", "-", "fr-", "en US", "日本", "a/b"] {
            assert!(validate_language_code(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn parse_bool_inputs() {
        let on = PrefValue::parse_for(PrefKey::VibrationEnabled, " On ").unwrap();
        assert_eq!(on, PrefValue::Bool(true));
        let off = PrefValue::parse_for(PrefKey::VibrationEnabled, "0").unwrap();
        assert_eq!(off, PrefValue::Bool(false));
        assert!(PrefValue::parse_for(PrefKey::VibrationEnabled, "maybe").is_err());
    }
}
