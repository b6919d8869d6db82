use super::backend::{JsonFileBackend, PrefsBackend};
use super::keys::{APP_PREFS, PrefKey, PrefValue, PreferenceSet};
use super::writer::Writer;
use crate::error::SettingsError;
use once_cell::sync::OnceCell;
use std::fmt;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 进程级设置存储
///
/// 只有两个阶段：未初始化和就绪。`initialize` 必须在任何访问之前调用且只能调用一次，
/// 之前的访问一律返回 [`SettingsError::Uninitialized`]，不会退回默认值。
///
/// 写入在返回前对本进程可见，落盘由后台线程异步完成；需要确认落盘时调用 [`flush`]。
///
/// [`flush`]: SettingsStore::flush
#[derive(Default)]
pub struct SettingsStore {
    inner: OnceCell<Ready>,
}

struct Ready {
    prefs: RwLock<PreferenceSet>,
    writer: Writer,
    location: String,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 绑定持久化介质并加载已有记录
    ///
    /// 重复调用返回 [`SettingsError::AlreadyInitialized`]，保留第一次的绑定。
    /// 加载失败时保持未初始化状态。
    pub fn initialize<B: PrefsBackend>(&self, mut backend: B) -> Result<(), SettingsError> {
        if self.inner.get().is_some() {
            return Err(SettingsError::AlreadyInitialized);
        }

        let prefs = backend.load()?;
        let location = backend.location();
        let entries = prefs.len();
        let writer = Writer::spawn(Box::new(backend)).map_err(SettingsError::WriterSpawn)?;

        self.inner
            .set(Ready {
                prefs: RwLock::new(prefs),
                writer,
                location,
            })
            .map_err(|_| SettingsError::AlreadyInitialized)?;

        tracing::info!(location = %self.location()?, entries, "设置存储已初始化");
        Ok(())
    }

    /// 使用默认命名空间 `APP_PREFS` 绑定到数据目录
    pub fn initialize_at(&self, data_dir: &Path) -> Result<(), SettingsError> {
        self.initialize(JsonFileBackend::new(data_dir, APP_PREFS))
    }

    pub fn is_ready(&self) -> bool {
        self.inner.get().is_some()
    }

    pub fn location(&self) -> Result<&str, SettingsError> {
        Ok(&self.ready()?.location)
    }

    /// 读取设置，未写入时返回默认值；`None` 仅出现在没有默认值的键上
    pub fn get(&self, key: PrefKey) -> Result<Option<PrefValue>, SettingsError> {
        self.ready()?.read().get(key)
    }

    /// 写入设置，立即对本进程可见
    pub fn set(&self, key: PrefKey, value: PrefValue) -> Result<(), SettingsError> {
        let ready = self.ready()?;
        let mut prefs = ready.write();
        prefs.insert(key, value)?;
        // 持锁提交，保证队列顺序与修改顺序一致
        ready.writer.submit(prefs.clone())
    }

    /// 删除设置，之后读取回到默认值
    pub fn unset(&self, key: PrefKey) -> Result<(), SettingsError> {
        let ready = self.ready()?;
        let mut prefs = ready.write();
        if prefs.remove(key) {
            ready.writer.submit(prefs.clone())?;
        }
        Ok(())
    }

    /// 清空所有已知设置
    pub fn reset(&self) -> Result<(), SettingsError> {
        let ready = self.ready()?;
        let mut prefs = ready.write();
        prefs.clear_known();
        tracing::info!("设置已重置");
        ready.writer.submit(prefs.clone())
    }

    /// 所有已知键及其当前有效值
    pub fn snapshot(&self) -> Result<Vec<(PrefKey, Option<PrefValue>)>, SettingsError> {
        let prefs = self.ready()?.read();
        PrefKey::ALL
            .into_iter()
            .map(|key| prefs.get(key).map(|v| (key, v)))
            .collect()
    }

    /// 阻塞直到此前的写入全部落盘，并返回期间发生的持久化错误
    pub fn flush(&self) -> Result<(), SettingsError> {
        self.ready()?.writer.flush()
    }

    /// 震动反馈，默认关闭
    pub fn vibration_enabled(&self) -> Result<bool, SettingsError> {
        self.get_bool(PrefKey::VibrationEnabled)
    }

    pub fn set_vibration_enabled(&self, on: bool) -> Result<(), SettingsError> {
        self.set(PrefKey::VibrationEnabled, PrefValue::Bool(on))
    }

    /// 简易遥控布局，默认关闭
    pub fn simple_remote_mode(&self) -> Result<bool, SettingsError> {
        self.get_bool(PrefKey::SimpleRemoteMode)
    }

    pub fn set_simple_remote_mode(&self, on: bool) -> Result<(), SettingsError> {
        self.set(PrefKey::SimpleRemoteMode, PrefValue::Bool(on))
    }

    /// 触控板输入，默认关闭
    pub fn touchpad_enabled(&self) -> Result<bool, SettingsError> {
        self.get_bool(PrefKey::TouchpadEnabled)
    }

    pub fn set_touchpad_enabled(&self, on: bool) -> Result<(), SettingsError> {
        self.set(PrefKey::TouchpadEnabled, PrefValue::Bool(on))
    }

    /// 首次启动标记，默认 `true`
    pub fn is_first_time(&self) -> Result<bool, SettingsError> {
        self.get_bool(PrefKey::IsFirstTime)
    }

    pub fn set_is_first_time(&self, first: bool) -> Result<(), SettingsError> {
        self.set(PrefKey::IsFirstTime, PrefValue::Bool(first))
    }

    /// 夜间模式，默认关闭
    pub fn night_mode(&self) -> Result<bool, SettingsError> {
        self.get_bool(PrefKey::NightMode)
    }

    pub fn set_night_mode(&self, on: bool) -> Result<(), SettingsError> {
        self.set(PrefKey::NightMode, PrefValue::Bool(on))
    }

    /// 界面语言覆盖，未设置时为 `None`
    pub fn selected_language(&self) -> Result<Option<String>, SettingsError> {
        match self.get(PrefKey::SelectedLanguage)? {
            Some(PrefValue::Text(code)) => Ok(Some(code)),
            None => Ok(None),
            Some(PrefValue::Bool(_)) => Err(SettingsError::TypeMismatch {
                key: PrefKey::SelectedLanguage,
                expected: PrefKey::SelectedLanguage.kind(),
            }),
        }
    }

    /// 语言代码不合法时返回 [`SettingsError::InvalidValue`]
    pub fn set_selected_language(&self, code: &str) -> Result<(), SettingsError> {
        self.set(PrefKey::SelectedLanguage, PrefValue::Text(code.to_owned()))
    }

    pub fn clear_selected_language(&self) -> Result<(), SettingsError> {
        self.unset(PrefKey::SelectedLanguage)
    }

    fn get_bool(&self, key: PrefKey) -> Result<bool, SettingsError> {
        match self.get(key)? {
            Some(PrefValue::Bool(b)) => Ok(b),
            _ => Err(SettingsError::TypeMismatch {
                key,
                expected: key.kind(),
            }),
        }
    }

    fn ready(&self) -> Result<&Ready, SettingsError> {
        self.inner.get().ok_or(SettingsError::Uninitialized)
    }
}

impl Ready {
    // 锁内只有一张映射表，中毒后数据仍按键保持一致
    fn read(&self) -> RwLockReadGuard<'_, PreferenceSet> {
        self.prefs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PreferenceSet> {
        self.prefs.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore")
            .field("ready", &self.is_ready())
            .field("location", &self.inner.get().map(|r| r.location.as_str()))
            .finish()
    }
}
