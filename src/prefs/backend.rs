use super::keys::PreferenceSet;
use crate::error::BackendError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// 设置记录的持久化介质
///
/// 初始化后由后台写入线程独占。
pub trait PrefsBackend: Send + 'static {
    /// 读取整条记录；记录不存在时返回空集合
    fn load(&mut self) -> Result<PreferenceSet, BackendError>;

    /// 以原子方式整体覆盖记录
    fn persist(&mut self, prefs: &PreferenceSet) -> Result<(), BackendError>;

    /// 用于日志和 `path` 命令的位置描述
    fn location(&self) -> String;
}

/// `{data_dir}/{namespace}.json`
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    data_dir: PathBuf,
    namespace: String,
}

impl JsonFileBackend {
    pub fn new(data_dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            namespace: namespace.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        prefs_path(&self.data_dir, &self.namespace)
    }
}

impl PrefsBackend for JsonFileBackend {
    fn load(&mut self) -> Result<PreferenceSet, BackendError> {
        let p = self.path();
        let bytes = match fs::read(&p) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PreferenceSet::default());
            }
            Err(source) => return Err(BackendError::Load { path: p, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| BackendError::Parse { path: p, source })
    }

    fn persist(&mut self, prefs: &PreferenceSet) -> Result<(), BackendError> {
        fs::create_dir_all(&self.data_dir).map_err(BackendError::DataDir)?;
        let p = self.path();
        let tmp = p.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(prefs).map_err(BackendError::Encode)?;
        fs::write(&tmp, bytes).map_err(|source| BackendError::Save {
            path: tmp.clone(),
            source,
        })?;
        // rename 在各平台都会覆盖目标；失败时旧记录保持原样
        if let Err(source) = fs::rename(&tmp, &p) {
            let _ = fs::remove_file(&tmp);
            return Err(BackendError::Save { path: p, source });
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path().display().to_string()
    }
}

pub fn prefs_path(data_dir: &Path, namespace: &str) -> PathBuf {
    data_dir.join(format!("{namespace}.json"))
}

/// 进程内介质，克隆共享同一份数据，可模拟重启与写入失败
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    record: Arc<Mutex<PreferenceSet>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前已持久化的内容
    pub fn persisted(&self) -> PreferenceSet {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl PrefsBackend for MemoryBackend {
    fn load(&mut self) -> Result<PreferenceSet, BackendError> {
        Ok(self.persisted())
    }

    fn persist(&mut self, prefs: &PreferenceSet) -> Result<(), BackendError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::Save {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("写入被禁用"),
            });
        }
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = prefs.clone();
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_owned()
    }
}
