//! 设置存储错误

use super::BackendError;
use crate::prefs::{PrefKey, PrefKind};
use std::sync::Arc;

/// 设置存储访问错误
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// 在 `initialize` 之前访问设置，属于启动顺序错误
    #[error("设置存储尚未初始化")]
    Uninitialized,

    /// 重复初始化
    #[error("设置存储已经初始化")]
    AlreadyInitialized,

    /// 值类型与键声明的类型不符
    #[error("设置 {key} 类型不匹配: 期望 {expected}")]
    TypeMismatch { key: PrefKey, expected: PrefKind },

    /// 设置值无效
    #[error("设置值无效: {0}")]
    InvalidValue(String),

    /// 未知的设置键
    #[error("未知的设置项: {0}")]
    UnknownKey(String),

    /// 持久化介质错误
    #[error("存储错误: {0}")]
    Backend(#[from] BackendError),

    /// 已接受的写入尚未落盘，下次 `flush` 或退出时重试
    #[error("设置尚未落盘: {0}")]
    Unsaved(#[source] Arc<BackendError>),

    /// 无法启动后台写入线程
    #[error("启动设置写入线程失败: {0}")]
    WriterSpawn(#[source] std::io::Error),

    /// 后台写入线程已退出
    #[error("后台写入线程已退出")]
    WriterGone,
}
