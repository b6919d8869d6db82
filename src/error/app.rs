//! 应用通用错误

use super::SettingsError;

/// 启动流程与命令执行的顶层错误
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 设置错误
    #[error("设置错误: {0}")]
    Settings(#[from] SettingsError),
}
