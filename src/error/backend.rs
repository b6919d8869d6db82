//! 持久化介质相关错误

use std::path::PathBuf;

/// 底层存储介质错误（不可读、损坏或不可写）
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// 数据目录不可用
    #[error("数据目录不可用: {0}")]
    DataDir(#[source] std::io::Error),

    /// 读取设置文件失败
    #[error("读取设置失败({}): {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 设置文件内容损坏
    #[error("解析设置失败({}): {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// 写入设置文件失败
    #[error("保存设置失败({}): {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 序列化失败
    #[error("序列化设置失败: {0}")]
    Encode(#[source] serde_json::Error),
}
