use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tv-remote", version, about = "电视遥控器设置存储")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 覆盖数据目录（默认走系统 data_local_dir）
    #[arg(long, env = "TV_REMOTE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// 覆盖设置命名空间（默认 APP_PREFS）
    #[arg(long, env = "TV_REMOTE_NAMESPACE")]
    pub namespace: Option<String>,

    /// 覆盖日志目录（默认 `{data_dir}/logs`）
    #[arg(long, env = "TV_REMOTE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// 覆盖日志过滤（等价于设置 RUST_LOG）
    #[arg(long, env = "RUST_LOG")]
    pub log_filter: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 打印设置文件路径（不加载记录，文件损坏时也可用）
    Path,

    #[command(flatten)]
    Prefs(PrefsCommand),
}

/// 需要已初始化设置存储的命令
#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// 列出所有设置及当前值
    List,

    /// 读取单个设置
    Get { key: String },

    /// 写入设置（布尔值支持 true/false/1/0/on/off/yes/no）
    Set { key: String, value: String },

    /// 删除设置，恢复默认值
    Unset { key: String },

    /// 清空所有设置
    Reset,
}
