use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// 依赖库只保留警告；写入线程每次落盘都会打 debug，默认不输出
const DEFAULT_FILTER: &str = "warn,tv_remote=info,tv_remote::prefs::writer=warn";

const LOG_FILE_PREFIX: &str = "tv-remote.log";

pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub dir: Option<PathBuf>,
    pub filter: Option<String>,
}

/// 文件日志总是开启；debug 构建额外输出到 stderr
pub fn init(data_dir: &Path, cfg: LogConfig) -> LogGuard {
    let log_dir = resolve_log_dir(data_dir, cfg.dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);
    let debug_layer = cfg!(debug_assertions).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    let _ = tracing_subscriber::registry()
        .with(build_filter(cfg.filter.as_deref()))
        .with(file_layer)
        .with(debug_layer)
        .try_init();
    tracing::info!(log_dir = %log_dir.display(), "tracing 已初始化");

    LogGuard(Some(guard))
}

/// 显式过滤优先，其次 RUST_LOG，最后是 [`DEFAULT_FILTER`]
fn build_filter(explicit: Option<&str>) -> EnvFilter {
    match explicit.map(str::trim) {
        Some(s) if !s.is_empty() => EnvFilter::new(s),
        _ => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// 日志目录不可创建时退回系统临时目录
fn resolve_log_dir(data_dir: &Path, dir: Option<PathBuf>) -> PathBuf {
    let preferred = dir.unwrap_or_else(|| data_dir.join("logs"));
    if fs::create_dir_all(&preferred).is_ok() {
        return preferred;
    }
    let fallback = std::env::temp_dir().join("tv-remote-logs");
    let _ = fs::create_dir_all(&fallback);
    fallback
}
