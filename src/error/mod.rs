//! 统一错误处理模块
//!
//! 提供设置存储与启动流程的结构化错误类型，替代 String 错误。

mod app;
mod backend;
mod settings;

pub use app::AppError;
pub use backend::BackendError;
pub use settings::SettingsError;
