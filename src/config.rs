use crate::cli::Cli;
use crate::logging::LogConfig;
use directories::ProjectDirs;
use std::path::PathBuf;
use tv_remote::prefs::{APP_PREFS, prefs_path};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub namespace: String,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = ProjectDirs::from("dev", "tv-remote", "tv-remote")
            .map(|p| p.data_local_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("tv-remote"));
        Self {
            data_dir,
            namespace: APP_PREFS.to_owned(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = cli.data_dir.clone() {
            cfg.data_dir = v;
        }
        if let Some(v) = cli.namespace.as_deref().map(str::trim) {
            if !v.is_empty() {
                cfg.namespace = v.to_owned();
            }
        }
        cfg.log = LogConfig {
            dir: cli.log_dir.clone(),
            filter: cli.log_filter.clone(),
        };
        cfg
    }

    pub fn prefs_file(&self) -> PathBuf {
        prefs_path(&self.data_dir, &self.namespace)
    }
}
