mod cli;
mod config;
mod logging;

use clap::Parser;
use cli::{Cli, Command, PrefsCommand};
use config::AppConfig;
use std::sync::Arc;
use tv_remote::error::AppError;
use tv_remote::prefs::{JsonFileBackend, PrefKey, PrefValue, SettingsStore};

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let cfg = AppConfig::from_cli(&cli);

    let _log_guard = logging::init(&cfg.data_dir, cfg.log.clone());
    tracing::info!(data_dir = %cfg.data_dir.display(), namespace = %cfg.namespace, "tv-remote 启动");

    let command = match cli.command {
        Command::Path => {
            println!("{}", cfg.prefs_file().display());
            return Ok(());
        }
        Command::Prefs(command) => command,
    };

    // 初始化失败直接终止启动
    let store = Arc::new(SettingsStore::new());
    store.initialize(JsonFileBackend::new(&cfg.data_dir, cfg.namespace.as_str()))?;

    run(&store, command)?;
    store.flush()?;
    Ok(())
}

fn run(store: &SettingsStore, command: PrefsCommand) -> Result<(), AppError> {
    match command {
        PrefsCommand::List => {
            for (key, value) in store.snapshot()? {
                println!("{key}={}", display_value(value));
            }
        }
        PrefsCommand::Get { key } => {
            let key: PrefKey = key.parse()?;
            println!("{}", display_value(store.get(key)?));
        }
        PrefsCommand::Set { key, value } => {
            let key: PrefKey = key.parse()?;
            let value = PrefValue::parse_for(key, &value)?;
            tracing::info!(%key, %value, "写入设置");
            store.set(key, value)?;
        }
        PrefsCommand::Unset { key } => {
            let key: PrefKey = key.parse()?;
            tracing::info!(%key, "删除设置");
            store.unset(key)?;
        }
        PrefsCommand::Reset => store.reset()?,
    }
    Ok(())
}

fn display_value(value: Option<PrefValue>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
