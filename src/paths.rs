//! Default locations of the files the client reads and writes.

/// Resolve the config file path.
/// Checks `TDL_CONFIG` env var, falls back to `$HOME/.tdl/config.toml`.
pub fn config_path() -> String {
    std::env::var("TDL_CONFIG").unwrap_or_else(|_| format!("{}/config.toml", base_dir()))
}

/// Resolve the log file path.
/// Checks `TDL_LOG_FILE` env var, falls back to `$HOME/.tdl/tdl.log`.
pub fn log_path() -> String {
    std::env::var("TDL_LOG_FILE").unwrap_or_else(|_| format!("{}/tdl.log", base_dir()))
}

fn base_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    format!("{home}/.tdl")
}
