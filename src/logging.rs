//! Log setup. The terminal belongs to the UI, so records go to a file.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};

/// Filter used when `TDL_LOG` is unset (env_logger syntax).
const DEFAULT_FILTER: &str = "info,ureq=warn";

/// Route `log` records to `path`, appending. The filter comes from `TDL_LOG`.
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = std::env::var("TDL_LOG").unwrap_or_else(|_| DEFAULT_FILTER.into());
    env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialized")?;

    log::info!("tdl {} started", env!("CARGO_PKG_VERSION"));
    Ok(())
}
