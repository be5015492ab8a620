use std::path::PathBuf;

use anyhow::Context;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "INVOICER_DATA_DIR";

const APP_DIR: &str = "invoicer";

/// Runtime configuration for the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the three state files.
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve configuration: `--data-dir` flag, then `INVOICER_DATA_DIR`,
    /// then `{app_data_dir}/invoicer`.
    pub fn resolve(flag: Option<PathBuf>) -> anyhow::Result<Self> {
        let env = std::env::var(DATA_DIR_ENV).ok();
        let data_dir = match (flag, env) {
            (Some(dir), _) => dir,
            (None, Some(dir)) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };
        Ok(Self { data_dir })
    }
}

fn default_data_dir() -> anyhow::Result<PathBuf> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;
    dir.push(APP_DIR);
    Ok(dir)
}
