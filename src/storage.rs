//! On-disk output: rendered cards, JSON exports and the TUI log file.

use crate::model::{LookupRecord, LookupResult};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "pokedex-lookup";

fn base_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .context("no data directory available on this platform")?;
    Ok(base.join(APP_DIR))
}

pub fn cards_dir() -> Result<PathBuf> {
    Ok(base_dir()?.join("cards"))
}

pub fn log_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("pokedex-lookup.log"))
}

/// File name for a saved card, e.g. `25-pikachu.html`.
pub fn card_file_name(result: &LookupResult) -> String {
    let safe: String = result
        .name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}-{}.html", result.id, safe)
}

/// Save a rendered card into the data directory and return its path.
pub fn save_card(result: &LookupResult, html: &str) -> Result<PathBuf> {
    let path = cards_dir()?.join(card_file_name(result));
    write_html(&path, html)?;
    Ok(path)
}

pub fn write_html(path: &Path, html: &str) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, html).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn export_json(path: &Path, record: &LookupRecord) -> Result<()> {
    ensure_parent(path)?;
    let data = serde_json::to_vec_pretty(record).context("serialize lookup record")?;
    std::fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    Ok(())
}
