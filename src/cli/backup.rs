use std::path::PathBuf;

use colored::Colorize;

use crate::error::Result;
use crate::fmt::format_bytes;

use super::{ensure_parent, open_store, stamped_path};

pub fn run(output: Option<String>) -> Result<()> {
    let store = open_store()?;
    let dest = output
        .map(PathBuf::from)
        .unwrap_or_else(|| stamped_path("backups", "betterspend", "db"));
    ensure_parent(&dest)?;

    store.backup_to(&dest)?;

    let size = std::fs::metadata(&dest)?.len();
    println!("{} {} ({})", "Backed up to".green(), dest.display(), format_bytes(size));
    Ok(())
}
