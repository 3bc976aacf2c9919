use std::path::PathBuf;

use colored::Colorize;

use crate::db::{Store, DB_FILENAME};
use crate::error::Result;
use crate::logging;
use crate::settings::{load_settings, save_settings, settings_file_exists, shellexpand_path, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    } else if !settings_file_exists() && settings == Settings::default() {
        // First run: offer to pick a different location.
        println!("Data directory [{}]: ", settings.data_dir);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok();
        let chosen = input.trim();
        if !chosen.is_empty() {
            settings.data_dir = shellexpand_path(chosen);
        }
    }

    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;
    std::fs::create_dir_all(resolved.join("exports"))?;
    std::fs::create_dir_all(resolved.join("backups"))?;
    logging::init(&resolved);

    Store::new(resolved.join(DB_FILENAME)).initialize()?;

    println!("{} BetterSpend at {}", "Initialized".green(), resolved.display());
    Ok(())
}
