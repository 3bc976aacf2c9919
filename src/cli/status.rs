use crate::db::{Store, DB_FILENAME};
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::get_data_dir;

pub fn run() -> Result<()> {
    let data_dir = get_data_dir();
    let db_path = data_dir.join(DB_FILENAME);

    println!("Data dir:      {}", data_dir.display());
    println!("Database:      {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:       {}", format_bytes(size));

        let store = Store::new(db_path.clone());
        store.initialize()?;
        println!();
        println!("Transactions:  {}", store.count()?);
    } else {
        println!();
        println!("Database not found. Run `betterspend init` to set up.");
    }

    Ok(())
}
