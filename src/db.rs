use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::backup::Backup;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::error::{Result, SpendError};
use crate::fmt::{iso_timestamp, parse_timestamp};
use crate::models::{AccountType, Category, Transaction};

pub const DB_FILENAME: &str = "betterspend.db";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY NOT NULL,
    amount REAL NOT NULL,
    merchant TEXT NOT NULL,
    category TEXT NOT NULL,
    account TEXT NOT NULL,
    date TEXT NOT NULL
);
";

const SELECT_COLUMNS: &str = "SELECT id, amount, merchant, category, account, date FROM transactions";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

/// Handle to the transactions database.
///
/// Constructing a `Store` does not touch disk. `initialize` opens the file
/// and creates the schema exactly once; every other operation fails with
/// [`SpendError::Uninitialized`] until it has succeeded.
pub struct Store {
    path: PathBuf,
    conn: OnceCell<Connection>,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_initialized(&self) -> bool {
        self.conn.get().is_some()
    }

    pub fn initialize(&self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }
        let conn = get_connection(&self.path)?;
        conn.execute_batch(SCHEMA)?;
        // Single-threaded: nothing can have filled the cell since the check above.
        let _ = self.conn.set(conn);
        tracing::info!(path = %self.path.display(), "database initialized");
        Ok(())
    }

    pub(crate) fn conn(&self) -> Result<&Connection> {
        self.conn.get().ok_or(SpendError::Uninitialized)
    }

    pub fn add(&self, tx: &Transaction) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO transactions (id, amount, merchant, category, account, date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                tx.id,
                tx.amount,
                tx.merchant,
                tx.category_label(),
                tx.account.as_str(),
                iso_timestamp(&tx.date),
            ],
        )?;
        tracing::info!(id = %tx.id, "added transaction");
        Ok(())
    }

    /// All transactions, most recent first.
    pub fn list_all(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY date DESC"))?;
        let rows = stmt
            .query_map([], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn find(&self, id: &str) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [id], row_to_transaction)
            .optional()?;
        Ok(row)
    }

    /// Replace every field but `id`. Returns the number of rows touched; an
    /// unknown id touches none and is not an error.
    pub fn update(&self, tx: &Transaction) -> Result<usize> {
        let changed = self.conn()?.execute(
            "UPDATE transactions SET amount = ?1, merchant = ?2, category = ?3, account = ?4, date = ?5 \
             WHERE id = ?6",
            rusqlite::params![
                tx.amount,
                tx.merchant,
                tx.category_label(),
                tx.account.as_str(),
                iso_timestamp(&tx.date),
                tx.id,
            ],
        )?;
        tracing::info!(id = %tx.id, changed, "updated transaction");
        Ok(changed)
    }

    pub fn remove(&self, id: &str) -> Result<()> {
        let changed = self
            .conn()?
            .execute("DELETE FROM transactions WHERE id = ?1", [id])?;
        tracing::info!(id, changed, "removed transaction");
        Ok(())
    }

    /// Copy the live database to `dest` with SQLite's online backup API.
    pub fn backup_to(&self, dest: &Path) -> Result<()> {
        let src = self.conn()?;
        let mut dest_conn = Connection::open(dest)?;
        Backup::new(src, &mut dest_conn)?.run_to_completion(
            64,
            Duration::from_millis(5),
            None,
        )?;
        tracing::info!(dest = %dest.display(), "database backed up");
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn()?
            .query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        Ok(count)
    }
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let category: String = row.get(3)?;
    let account: String = row.get(4)?;
    let date: String = row.get(5)?;
    let (category, legacy_category) = Category::from_stored(category);
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        merchant: row.get(2)?,
        category,
        account: account.parse::<AccountType>().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
        })?,
        date: parse_timestamp(&date).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("invalid timestamp: {date}").into(),
            )
        })?,
        legacy_category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("test.db"));
        store.initialize().unwrap();
        (dir, store)
    }

    fn txn(id: &str, merchant: &str, amount: f64, category: Category, account: AccountType, ymd: (i32, u32, u32)) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount,
            merchant: merchant.to_string(),
            category,
            account,
            date: Utc.with_ymd_and_hms(ymd.0, ymd.1, ymd.2, 0, 0, 0).unwrap(),
            legacy_category: None,
        }
    }

    #[test]
    fn test_operations_fail_before_initialize() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("test.db"));
        assert!(matches!(store.list_all(), Err(SpendError::Uninitialized)));
        assert!(matches!(store.remove("x"), Err(SpendError::Uninitialized)));
        let t = txn("a", "Walmart", 1.0, Category::Other, AccountType::Cash, (2024, 1, 1));
        assert!(matches!(store.add(&t), Err(SpendError::Uninitialized)));
        assert!(matches!(store.update(&t), Err(SpendError::Uninitialized)));
        assert!(!dir.path().join("test.db").exists());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_dir, store) = test_store();
        store.initialize().unwrap();
        store.initialize().unwrap();
        assert!(store.is_initialized());
        assert_eq!(store.list_all().unwrap().len(), 0);
    }

    #[test]
    fn test_initialize_creates_table_and_wal() {
        let (_dir, store) = test_store();
        let conn = store.conn().unwrap();
        let name: String = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type='table' AND name='transactions'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(name, "transactions");
        let mode: String = conn.query_row("PRAGMA journal_mode", [], |r| r.get(0)).unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_initialize_reopens_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        {
            let store = Store::new(&path);
            store.initialize().unwrap();
            store
                .add(&txn("a", "Walmart", 20.99, Category::Groceries, AccountType::Credit, (2024, 1, 1)))
                .unwrap();
        }
        let store = Store::new(&path);
        store.initialize().unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_add_then_list_contains_record_once() {
        let (_dir, store) = test_store();
        let t = txn("a", "Walmart", 20.99, Category::Groceries, AccountType::Credit, (2024, 1, 1));
        store.add(&t).unwrap();
        let all = store.list_all().unwrap();
        assert_eq!(all.iter().filter(|r| **r == t).count(), 1);
    }

    #[test]
    fn test_add_duplicate_id_fails() {
        let (_dir, store) = test_store();
        let t = txn("a", "Walmart", 20.99, Category::Groceries, AccountType::Credit, (2024, 1, 1));
        store.add(&t).unwrap();
        assert!(matches!(store.add(&t), Err(SpendError::Db(_))));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_list_orders_by_date_descending() {
        let (_dir, store) = test_store();
        store
            .add(&txn("w", "Walmart", 20.99, Category::Groceries, AccountType::Credit, (2024, 1, 1)))
            .unwrap();
        store
            .add(&txn("s", "Shell", 40.00, Category::Gas, AccountType::Debit, (2024, 2, 1)))
            .unwrap();
        let all = store.list_all().unwrap();
        let merchants: Vec<&str> = all.iter().map(|t| t.merchant.as_str()).collect();
        assert_eq!(merchants, vec!["Shell", "Walmart"]);
    }

    #[test]
    fn test_earliest_insert_is_listed_last() {
        let (_dir, store) = test_store();
        for (i, month) in [3u32, 5, 4].iter().enumerate() {
            store
                .add(&txn(&format!("t{i}"), "Shop", 1.0, Category::Shopping, AccountType::Cash, (2024, *month, 1)))
                .unwrap();
        }
        store
            .add(&txn("early", "Early", 1.0, Category::Other, AccountType::Cash, (2023, 12, 31)))
            .unwrap();
        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all.last().unwrap().id, "early");
        assert!(all.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_list_empty() {
        let (_dir, store) = test_store();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_update_replaces_fields_keeps_id() {
        let (_dir, store) = test_store();
        let t = txn("a", "Walmart", 20.99, Category::Groceries, AccountType::Credit, (2024, 1, 1));
        store.add(&t).unwrap();
        let edited = txn("a", "Target", 35.5, Category::Shopping, AccountType::Cash, (2024, 3, 9));
        assert_eq!(store.update(&edited).unwrap(), 1);
        let all = store.list_all().unwrap();
        assert_eq!(all, vec![edited]);
    }

    #[test]
    fn test_update_unknown_id_leaves_table_unchanged() {
        let (_dir, store) = test_store();
        let t = txn("a", "Walmart", 20.99, Category::Groceries, AccountType::Credit, (2024, 1, 1));
        store.add(&t).unwrap();
        let ghost = txn("ghost", "Nobody", 1.0, Category::Other, AccountType::Debit, (2024, 1, 1));
        assert_eq!(store.update(&ghost).unwrap(), 0);
        assert_eq!(store.list_all().unwrap(), vec![t]);
    }

    #[test]
    fn test_remove_deletes_row() {
        let (_dir, store) = test_store();
        let t = txn("a", "Walmart", 20.99, Category::Groceries, AccountType::Credit, (2024, 1, 1));
        store.add(&t).unwrap();
        store.remove("a").unwrap();
        assert!(store.list_all().unwrap().iter().all(|r| r.id != "a"));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let (_dir, store) = test_store();
        let t = txn("a", "Walmart", 20.99, Category::Groceries, AccountType::Credit, (2024, 1, 1));
        store.add(&t).unwrap();
        store.remove("never-inserted").unwrap();
        assert_eq!(store.list_all().unwrap(), vec![t]);
    }

    #[test]
    fn test_find() {
        let (_dir, store) = test_store();
        let t = txn("a", "Walmart", 20.99, Category::Groceries, AccountType::Credit, (2024, 1, 1));
        store.add(&t).unwrap();
        assert_eq!(store.find("a").unwrap(), Some(t));
        assert_eq!(store.find("b").unwrap(), None);
    }

    #[test]
    fn test_dates_stored_as_iso_strings() {
        let (_dir, store) = test_store();
        let t = txn("a", "Walmart", 20.99, Category::Groceries, AccountType::Credit, (2024, 1, 1));
        store.add(&t).unwrap();
        let raw: String = store
            .conn()
            .unwrap()
            .query_row("SELECT date FROM transactions WHERE id = 'a'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(raw, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_legacy_freeform_category_reads_as_other() {
        let (_dir, store) = test_store();
        insert_coffee_row(&store);
        let all = store.list_all().unwrap();
        assert_eq!(all[0].category, Category::Other);
        assert_eq!(all[0].category_label(), "Coffee");
    }

    fn insert_coffee_row(store: &Store) {
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO transactions (id, amount, merchant, category, account, date) \
                 VALUES ('old', 4.5, 'Cafe', 'Coffee', 'cash', '2023-06-01T12:00:00.000Z')",
                [],
            )
            .unwrap();
    }

    fn stored_category(store: &Store, id: &str) -> String {
        store
            .conn()
            .unwrap()
            .query_row("SELECT category FROM transactions WHERE id = ?1", [id], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn test_backup_copies_rows() {
        let (dir, store) = test_store();
        store
            .add(&txn("a", "Walmart", 20.99, Category::Groceries, AccountType::Credit, (2024, 1, 1)))
            .unwrap();
        let dest = dir.path().join("copy.db");
        store.backup_to(&dest).unwrap();

        let copy = Store::new(&dest);
        copy.initialize().unwrap();
        assert_eq!(copy.list_all().unwrap()[0].merchant, "Walmart");
    }

    #[test]
    fn test_backup_requires_initialize() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("test.db"));
        assert!(matches!(
            store.backup_to(&dir.path().join("copy.db")),
            Err(SpendError::Uninitialized)
        ));
    }

    #[test]
    fn test_update_keeps_legacy_category_text() {
        let (_dir, store) = test_store();
        insert_coffee_row(&store);
        let mut tx = store.find("old").unwrap().unwrap();
        tx.amount = 5.0;
        store.update(&tx).unwrap();
        assert_eq!(stored_category(&store, "old"), "Coffee");
    }
}
