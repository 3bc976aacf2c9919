use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::fmt::iso_timestamp;
use crate::models::Transaction;

use super::{ensure_parent, open_store, stamped_path};

#[derive(Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    date: String,
    merchant: &'a str,
    amount: String,
    category: &'a str,
    account: &'static str,
}

impl<'a> From<&'a Transaction> for ExportRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            id: &tx.id,
            date: iso_timestamp(&tx.date),
            merchant: &tx.merchant,
            amount: format!("{:.2}", tx.amount),
            category: tx.category_label(),
            account: tx.account.as_str(),
        }
    }
}

fn write_csv<W: Write>(rows: &[Transaction], out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for tx in rows {
        wtr.serialize(ExportRow::from(tx))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run(output: Option<String>) -> Result<()> {
    let store = open_store()?;
    let rows = store.list_all()?;

    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| stamped_path("exports", "transactions", "csv"));
    ensure_parent(&path)?;
    write_csv(&rows, std::fs::File::create(&path)?)?;

    println!("Exported {} transactions to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, Category};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_csv_layout() {
        let rows = vec![Transaction {
            id: "abc".to_string(),
            amount: 20.5,
            merchant: "Walmart, Inc".to_string(),
            category: Category::Groceries,
            account: AccountType::Credit,
            date: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
            legacy_category: None,
        }];
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,date,merchant,amount,category,account"));
        assert_eq!(
            lines.next(),
            Some("abc,2024-01-05T00:00:00.000Z,\"Walmart, Inc\",20.50,Groceries,credit")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_export_has_no_rows() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        assert!(buf.is_empty());
    }
}
