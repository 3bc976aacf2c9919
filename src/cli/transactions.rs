use std::io::Write;

use chrono::{DateTime, Utc};
use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::draft::TransactionDraft;
use crate::error::{Result, SpendError};
use crate::fmt::{money, parse_timestamp, short_date};
use crate::models::{AccountType, Category};

use super::open_store;

fn parse_date_arg(value: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(value).ok_or_else(|| {
        SpendError::Other(format!(
            "Invalid date: {value} (expected YYYY-MM-DD or an RFC 3339 timestamp)"
        ))
    })
}

pub fn add(
    merchant: Option<String>,
    amount: Option<String>,
    category: Option<Category>,
    account: AccountType,
    date: Option<String>,
) -> Result<()> {
    let draft = TransactionDraft {
        merchant: merchant.unwrap_or_default(),
        amount: amount.unwrap_or_default(),
        category,
        account,
        ..Default::default()
    };
    let valid = draft.validate()?;
    let when = match date {
        Some(d) => parse_date_arg(&d)?,
        None => Utc::now(),
    };

    let store = open_store()?;
    let tx = valid.into_new_transaction(when);
    store.add(&tx)?;
    println!("{} {} {} ({})", "Added".green(), tx.merchant, money(tx.amount), tx.id);
    Ok(())
}

pub fn list() -> Result<()> {
    let store = open_store()?;
    let rows = store.list_all()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Merchant", "Amount", "Category", "Account"]);
    for tx in &rows {
        table.add_row(vec![
            Cell::new(&tx.id),
            Cell::new(short_date(&tx.date)),
            Cell::new(&tx.merchant),
            Cell::new(money(tx.amount)).set_alignment(CellAlignment::Right),
            Cell::new(tx.category_label()),
            Cell::new(tx.account.label()),
        ]);
    }
    println!("Transactions ({})\n{table}", rows.len());
    Ok(())
}

pub fn edit(
    id: &str,
    merchant: Option<String>,
    amount: Option<String>,
    category: Option<Category>,
    account: Option<AccountType>,
    date: Option<String>,
) -> Result<()> {
    let store = open_store()?;
    let original = store
        .find(id)?
        .ok_or_else(|| SpendError::NotFound(id.to_string()))?;

    let mut draft = TransactionDraft::from_transaction(&original);
    if let Some(m) = merchant {
        draft.merchant = m;
    }
    if let Some(a) = amount {
        draft.amount = a;
    }
    if let Some(c) = category {
        draft.pick_category(c);
    }
    if let Some(a) = account {
        draft.account = a;
    }
    let valid = draft.validate()?;
    let when = match date {
        Some(d) => parse_date_arg(&d)?,
        None => original.date,
    };

    let updated = valid.apply_to(&original, when);
    store.update(&updated)?;
    println!("{} {}", "Updated".green(), updated.id);
    Ok(())
}

/// True for "y" or "yes" in any case.
fn confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn delete(id: &str, yes: bool) -> Result<()> {
    let store = open_store()?;

    if !yes {
        print!("Delete transaction? This can't be undone. [y/N] ");
        std::io::stdout().flush()?;
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !confirmed(&input) {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.remove(id)?;
    println!("{} {id}", "Deleted".red());
    Ok(())
}
