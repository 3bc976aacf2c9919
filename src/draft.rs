//! Editable form state shared by the Add screen, the edit modal and the CLI.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AccountType, Category, Transaction};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Merchant is required.")]
    MerchantRequired,

    #[error("Enter a number greater than 0.")]
    InvalidAmount,

    #[error("Please select a category.")]
    CategoryRequired,
}

impl ValidationError {
    /// Alert title shown above the message.
    pub fn title(self) -> &'static str {
        match self {
            ValidationError::InvalidAmount => "Invalid amount",
            ValidationError::MerchantRequired | ValidationError::CategoryRequired => "Missing info",
        }
    }
}

/// Fields as typed by the user. `date` is only carried by the edit flow; new
/// records are stamped at submission time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub merchant: String,
    pub amount: String,
    pub category: Option<Category>,
    pub account: AccountType,
    pub date: Option<DateTime<Utc>>,
    /// Stored category text outside the closed set. Cleared as soon as a
    /// category is picked.
    pub legacy_category: Option<String>,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub merchant: String,
    pub amount: f64,
    pub category: Category,
    pub account: AccountType,
    pub legacy_category: Option<String>,
}

impl TransactionDraft {
    /// Seed a draft from an existing record, amount formatted to two decimals.
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            merchant: tx.merchant.clone(),
            amount: format!("{:.2}", tx.amount),
            category: Some(tx.category),
            account: tx.account,
            date: Some(tx.date),
            legacy_category: tx.legacy_category.clone(),
        }
    }

    pub fn pick_category(&mut self, category: Category) {
        self.category = Some(category);
        self.legacy_category = None;
    }

    /// Text shown in the category field, if any.
    pub fn category_label(&self) -> Option<&str> {
        match &self.legacy_category {
            Some(raw) => Some(raw.as_str()),
            None => self.category.map(Category::as_str),
        }
    }

    /// Checks merchant, then amount, then category, stopping at the first
    /// failure.
    pub fn validate(&self) -> Result<ValidDraft, ValidationError> {
        let merchant = self.merchant.trim();
        if merchant.is_empty() {
            return Err(ValidationError::MerchantRequired);
        }
        let amount = parse_amount(&self.amount).ok_or(ValidationError::InvalidAmount)?;
        let category = self.category.ok_or(ValidationError::CategoryRequired)?;
        Ok(ValidDraft {
            merchant: merchant.to_string(),
            amount,
            category,
            account: self.account,
            legacy_category: self.legacy_category.clone(),
        })
    }
}

impl ValidDraft {
    /// A brand new record with a random id, dated `now`.
    pub fn into_new_transaction(self, now: DateTime<Utc>) -> Transaction {
        Transaction {
            id: Uuid::new_v4().to_string(),
            amount: self.amount,
            merchant: self.merchant,
            category: self.category,
            account: self.account,
            date: now,
            legacy_category: None,
        }
    }

    /// `original` with every field but `id` replaced.
    pub fn apply_to(self, original: &Transaction, date: DateTime<Utc>) -> Transaction {
        Transaction {
            id: original.id.clone(),
            amount: self.amount,
            merchant: self.merchant,
            category: self.category,
            account: self.account,
            date,
            legacy_category: self.legacy_category,
        }
    }
}

/// Parse user input as a finite, strictly positive number.
pub fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Swap the calendar date of `ts` as seen in `tz`, keeping its time-of-day
/// there. A wall-clock time skipped by a DST jump keeps the UTC time instead.
pub fn replace_date<Tz: TimeZone>(ts: DateTime<Utc>, date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let local = ts.with_timezone(tz);
    tz.from_local_datetime(&date.and_time(local.time()))
        .earliest()
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|| date.and_time(ts.time()).and_utc())
}
