use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountType {
    #[default]
    Debit,
    Credit,
    Cash,
}

impl AccountType {
    pub const ALL: [AccountType; 3] = [AccountType::Debit, AccountType::Credit, AccountType::Cash];

    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Debit => "debit",
            AccountType::Credit => "credit",
            AccountType::Cash => "cash",
        }
    }

    /// Capitalized form for display: "Debit", "Credit", "Cash".
    pub fn label(self) -> &'static str {
        match self {
            AccountType::Debit => "Debit",
            AccountType::Credit => "Credit",
            AccountType::Cash => "Cash",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(AccountType::Debit),
            "credit" => Ok(AccountType::Credit),
            "cash" => Ok(AccountType::Cash),
            other => Err(format!("Unknown account type: {other} (expected debit, credit or cash)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Groceries,
    Rent,
    Dining,
    Gas,
    Entertainment,
    Utilities,
    Shopping,
    Travel,
    Health,
    Other,
}

impl Category {
    /// Picker order.
    pub const ALL: [Category; 10] = [
        Category::Groceries,
        Category::Rent,
        Category::Dining,
        Category::Gas,
        Category::Entertainment,
        Category::Utilities,
        Category::Shopping,
        Category::Travel,
        Category::Health,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Rent => "Rent",
            Category::Dining => "Dining",
            Category::Gas => "Gas",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::Shopping => "Shopping",
            Category::Travel => "Travel",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }

    /// Map a stored category to the closed set. Rows written by the freeform
    /// category field may hold anything; those read as `Other` and the raw
    /// text is handed back so it can be written out again unchanged.
    pub fn from_stored(value: String) -> (Self, Option<String>) {
        match value.parse() {
            Ok(category) => (category, None),
            Err(_) => {
                tracing::warn!(category = %value, "unknown stored category, reading as Other");
                (Category::Other, Some(value))
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("Unknown category: {needle}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub merchant: String,
    pub category: Category,
    pub account: AccountType,
    pub date: DateTime<Utc>,
    /// Stored category text outside the closed set, kept verbatim.
    pub legacy_category: Option<String>,
}

impl Transaction {
    /// Category as stored and shown.
    pub fn category_label(&self) -> &str {
        self.legacy_category
            .as_deref()
            .unwrap_or_else(|| self.category.as_str())
    }
}
