//! Finance record types shared by the local parser, the remote extractor and the store

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which way money moved
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Income => "income",
            Direction::Expense => "expense",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Closed set of transaction categories. `Other` is the universal fallback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodDining,
    #[serde(rename = "Transport")]
    Transport,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Utilities")]
    Utilities,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Health")]
    Health,
    #[serde(rename = "Salary")]
    Salary,
    #[serde(rename = "Investment")]
    Investment,
    #[serde(rename = "Transfer")]
    Transfer,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::FoodDining,
        Category::Transport,
        Category::Shopping,
        Category::Utilities,
        Category::Entertainment,
        Category::Health,
        Category::Salary,
        Category::Investment,
        Category::Transfer,
        Category::Other,
    ];

    /// Display label, identical to the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodDining => "Food & Dining",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Salary => "Salary",
            Category::Investment => "Investment",
            Category::Transfer => "Transfer",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive lookup by label
    pub fn from_label(s: &str) -> Option<Category> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A transaction extracted from one notification text.
///
/// Built fresh per parse attempt. The only change allowed afterwards is the
/// sender-rule category override (see [`CandidateRecord::with_category`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateRecord {
    /// Always > 0
    pub amount: f64,
    /// 3-letter code (best effort, not validated against ISO-4217)
    pub currency: String,
    pub merchant: String,
    pub category: Category,
    pub direction: Direction,
    /// Serialized as YYYY-MM-DD
    pub date: NaiveDate,
}

impl CandidateRecord {
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }
}

/// Per-sender settings ("trusted senders").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SenderRule {
    pub id: String,
    /// e.g. "HDFC-BANK", "Venmo"; matched case-insensitively
    pub sender_name: String,
    pub auto_process: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_category: Option<Category>,
}

impl SenderRule {
    /// New rule with a fresh id and auto-processing on
    pub fn new(sender_name: &str, default_category: Option<Category>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_name: sender_name.trim().to_string(),
            auto_process: true,
            default_category,
        }
    }

    pub fn matches(&self, sender: &str) -> bool {
        let sender = sender.trim();
        !sender.is_empty() && self.sender_name.trim().to_lowercase() == sender.to_lowercase()
    }
}

/// A persisted transaction, as the record store keeps it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    /// Merchant or free-form description
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_sms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl TransactionRecord {
    pub fn from_candidate(candidate: CandidateRecord, raw_sms: Option<&str>, sender: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount: candidate.amount,
            currency: candidate.currency,
            description: candidate.merchant,
            category: candidate.category,
            direction: candidate.direction,
            date: candidate.date,
            raw_sms: raw_sms.map(str::to_string),
            sender: sender
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    /// Signed amount: income positive, expense negative
    pub fn signed_amount(&self) -> f64 {
        match self.direction {
            Direction::Income => self.amount,
            Direction::Expense => -self.amount,
        }
    }
}
