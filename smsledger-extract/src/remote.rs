//! Contract with the remote (language-model) extractor.
//!
//! The core only hands over the message text and an optional sender hint
//! and expects a flat JSON object back. Prompt wording is up to the
//! implementation.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smsledger_core::{normalize_currency, CandidateRecord, Category, Direction};
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRequest {
    pub sms_text: String,
    pub sender_hint: Option<String>,
}

impl RemoteRequest {
    pub fn new(sms_text: &str, sender_hint: Option<&str>) -> Self {
        Self {
            sms_text: sms_text.to_string(),
            sender_hint: sender_hint
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// Raw record as the remote extractor returns it, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub amount: f64,
    pub currency: String,
    pub merchant: String,
    pub category: String,
    #[serde(alias = "type")]
    pub direction: Direction,
    /// YYYY-MM-DD
    pub date: String,
}

impl RemoteRecord {
    /// Validate and convert. Unknown category labels degrade to `Other`;
    /// everything else that breaks a record invariant is an error.
    pub fn into_candidate(self) -> Result<CandidateRecord> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            bail!("amount must be positive, got {}", self.amount);
        }

        let merchant = self.merchant.trim().to_string();
        if merchant.is_empty() {
            bail!("merchant is empty");
        }

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid date '{}'", self.date))?;

        let category = Category::from_label(&self.category).unwrap_or_else(|| {
            log::warn!("remote returned unknown category '{}', using Other", self.category);
            Category::Other
        });

        Ok(CandidateRecord {
            amount: self.amount,
            currency: normalize_currency(Some(&self.currency)),
            merchant,
            category,
            direction: self.direction,
            date,
        })
    }
}

/// Something that can turn an SMS into a [`RemoteRecord`] over the network.
///
/// One call is one request; implementations own their transport timeout.
pub trait RemoteExtractor {
    fn extract(&self, request: &RemoteRequest) -> impl Future<Output = Result<RemoteRecord>> + Send;
}

/// Parse a model response into a [`RemoteRecord`].
/// Tolerates a Markdown code fence around the JSON, nothing else.
pub fn parse_remote_json(raw: &str) -> Result<RemoteRecord> {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if !cleaned.starts_with('{') {
        let preview: String = raw.chars().take(200).collect();
        return Err(anyhow!("response is not a JSON object: {preview}"));
    }

    serde_json::from_str(cleaned).context("parse remote extractor JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(category: &str) -> RemoteRecord {
        RemoteRecord {
            amount: 49.99,
            currency: "eur".to_string(),
            merchant: "  Zara ".to_string(),
            category: category.to_string(),
            direction: Direction::Expense,
            date: "2026-03-05".to_string(),
        }
    }

    #[test]
    fn test_into_candidate_normalizes_fields() {
        let c = remote("shopping").into_candidate().unwrap();
        assert_eq!(c.currency, "EUR");
        assert_eq!(c.merchant, "Zara");
        assert_eq!(c.category, Category::Shopping);
        assert_eq!(c.date, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
    }

    #[test]
    fn test_unknown_category_degrades_to_other() {
        let c = remote("Clothing").into_candidate().unwrap();
        assert_eq!(c.category, Category::Other);
    }

    #[test]
    fn test_invalid_fields_are_rejected() {
        let mut r = remote("Shopping");
        r.amount = 0.0;
        assert!(r.into_candidate().is_err());

        let mut r = remote("Shopping");
        r.merchant = "   ".to_string();
        assert!(r.into_candidate().is_err());

        let mut r = remote("Shopping");
        r.date = "05/03/2026".to_string();
        assert!(r.into_candidate().is_err());
    }

    #[test]
    fn test_parse_remote_json_accepts_type_key_and_fences() {
        let raw = "```json\n{\"amount\": 500, \"currency\": \"INR\", \"merchant\": \"Boss\", \"category\": \"Other\", \"type\": \"income\", \"date\": \"2026-10-01\"}\n```";
        let r = parse_remote_json(raw).unwrap();
        assert_eq!(r.amount, 500.0);
        assert_eq!(r.direction, Direction::Income);
    }

    #[test]
    fn test_parse_remote_json_rejects_prose() {
        assert!(parse_remote_json("Sure! Here is the transaction: ...").is_err());
        assert!(parse_remote_json("{\"amount\": 5}").is_err());
        assert!(parse_remote_json("{\"amount\": 5, \"currency\": \"USD\", \"merchant\": \"X\", \"category\": \"Other\", \"type\": \"refund\", \"date\": \"2026-01-01\"}").is_err());
    }

    #[test]
    fn test_request_drops_blank_sender() {
        assert_eq!(RemoteRequest::new("hi", Some("  ")).sender_hint, None);
        assert_eq!(RemoteRequest::new("hi", Some(" HDFC ")).sender_hint.as_deref(), Some("HDFC"));
    }
}
