//! Offline SMS parser.
//!
//! Scans the rule table in order and turns the first match into a
//! [`CandidateRecord`]. The first rule whose pattern matches decides the
//! outcome; if its fields are unusable (zero amount, empty merchant) the
//! result is a miss, later rules are not tried. A miss is `None`, which
//! callers treat as the signal to escalate to remote extraction.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::{Captures, Regex};
use smsledger_core::{classify, normalize_currency, time, CandidateRecord, DateExtractor};

use crate::rules::SMS_RULES;
use crate::types::{ExtractionRule, MerchantCapture};

struct CompiledRule {
    rule: &'static ExtractionRule,
    regex: Regex,
}

/// The rule table, compiled once. Immutable after construction.
pub struct SmsParser {
    rules: Vec<CompiledRule>,
    dates: DateExtractor,
}

impl SmsParser {
    pub fn new() -> Result<Self> {
        let rules = SMS_RULES
            .iter()
            .map(|rule| {
                let regex = Regex::new(rule.pattern)
                    .with_context(|| format!("compile sms rule {}", rule.name))?;
                Ok(CompiledRule { rule, regex })
            })
            .collect::<Result<Vec<_>>>()?;
        let dates = DateExtractor::new().context("compile date pattern")?;
        Ok(Self { rules, dates })
    }

    /// Parse with the local clock as the date fallback
    pub fn parse(&self, text: &str) -> Option<CandidateRecord> {
        self.parse_with_today(text, time::today())
    }

    pub fn parse_with_today(&self, text: &str, today: NaiveDate) -> Option<CandidateRecord> {
        let clean = normalize_text(text);
        let (rule, caps) = self.first_match(&clean)?;
        let record = self.build_record(rule, &caps, &clean, today);
        match &record {
            Some(_) => log::debug!("sms rule {} matched", rule.name),
            None => log::debug!("sms rule {} matched but fields were unusable", rule.name),
        }
        record
    }

    /// Name of the first rule whose pattern matches, usable fields or not
    pub fn matched_rule(&self, text: &str) -> Option<&'static str> {
        let clean = normalize_text(text);
        self.first_match(&clean).map(|(rule, _)| rule.name)
    }

    fn first_match<'t>(&self, clean: &'t str) -> Option<(&'static ExtractionRule, Captures<'t>)> {
        self.rules
            .iter()
            .find_map(|compiled| compiled.regex.captures(clean).map(|caps| (compiled.rule, caps)))
    }

    fn build_record(
        &self,
        rule: &ExtractionRule,
        caps: &Captures<'_>,
        clean: &str,
        today: NaiveDate,
    ) -> Option<CandidateRecord> {
        let amount = parse_amount(caps.get(rule.amount)?.as_str())?;

        let currency_raw = rule
            .currency
            .and_then(|g| caps.get(g))
            .map(|m| m.as_str());
        let currency = normalize_currency(currency_raw);

        // Fixed merchants are classified on the matched phrase ("Salary of ... credited").
        let (merchant, classify_on) = match rule.merchant {
            MerchantCapture::Group(g) => {
                let m = clean_merchant(caps.get(g)?.as_str());
                (m.clone(), m)
            }
            MerchantCapture::Fixed(literal) => (literal.to_string(), caps[0].to_string()),
        };
        if merchant.is_empty() {
            return None;
        }

        Some(CandidateRecord {
            amount,
            currency,
            merchant,
            category: classify(&classify_on, rule.direction),
            direction: rule.direction,
            date: self.dates.extract_with_today(clean, today),
        })
    }
}

/// One-shot helper: compile the rules and parse `text`.
pub fn parse_locally(text: &str) -> Result<Option<CandidateRecord>> {
    Ok(SmsParser::new()?.parse(text))
}

fn normalize_text(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}

/// "1,234.50" -> 1234.5. Parses the longest leading decimal, so a trailing
/// sentence period is ignored. Leading dots ("Rs.500") are dropped.
fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "");
    let s = s.trim_start_matches('.');

    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }

    let amount: f64 = s[..end].parse().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

fn clean_merchant(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(['.', ','])
        .trim()
        .to_string()
}
