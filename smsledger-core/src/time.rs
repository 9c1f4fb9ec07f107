//! Date utilities: pull a partial date out of free text.
//!
//! Accepted fragments look like `12-Oct`, `12/10`, `05-Mar-24`, `5/03/2026`.
//! Day comes first, always. `03-04` is the 3rd of April, there is no locale
//! handling.

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

const DATE_FRAGMENT: &str = r"(\d{1,2})[-/]([A-Za-z]{3}|\d{2})(?:[-/](\d{2,4}))?";

fn parse_month(s: &str) -> Option<u32> {
    if let Ok(m) = s.parse::<u32>() {
        return Some(m);
    }

    let month = match s.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn parse_year(s: Option<&str>, today: NaiveDate) -> Option<i32> {
    match s {
        None => Some(today.year()),
        Some(y) if y.len() == 2 => Some(2000 + y.parse::<i32>().ok()?),
        Some(y) => y.parse().ok(),
    }
}

/// Compiled date-fragment matcher. Build once, reuse per message.
pub struct DateExtractor {
    fragment: Regex,
}

impl DateExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            fragment: Regex::new(DATE_FRAGMENT)?,
        })
    }

    /// Find the first date fragment in `text`; fall back to `today`.
    pub fn extract_with_today(&self, text: &str, today: NaiveDate) -> NaiveDate {
        let Some(caps) = self.fragment.captures(text) else {
            return today;
        };

        let day: Option<u32> = caps[1].parse().ok();
        let month = parse_month(&caps[2]);
        let year = parse_year(caps.get(3).map(|m| m.as_str()), today);

        match (year, month, day) {
            (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d).unwrap_or(today),
            _ => today,
        }
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// YYYY-MM-DD
pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
