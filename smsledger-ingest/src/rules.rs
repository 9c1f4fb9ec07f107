//! The SMS rule table.
//!
//! Order matters: the matcher takes the first rule whose pattern matches,
//! there is no scoring. Put more specific phrasings first.
//!
//! Shapes covered:
//!   Paid USD 12.50 to Starbucks on 12-Oct      (paid-to)
//!   Purchase of $50 at Walmart                 (spent-at)
//!   Acct XX123 debited for $20.00 info: MCD    (debited-ref)
//!   Received ₹500 from Boss                    (received-from)
//!   Salary of $5000 credited                   (salary-credited)

use smsledger_core::Direction;

use crate::types::{ExtractionRule, MerchantCapture};

/// Placeholder merchant for income messages that name no payer
pub const EMPLOYER_PLACEHOLDER: &str = "Employer/Bank";

pub static SMS_RULES: [ExtractionRule; 5] = [
    ExtractionRule {
        name: "paid-to",
        direction: Direction::Expense,
        pattern: concat!(
            r"(?i)(?:paid|sent|transfer|transferred)\s+",
            r"([A-Za-z$€£₹₵]+)?\s?([\d,.]+)\s+",
            r"(?:to|at)\s+([A-Za-z0-9\s.&]+)(?:\s+on|$)"
        ),
        amount: 2,
        currency: Some(1),
        merchant: MerchantCapture::Group(3),
    },
    ExtractionRule {
        name: "spent-at",
        direction: Direction::Expense,
        pattern: concat!(
            r"(?i)(?:transaction|purchase|spent|debited)\s+(?:(?:of|for)\s+)?",
            r"([A-Za-z$€£₹₵]+)?\s?([\d,.]+)\s+",
            r"(?:at|to|on)\s+([A-Za-z0-9\s.&]+)"
        ),
        amount: 2,
        currency: Some(1),
        merchant: MerchantCapture::Group(3),
    },
    ExtractionRule {
        name: "debited-ref",
        direction: Direction::Expense,
        pattern: concat!(
            r"(?i)(?:debited|withdrawn)\s+(?:(?:for|of)\s+)?",
            r"([A-Za-z$€£₹₵]+)?\s?([\d,.]+)",
            r"(?:.*info:|.*at|.*ref:)\s+([A-Za-z0-9\s.&]+)"
        ),
        amount: 2,
        currency: Some(1),
        merchant: MerchantCapture::Group(3),
    },
    ExtractionRule {
        name: "received-from",
        direction: Direction::Income,
        pattern: concat!(
            r"(?i)(?:received|credited)\s+(?:with\s+)?",
            r"([A-Za-z$€£₹₵]+)?\s?([\d,.]+)\s+",
            r"(?:from|by)\s+([A-Za-z0-9\s.&]+)"
        ),
        amount: 2,
        currency: Some(1),
        merchant: MerchantCapture::Group(3),
    },
    ExtractionRule {
        name: "salary-credited",
        direction: Direction::Income,
        pattern: concat!(
            r"(?i)(?:salary|dividend)\s+(?:of\s+)?",
            r"([A-Za-z$€£₹₵]+)?\s?([\d,.]+)\s+",
            r"(?:credited|received)"
        ),
        amount: 2,
        currency: Some(1),
        merchant: MerchantCapture::Fixed(EMPLOYER_PLACEHOLDER),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_all_patterns_compile() {
        for rule in &SMS_RULES {
            let re = Regex::new(rule.pattern).unwrap();
            assert!(re.captures_len() > rule.amount, "{}: amount group out of range", rule.name);
            if let Some(c) = rule.currency {
                assert!(re.captures_len() > c, "{}: currency group out of range", rule.name);
            }
            if let MerchantCapture::Group(g) = rule.merchant {
                assert!(re.captures_len() > g, "{}: merchant group out of range", rule.name);
            }
        }
    }

    #[test]
    fn test_rule_names_are_unique() {
        let mut names: Vec<_> = SMS_RULES.iter().map(|r| r.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SMS_RULES.len());
    }
}
