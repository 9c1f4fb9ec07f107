//! smsledger-core: transaction types, currency/date normalization and category heuristics

pub mod currency;
pub mod finance;
pub mod time;

pub use currency::{normalize_currency, DEFAULT_CURRENCY};
pub use finance::{CandidateRecord, Category, Direction, SenderRule, TransactionRecord};
pub use time::{to_iso, DateExtractor};

/// Keyword heuristics mapping a merchant string to a category
pub mod categorizer {
    use super::{Category, Direction};

    /// Expense keyword groups. Checked in this order, first hit wins.
    const EXPENSE_GROUPS: &[(Category, &[&str])] = &[
        (Category::Transport, &["uber", "lyft", "fuel", "shell", "metro"]),
        (
            Category::FoodDining,
            &["food", "burger", "pizza", "cafe", "coffee", "starbucks", "mcdonald"],
        ),
        (Category::Shopping, &["market", "mart", "grocery", "whole foods"]),
        (Category::Entertainment, &["netflix", "spotify", "cinema"]),
        (Category::Health, &["pharmacy", "doctor", "hospital", "cvs"]),
        (Category::Utilities, &["electric", "water", "bill", "mobile"]),
    ];

    /// Income keyword groups. Refunds are deliberately `Other`.
    const INCOME_GROUPS: &[(Category, &[&str])] = &[
        (Category::Salary, &["salary", "payroll"]),
        (Category::Other, &["refund", "return"]),
        (Category::Investment, &["interest"]),
    ];

    /// Classify a merchant/description for the given direction.
    pub fn classify(merchant: &str, direction: Direction) -> Category {
        let m = merchant.to_lowercase();
        let groups = match direction {
            Direction::Income => INCOME_GROUPS,
            Direction::Expense => EXPENSE_GROUPS,
        };

        groups
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| m.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_classify_expense_groups() {
            assert_eq!(classify("Uber Trip", Direction::Expense), Category::Transport);
            assert_eq!(classify("Starbucks", Direction::Expense), Category::FoodDining);
            assert_eq!(classify("Whole Foods", Direction::Expense), Category::FoodDining);
            assert_eq!(classify("Walmart", Direction::Expense), Category::Shopping);
            assert_eq!(classify("NETFLIX.COM", Direction::Expense), Category::Entertainment);
            assert_eq!(classify("CVS Store", Direction::Expense), Category::Health);
            assert_eq!(classify("City Water Dept", Direction::Expense), Category::Utilities);
        }

        #[test]
        fn test_classify_expense_priority_order() {
            // transport group is checked before food
            assert_eq!(classify("Shell Cafe", Direction::Expense), Category::Transport);
            // "supermarket" hits shopping before utilities' "bill"
            assert_eq!(classify("Bill's Supermarket", Direction::Expense), Category::Shopping);
        }

        #[test]
        fn test_classify_income() {
            assert_eq!(classify("ACME Payroll", Direction::Income), Category::Salary);
            assert_eq!(classify("Employer/Bank", Direction::Income), Category::Other);
            assert_eq!(classify("Amazon Refund", Direction::Income), Category::Other);
            assert_eq!(classify("Savings Interest", Direction::Income), Category::Investment);
            assert_eq!(classify("Dividend Fund", Direction::Income), Category::Other);
            // income never uses expense keywords
            assert_eq!(classify("Uber", Direction::Income), Category::Other);
        }

        #[test]
        fn test_classify_fallback_is_other() {
            assert_eq!(classify("Boss", Direction::Income), Category::Other);
            assert_eq!(classify("Acme Widgets", Direction::Expense), Category::Other);
            assert_eq!(classify("", Direction::Expense), Category::Other);
        }
    }
}

pub use categorizer::classify;
