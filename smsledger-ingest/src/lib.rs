//! smsledger-ingest: declarative SMS extraction rules and the offline pattern matcher.

pub mod types;
pub mod rules;
pub mod parsers;

pub use types::{ExtractionRule, MerchantCapture};
pub use rules::SMS_RULES;
pub use parsers::sms::{parse_locally, SmsParser};
