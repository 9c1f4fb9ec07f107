//! Decide, per message, between the offline parser and the remote extractor.
//!
//! Sequence (single pass, nothing is retried here):
//!   1. blank text            -> EmptyInput
//!   2. local rule matches    -> sender override -> Local
//!   3. miss and offline      -> OfflineNoMatch
//!   4. miss and online       -> remote -> sender override -> Remote
//!      remote error          -> RemoteExtractionFailed

use anyhow::Result;
use serde::{Deserialize, Serialize};
use smsledger_core::{CandidateRecord, SenderRule};
use smsledger_ingest::SmsParser;

use crate::error::ExtractionError;
use crate::remote::{RemoteExtractor, RemoteRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "remote")]
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub record: CandidateRecord,
    pub source: Provenance,
}

/// First rule whose sender name equals `sender` (case-insensitive).
/// A missing or blank sender never matches.
pub fn find_sender_rule<'a>(rules: &'a [SenderRule], sender: Option<&str>) -> Option<&'a SenderRule> {
    let sender = sender?;
    rules.iter().find(|r| r.matches(sender))
}

/// Force the rule's default category, if any. Applies to local and remote
/// results alike, even when the remote picked a category of its own.
pub fn apply_sender_override(record: CandidateRecord, rules: &[SenderRule], sender: Option<&str>) -> CandidateRecord {
    match find_sender_rule(rules, sender).and_then(|r| r.default_category) {
        Some(category) => {
            log::debug!("sender rule forces category {category}");
            record.with_category(category)
        }
        None => record,
    }
}

pub struct Extractor<R> {
    parser: SmsParser,
    remote: R,
}

impl<R: RemoteExtractor> Extractor<R> {
    pub fn new(remote: R) -> Result<Self> {
        Ok(Self {
            parser: SmsParser::new()?,
            remote,
        })
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub async fn extract(
        &self,
        text: &str,
        sender: Option<&str>,
        rules: &[SenderRule],
        is_online: bool,
    ) -> Result<Extraction, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        if let Some(record) = self.parser.parse(text) {
            log::info!("extracted locally");
            return Ok(Extraction {
                record: apply_sender_override(record, rules, sender),
                source: Provenance::Local,
            });
        }

        if !is_online {
            log::info!("no local rule matched and remote is unreachable");
            return Err(ExtractionError::OfflineNoMatch);
        }

        log::info!("no local rule matched; asking remote extractor");
        let request = RemoteRequest::new(text, sender);
        let record = self
            .remote
            .extract(&request)
            .await
            .and_then(|r| r.into_candidate())
            .map_err(|e| {
                log::warn!("remote extraction failed: {e:#}");
                ExtractionError::RemoteExtractionFailed(format!("{e:#}"))
            })?;

        Ok(Extraction {
            record: apply_sender_override(record, rules, sender),
            source: Provenance::Remote,
        })
    }
}
