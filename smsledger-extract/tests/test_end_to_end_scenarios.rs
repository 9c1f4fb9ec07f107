use anyhow::{bail, Result};
use chrono::{Datelike, Local};
use smsledger_core::{Category, Direction, SenderRule, TransactionRecord};
use smsledger_extract::{
    Extractor, ExtractionError, MemoryStore, Provenance, RecordStore, RemoteExtractor, RemoteRecord,
    RemoteRequest,
};
use std::sync::Mutex;

/// Records every request and answers with a fixed record (or a failure).
struct ScriptedRemote {
    seen: Mutex<Vec<RemoteRequest>>,
    answer: Option<RemoteRecord>,
}

impl ScriptedRemote {
    fn answering(answer: RemoteRecord) -> Self {
        Self { seen: Mutex::new(Vec::new()), answer: Some(answer) }
    }

    fn malformed() -> Self {
        Self { seen: Mutex::new(Vec::new()), answer: None }
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl RemoteExtractor for ScriptedRemote {
    async fn extract(&self, request: &RemoteRequest) -> Result<RemoteRecord> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.answer {
            Some(r) => Ok(r.clone()),
            None => bail!("response is not a JSON object"),
        }
    }
}

fn uber_answer() -> RemoteRecord {
    RemoteRecord {
        amount: 23.4,
        currency: "usd".to_string(),
        merchant: "Uber".to_string(),
        category: "Transport".to_string(),
        direction: Direction::Expense,
        date: "2026-09-30".to_string(),
    }
}

fn hdfc_transport() -> SenderRule {
    SenderRule {
        id: "rule-hdfc".to_string(),
        sender_name: "HDFC".to_string(),
        auto_process: true,
        default_category: Some(Category::Transport),
    }
}

#[tokio::test]
async fn test_scenario_paid_to_starbucks() {
    let ex = Extractor::new(ScriptedRemote::malformed()).unwrap();
    let out = ex.extract("Paid $12.50 to Starbucks on 12-Oct", None, &[], true).await.unwrap();

    assert_eq!(out.source, Provenance::Local);
    let r = out.record;
    assert_eq!(r.amount, 12.50);
    assert_eq!(r.currency, "USD");
    assert_eq!(r.merchant, "Starbucks");
    assert_eq!(r.category, Category::FoodDining);
    assert_eq!(r.direction, Direction::Expense);
    assert_eq!((r.date.month(), r.date.day()), (10, 12));
    // year comes from the clock; allow a run straddling new year
    let year = Local::now().year();
    assert!(r.date.year() == year || r.date.year() == year - 1);
}

#[tokio::test]
async fn test_scenario_received_from_boss() {
    let ex = Extractor::new(ScriptedRemote::malformed()).unwrap();
    let r = ex.extract("Received ₹500 from Boss", None, &[], true).await.unwrap().record;
    assert_eq!(r.amount, 500.0);
    assert_eq!(r.currency, "INR");
    assert_eq!(r.merchant, "Boss");
    assert_eq!(r.category, Category::Other);
    assert_eq!(r.direction, Direction::Income);
}

#[tokio::test]
async fn test_scenario_salary_credited() {
    let ex = Extractor::new(ScriptedRemote::malformed()).unwrap();
    let r = ex.extract("Salary of $5000 credited", None, &[], false).await.unwrap().record;
    assert_eq!(r.amount, 5000.0);
    assert_eq!(r.currency, "USD");
    assert_eq!(r.merchant, "Employer/Bank");
    assert_eq!(r.category, Category::Salary);
    assert_eq!(r.direction, Direction::Income);
}

#[tokio::test]
async fn test_scenario_blank_input() {
    let remote = ScriptedRemote::answering(uber_answer());
    let ex = Extractor::new(remote).unwrap();
    assert_eq!(ex.extract("", None, &[], true).await, Err(ExtractionError::EmptyInput));
}

#[tokio::test]
async fn test_scenario_random_text_offline() {
    let ex = Extractor::new(ScriptedRemote::answering(uber_answer())).unwrap();
    assert_eq!(
        ex.extract("asdkjasd random text", None, &[], false).await,
        Err(ExtractionError::OfflineNoMatch)
    );
}

#[tokio::test]
async fn test_scenario_sender_rule_forces_category() {
    let ex = Extractor::new(ScriptedRemote::malformed()).unwrap();
    let out = ex
        .extract("Paid $12.50 to Starbucks on 12-Oct", Some("HDFC"), &[hdfc_transport()], true)
        .await
        .unwrap();
    assert_eq!(out.source, Provenance::Local);
    assert_eq!(out.record.category, Category::Transport);
}

#[tokio::test]
async fn test_remote_result_is_overridden_by_sender_rule() {
    let remote = ScriptedRemote::answering(uber_answer());
    let ex = Extractor::new(remote).unwrap();
    let rule = SenderRule {
        default_category: Some(Category::Transfer),
        ..hdfc_transport()
    };

    let out = ex
        .extract("UPI txn ref 99812 Uber India 23.40", Some("hdfc"), &[rule], true)
        .await
        .unwrap();

    assert_eq!(out.source, Provenance::Remote);
    assert_eq!(out.record.category, Category::Transfer);
    assert_eq!(out.record.currency, "USD");
}

#[tokio::test]
async fn test_remote_receives_text_and_sender_hint() {
    let ex = Extractor::new(ScriptedRemote::answering(uber_answer())).unwrap();
    ex.extract("UPI txn ref 99812 Uber India 23.40", Some(" HDFC "), &[], true)
        .await
        .unwrap();
    ex.extract("Paid $1 to Uber", Some("HDFC"), &[], true).await.unwrap();

    // only the local miss went out
    assert_eq!(ex.remote().calls(), 1);
    let seen = ex.remote().seen.lock().unwrap();
    assert_eq!(seen[0].sms_text, "UPI txn ref 99812 Uber India 23.40");
    assert_eq!(seen[0].sender_hint.as_deref(), Some("HDFC"));
}

#[tokio::test]
async fn test_malformed_remote_is_terminal() {
    let ex = Extractor::new(ScriptedRemote::malformed()).unwrap();
    let err = ex.extract("UPI txn ref 99812", None, &[], true).await.unwrap_err();
    assert_eq!(err.code(), "remote_extraction_failed");
}

#[tokio::test]
async fn test_extract_then_store_round_trip() {
    let mut store = MemoryStore::with_rules(vec![hdfc_transport()]);
    let ex = Extractor::new(ScriptedRemote::malformed()).unwrap();

    let rules = store.list_sender_rules().unwrap();
    let text = "Purchase of $50 at Walmart";
    let out = ex.extract(text, Some("HDFC"), &rules, false).await.unwrap();
    store
        .save_record(TransactionRecord::from_candidate(out.record, Some(text), Some("HDFC")))
        .unwrap();

    let saved = store.list_records().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].description, "Walmart");
    assert_eq!(saved[0].category, Category::Transport);
    assert_eq!(saved[0].sender.as_deref(), Some("HDFC"));
    // rules are read, never mutated
    assert_eq!(store.list_sender_rules().unwrap(), vec![hdfc_transport()]);
}
