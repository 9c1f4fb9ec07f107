//! Record store: transactions and sender rules.
//!
//! The extraction core only reads sender rules from here; everything else is
//! plain list bookkeeping for the CLI.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use smsledger_core::{SenderRule, TransactionRecord};
use std::fs;
use std::path::{Path, PathBuf};

pub trait RecordStore {
    /// Newest first
    fn list_records(&self) -> Result<Vec<TransactionRecord>>;
    fn save_record(&mut self, record: TransactionRecord) -> Result<()>;
    /// Unknown ids are ignored
    fn delete_record(&mut self, id: &str) -> Result<()>;

    fn list_sender_rules(&self) -> Result<Vec<SenderRule>>;
    /// Replaces a rule with the same id, otherwise appends
    fn save_sender_rule(&mut self, rule: SenderRule) -> Result<()>;
    fn delete_sender_rule(&mut self, id: &str) -> Result<()>;

    fn clear_all(&mut self) -> Result<()>;
}

fn upsert_rule(rules: &mut Vec<SenderRule>, rule: SenderRule) {
    match rules.iter_mut().find(|r| r.id == rule.id) {
        Some(existing) => *existing = rule,
        None => rules.push(rule),
    }
}

/// In-memory store (tests, dry runs)
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Vec<TransactionRecord>,
    rules: Vec<SenderRule>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<SenderRule>) -> Self {
        Self {
            records: Vec::new(),
            rules,
        }
    }
}

impl RecordStore for MemoryStore {
    fn list_records(&self) -> Result<Vec<TransactionRecord>> {
        Ok(self.records.clone())
    }

    fn save_record(&mut self, record: TransactionRecord) -> Result<()> {
        self.records.insert(0, record);
        Ok(())
    }

    fn delete_record(&mut self, id: &str) -> Result<()> {
        self.records.retain(|r| r.id != id);
        Ok(())
    }

    fn list_sender_rules(&self) -> Result<Vec<SenderRule>> {
        Ok(self.rules.clone())
    }

    fn save_sender_rule(&mut self, rule: SenderRule) -> Result<()> {
        upsert_rule(&mut self.rules, rule);
        Ok(())
    }

    fn delete_sender_rule(&mut self, id: &str) -> Result<()> {
        self.rules.retain(|r| r.id != id);
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.records.clear();
        self.rules.clear();
        Ok(())
    }
}

/// Pretty-printed JSON files in one directory:
/// `transactions.json` and `sender_rules.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn records_path(&self) -> PathBuf {
        self.dir.join("transactions.json")
    }

    fn rules_path(&self) -> PathBuf {
        self.dir.join("sender_rules.json")
    }
}

fn read_list<T: DeserializeOwned>(p: &Path) -> Result<Vec<T>> {
    if !p.exists() {
        return Ok(Vec::new());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

fn write_list<T: Serialize>(p: &Path, items: &[T]) -> Result<()> {
    let s = serde_json::to_string_pretty(items)?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

fn remove_if_exists(p: &Path) -> Result<()> {
    if p.exists() {
        fs::remove_file(p).with_context(|| format!("remove {}", p.display()))?;
    }
    Ok(())
}

impl RecordStore for JsonFileStore {
    fn list_records(&self) -> Result<Vec<TransactionRecord>> {
        read_list(&self.records_path())
    }

    fn save_record(&mut self, record: TransactionRecord) -> Result<()> {
        let mut records = self.list_records()?;
        records.insert(0, record);
        write_list(&self.records_path(), &records)
    }

    fn delete_record(&mut self, id: &str) -> Result<()> {
        let mut records = self.list_records()?;
        records.retain(|r| r.id != id);
        write_list(&self.records_path(), &records)
    }

    fn list_sender_rules(&self) -> Result<Vec<SenderRule>> {
        read_list(&self.rules_path())
    }

    fn save_sender_rule(&mut self, rule: SenderRule) -> Result<()> {
        let mut rules = self.list_sender_rules()?;
        upsert_rule(&mut rules, rule);
        write_list(&self.rules_path(), &rules)
    }

    fn delete_sender_rule(&mut self, id: &str) -> Result<()> {
        let mut rules = self.list_sender_rules()?;
        rules.retain(|r| r.id != id);
        write_list(&self.rules_path(), &rules)
    }

    fn clear_all(&mut self) -> Result<()> {
        remove_if_exists(&self.records_path())?;
        remove_if_exists(&self.rules_path())
    }
}
