use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use smsledger_core::{currency, time, Category, SenderRule, TransactionRecord};
use smsledger_extract::{
    export, find_sender_rule, Extraction, ExtractionError, Extractor, GeminiExtractor, JsonFileStore,
    RecordStore,
};
use smsledger_ingest::SmsParser;
use std::fs::File;
use std::path::PathBuf;

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(name = "smsledger", version, about = "Turn bank SMS notifications into transaction records")]
struct Cli {
    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a transaction from SMS text (offline rules first, then the remote extractor)
    Parse {
        text: String,

        /// Sender label, used to look up sender rules
        #[arg(long)]
        sender: Option<String>,

        /// Never call the remote extractor
        #[arg(long)]
        offline: bool,

        /// Save the result to the record store
        #[arg(long)]
        save: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show which offline rule matches a message
    Explain { text: String },

    /// Stored transactions
    Records {
        #[command(subcommand)]
        command: RecordsCommand,
    },

    /// Trusted senders and their default categories
    Senders {
        #[command(subcommand)]
        command: SendersCommand,
    },

    /// Configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RecordsCommand {
    /// List records, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Delete a record by id
    Delete { id: String },
    /// Export all records as CSV
    Export {
        /// Output path (default: ./transactions_YYYY-MM-DD.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Remove all records and sender rules
    Clear,
}

#[derive(Subcommand, Debug)]
enum SendersCommand {
    List,
    /// Add a trusted sender (auto-process on)
    Add {
        name: String,

        /// Category forced on every record from this sender
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
    },
    Delete { id: String },
    /// Flip auto-process for a sender
    Toggle { id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml
    Init,
    /// Print the effective config
    Show,
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_label(s).ok_or_else(|| {
        let all: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        format!("unknown category '{s}' (expected one of: {})", all.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Parse {
            text,
            sender,
            offline,
            save,
            json,
        } => {
            parse_sms(&text, sender.as_deref(), offline, save, json).await?;
        }

        Command::Explain { text } => {
            let parser = SmsParser::new()?;
            match parser.matched_rule(&text) {
                Some(rule) if parser.parse(&text).is_some() => println!("matched rule: {rule}"),
                Some(rule) => println!("matched rule: {rule} (amount or merchant unusable, no record)"),
                None => println!("no offline rule matches; the remote extractor would be used"),
            }
        }

        Command::Records { command } => {
            let mut store = open_store()?;
            match command {
                RecordsCommand::List { json } => list_records(&store, json)?,
                RecordsCommand::Delete { id } => {
                    store.delete_record(&id)?;
                    println!("Deleted {id}");
                }
                RecordsCommand::Export { out } => {
                    let records = store.list_records()?;
                    let path = out.unwrap_or_else(|| PathBuf::from(export::export_file_name(time::today())));
                    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
                    export::write_csv(&records, file)?;
                    println!("Exported {} transactions to {}", records.len(), path.display());
                }
                RecordsCommand::Clear => {
                    store.clear_all()?;
                    println!("Cleared all data in {}", store.dir().display());
                }
            }
        }

        Command::Senders { command } => {
            let mut store = open_store()?;
            match command {
                SendersCommand::List => {
                    let rules = store.list_sender_rules()?;
                    if rules.is_empty() {
                        println!("No trusted senders yet.");
                    }
                    for r in &rules {
                        println!(
                            "{} | {} | auto={} | category={}",
                            r.id,
                            r.sender_name,
                            r.auto_process,
                            r.default_category.map(|c| c.label()).unwrap_or("-")
                        );
                    }
                }
                SendersCommand::Add { name, category } => {
                    if name.trim().is_empty() {
                        bail!("sender name is empty");
                    }
                    let rule = SenderRule::new(&name, category);
                    println!("Added {} ({})", rule.sender_name, rule.id);
                    store.save_sender_rule(rule)?;
                }
                SendersCommand::Delete { id } => {
                    store.delete_sender_rule(&id)?;
                    println!("Deleted {id}");
                }
                SendersCommand::Toggle { id } => {
                    let mut rule = store
                        .list_sender_rules()?
                        .into_iter()
                        .find(|r| r.id == id)
                        .with_context(|| format!("no sender rule with id {id}"))?;
                    rule.auto_process = !rule.auto_process;
                    println!("{}: auto={}", rule.sender_name, rule.auto_process);
                    store.save_sender_rule(rule)?;
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                let key_state = if cfg.remote.api_key().is_some() { "set" } else { "missing" };
                println!("# {} is {}", cfg.remote.api_key_env, key_state);
            }
        },
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn open_store() -> Result<JsonFileStore> {
    let cfg = config::load_config()?;
    JsonFileStore::open(cfg.store_dir()?)
}

async fn parse_sms(text: &str, sender: Option<&str>, offline: bool, save: bool, json: bool) -> Result<()> {
    let cfg = config::load_config()?;
    let mut store = JsonFileStore::open(cfg.store_dir()?)?;
    let rules = store.list_sender_rules()?;

    let api_key = cfg.remote.api_key();
    if api_key.is_none() && !offline {
        log::warn!("{} is not set; running offline", cfg.remote.api_key_env);
    }
    let is_online = !offline && api_key.is_some();
    let remote = GeminiExtractor::new(cfg.remote.gemini_config(api_key.unwrap_or_default()))?;
    let extractor = Extractor::new(remote)?;

    let extraction = extractor
        .extract(text, sender, &rules, is_online)
        .await
        .map_err(|e| anyhow!(failure_message(&e)))?;
    print_extraction(&extraction, json)?;

    let auto = find_sender_rule(&rules, sender).is_some_and(|r| r.auto_process);
    if save || auto {
        let record = TransactionRecord::from_candidate(extraction.record, Some(text), sender);
        let id = record.id.clone();
        store.save_record(record)?;
        if !json {
            println!("Saved {id}");
        }
    }

    Ok(())
}

/// Every failed parse ends in manual entry; say so.
fn failure_message(err: &ExtractionError) -> String {
    match err {
        ExtractionError::OfflineNoMatch => err.to_string(),
        ExtractionError::EmptyInput | ExtractionError::RemoteExtractionFailed(_) => {
            format!("{err}; enter the details manually")
        }
    }
}

fn print_extraction(extraction: &Extraction, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(extraction)?);
        return Ok(());
    }

    let r = &extraction.record;
    let symbol = currency::symbol_for(&r.currency).unwrap_or("");
    println!("source:    {:?}", extraction.source);
    println!("amount:    {}{:.2} {}", symbol, r.amount, r.currency);
    println!("merchant:  {}", r.merchant);
    println!("category:  {}", r.category);
    println!("direction: {}", r.direction);
    println!("date:      {}", time::to_iso(r.date));
    Ok(())
}

fn list_records(store: &JsonFileStore, json: bool) -> Result<()> {
    let records = store.list_records()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }

    for r in &records {
        println!(
            "{} | {} | {:>10.2} {} | {:<7} | {} | {}",
            r.id,
            time::to_iso(r.date),
            r.amount,
            r.currency,
            r.direction,
            r.category,
            r.description
        );
    }

    let income: f64 = records.iter().filter(|r| r.signed_amount() > 0.0).map(|r| r.amount).sum();
    let expense: f64 = records.iter().filter(|r| r.signed_amount() < 0.0).map(|r| r.amount).sum();
    println!("\n{} records | income {:.2} | expense {:.2}", records.len(), income, expense);
    Ok(())
}
