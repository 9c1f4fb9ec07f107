//! smsledger-extract: extraction orchestration, remote fallback, record store and CSV export

pub mod error;
pub mod export;
pub mod extractor;
pub mod gemini;
pub mod remote;
pub mod store;

pub use error::ExtractionError;
pub use extractor::{apply_sender_override, find_sender_rule, Extraction, Extractor, Provenance};
pub use gemini::{GeminiConfig, GeminiExtractor};
pub use remote::{RemoteExtractor, RemoteRecord, RemoteRequest};
pub use store::{JsonFileStore, MemoryStore, RecordStore};
