//! Google Gemini implementation of the remote extractor

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use smsledger_core::{time, Category};
use std::time::Duration;

use crate::remote::{parse_remote_json, RemoteExtractor, RemoteRecord, RemoteRequest};

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.1,
            timeout_secs: 30,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

pub struct GeminiExtractor {
    config: GeminiConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiExtractor {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build http client")?;

        Ok(Self { config, client })
    }

    async fn generate(&self, request: &RemoteRequest) -> Result<RemoteRecord> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: build_prompt(request, time::today().year()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
                temperature: self.config.temperature,
            },
        };

        let resp = self
            .client
            .post(self.config.url())
            .json(&body)
            .send()
            .await
            .context("gemini request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("gemini error: {status} {txt}");
        }

        let out: GenerateContentResponse = resp.json().await.context("parse gemini response")?;
        let text = collect_text(out);
        if text.is_empty() {
            bail!("gemini returned no text");
        }

        parse_remote_json(&text)
    }
}

impl RemoteExtractor for GeminiExtractor {
    async fn extract(&self, request: &RemoteRequest) -> Result<RemoteRecord> {
        log::debug!("gemini extract via {}", self.config.model);
        self.generate(request).await
    }
}

fn collect_text(resp: GenerateContentResponse) -> String {
    let mut s = String::new();
    for candidate in resp.candidates.unwrap_or_default() {
        let parts = candidate.content.and_then(|c| c.parts).unwrap_or_default();
        for part in parts {
            if let Some(t) = part.text {
                s.push_str(&t);
            }
        }
        if !s.is_empty() {
            break;
        }
    }
    s.trim().to_string()
}

fn build_prompt(request: &RemoteRequest, current_year: i32) -> String {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    format!(
        "Extract financial transaction details from the following SMS message.\n\
         Sender: {sender}\n\
         Message: \"{text}\"\n\n\
         Current year: {current_year} (use it if the date has no year).\n\n\
         Categorize the transaction into exactly one of: {categories}.\n\
         If the category is unclear, use \"Other\".\n\
         Detect the currency as a 3-letter code (e.g. USD, INR, GHS, EUR). Default to USD.\n\
         Decide whether it is \"income\" (credit, deposit, received) or \"expense\" (debit, spent, paid).\n\
         Return only a JSON object.",
        sender = request.sender_hint.as_deref().unwrap_or("Unknown"),
        text = request.sms_text,
        categories = categories.join(", "),
    )
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "amount": { "type": "NUMBER", "description": "The numeric amount of the transaction" },
            "currency": { "type": "STRING", "description": "The 3-letter currency code (e.g. USD, INR)" },
            "merchant": { "type": "STRING", "description": "The merchant, person or entity" },
            "category": { "type": "STRING", "description": "One of the provided categories" },
            "type": { "type": "STRING", "enum": ["income", "expense"], "description": "Transaction direction" },
            "date": { "type": "STRING", "description": "Transaction date in ISO 8601 format (YYYY-MM-DD)" }
        },
        "required": ["amount", "currency", "merchant", "category", "type", "date"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_inputs_and_categories() {
        let req = RemoteRequest::new("Rs 250 spent at Chai Point", Some("ICICI"));
        let prompt = build_prompt(&req, 2026);
        assert!(prompt.contains("Sender: ICICI"));
        assert!(prompt.contains("Rs 250 spent at Chai Point"));
        assert!(prompt.contains("2026"));
        assert!(prompt.contains("Food & Dining"));
        assert!(prompt.contains("Transfer"));
    }

    #[test]
    fn test_prompt_unknown_sender() {
        let req = RemoteRequest::new("hello", None);
        assert!(build_prompt(&req, 2026).contains("Sender: Unknown"));
    }

    #[test]
    fn test_url_trims_base_slash() {
        let mut cfg = GeminiConfig::new("k");
        cfg.base_url = "http://localhost:8080/".to_string();
        assert_eq!(
            cfg.url(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent?key=k"
        );
    }

    #[test]
    fn test_collect_text_joins_first_candidate_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "{\"a\":" }, { "text": " 1}" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }))
        .unwrap();
        assert_eq!(collect_text(resp), "{\"a\": 1}");
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = response_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 6);
    }
}
