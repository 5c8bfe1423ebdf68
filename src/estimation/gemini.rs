//! Gemini generateContent client for sugar estimates

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::{EstimationError, EstimationResult, SugarEstimator};
use crate::config::EstimationConfig;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Retry behaviour for throttled requests
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff delay in milliseconds
    pub initial_backoff_ms: u64,
    /// Ceiling for any single sleep, including server-provided Retry-After
    pub max_backoff_ms: u64,
    /// HTTP status codes that should trigger retries
    pub retryable_status_codes: Vec<StatusCode>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&EstimationConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &EstimationConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff_ms: config.initial_backoff_ms,
            max_backoff_ms: config.max_backoff_ms,
            retryable_status_codes: vec![
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::SERVICE_UNAVAILABLE,
            ],
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let cap = Duration::from_millis(self.max_backoff_ms);
        if let Some(wait) = retry_after {
            return wait.min(cap);
        }
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor)).min(cap)
    }
}

/// Retry-After in delta-seconds form; HTTP dates are ignored
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
            .map(|p| p.text.as_str())
    }
}

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("number regex is valid"));

/// First number in a model reply; 0 when there is none
pub fn extract_grams(reply: &str) -> f64 {
    NUMBER_REGEX
        .find(reply)
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn format_quantity(quantity_g: f64) -> String {
    if quantity_g.fract() == 0.0 {
        format!("{:.0}", quantity_g)
    } else {
        format!("{}", quantity_g)
    }
}

pub fn added_sugars_prompt(name: &str, quantity_g: f64) -> String {
    format!(
        "Quantos gramas de açúcares adicionados (açúcar refinado, mel, xarope, etc.) existem em {}g de {}?\n\
Responda APENAS com o número (sem unidade, sem texto adicional).\n\
Exemplos:\n\
- 100g de achocolatado em pó: 20\n\
- 50g de açúcar refinado: 50\n\
- 100g de arroz: 0\n\
- 200g de refrigerante de cola: 22\n\
- 100g de bolacha recheada: 25",
        format_quantity(quantity_g),
        name
    )
}

pub fn total_sugars_prompt(name: &str, quantity_g: f64) -> String {
    format!(
        "Quantos gramas de açúcares totais (incluindo açúcares naturais e adicionados) existem em {}g de {}?\n\
Responda APENAS com o número (sem unidade, sem texto adicional).\n\
Exemplos:\n\
- 100g de banana: 12\n\
- 50g de açúcar refinado: 50\n\
- 100g de arroz cozido: 0\n\
- 200g de leite integral: 10",
        format_quantity(quantity_g),
        name
    )
}

/// Estimator backed by the Gemini generateContent endpoint
pub struct GeminiEstimator {
    client: Client,
    api_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl GeminiEstimator {
    /// Fails with `NotConfigured` when no API key is set
    pub fn new(config: &EstimationConfig) -> EstimationResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(EstimationError::NotConfigured)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            retry: RetryPolicy::from_config(config),
        })
    }

    async fn generate(&self, prompt: &str) -> EstimationResult<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.1, "maxOutputTokens": 50 }
        });

        let mut attempt = 0;
        loop {
            let response = self
                .client
                .post(&self.api_url)
                .query(&[("key", self.api_key.as_str())])
                .json(&body)
                .send()
                .await?;

            let status = response.status();

            if self.retry.retryable_status_codes.contains(&status) {
                attempt += 1;
                if attempt > self.retry.max_retries {
                    warn!(
                        "Estimation service throttled ({}) - max retries ({}) reached",
                        status.as_u16(),
                        self.retry.max_retries
                    );
                    return Err(EstimationError::Throttled { attempts: attempt });
                }

                let wait = self.retry.backoff(attempt, retry_after(response.headers()));
                warn!(
                    "Estimation service throttled ({}) - retry {}/{} after {}ms",
                    status.as_u16(),
                    attempt,
                    self.retry.max_retries,
                    wait.as_millis()
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                tracing::error!("Estimation request failed - status: {}, body: {}", status, text);
                return Err(EstimationError::Api {
                    status: status.as_u16(),
                    body: text,
                });
            }

            let parsed: GenerateResponse = response.json().await?;
            return Ok(parsed.first_text().unwrap_or("0").to_string());
        }
    }
}

#[async_trait]
impl SugarEstimator for GeminiEstimator {
    async fn estimate_added_sugars(&self, name: &str, quantity_g: f64) -> EstimationResult<f64> {
        let reply = self.generate(&added_sugars_prompt(name, quantity_g)).await?;
        Ok(extract_grams(&reply))
    }

    async fn estimate_total_sugars(&self, name: &str, quantity_g: f64) -> EstimationResult<f64> {
        let reply = self.generate(&total_sugars_prompt(name, quantity_g)).await?;
        Ok(extract_grams(&reply))
    }
}
