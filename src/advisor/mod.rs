//! AI advisory assistant
//!
//! Turns a projection into a prompt context, sends the founder's question to
//! a language model and returns prose. Failures never reach the caller: they
//! are logged and replaced by a fixed apology.

mod context;
mod gemini;

pub use context::{build_prompt, format_financial_context, SYSTEM_INSTRUCTION};
pub use gemini::GeminiClient;

use std::future::Future;

use log::error;
use thiserror::Error;

use crate::assumptions::Assumptions;
use crate::projection::FinancialData;

/// Reply shown when the model cannot be reached
pub const APOLOGY_MESSAGE: &str =
    "There was an issue communicating with the AI. Please check your API key and try again.";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("API_KEY environment variable not set")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model returned no text")]
    EmptyResponse,
}

/// Advisor settings
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl AdvisorConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 60,
        }
    }

    /// Read `API_KEY`, `ADVISOR_MODEL` and `ADVISOR_ENDPOINT`
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let mut config = Self::new(non_empty("API_KEY"));
        if let Some(model) = non_empty("ADVISOR_MODEL") {
            config.model = model;
        }
        if let Some(endpoint) = non_empty("ADVISOR_ENDPOINT") {
            config.endpoint = endpoint;
        }
        config
    }
}

/// A language model that answers a prompt under a system instruction
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, AdvisorError>> + Send;
}

/// Answers questions about a projection
#[derive(Debug, Clone)]
pub struct Advisor<G> {
    generator: G,
}

impl Advisor<GeminiClient> {
    /// Gemini-backed advisor configured from the environment
    pub fn from_env() -> Result<Self, AdvisorError> {
        Ok(Self::new(GeminiClient::new(AdvisorConfig::from_env())?))
    }
}

impl<G: TextGenerator> Advisor<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Ask a question, surfacing any failure
    pub async fn try_ask(
        &self,
        question: &str,
        data: &FinancialData,
        assumptions: &Assumptions,
    ) -> Result<String, AdvisorError> {
        let prompt = build_prompt(question, data, assumptions);
        self.generator.generate(SYSTEM_INSTRUCTION, &prompt).await
    }

    /// Ask a question; failures come back as the apology message
    pub async fn ask(&self, question: &str, data: &FinancialData, assumptions: &Assumptions) -> String {
        reply_or_apology(self.try_ask(question, data, assumptions).await)
    }
}

/// Text to show the founder: the answer, or the apology after logging the failure
pub fn reply_or_apology(result: Result<String, AdvisorError>) -> String {
    match result {
        Ok(answer) => answer,
        Err(e) => {
            error!("Advisor call failed: {}", e);
            APOLOGY_MESSAGE.to_string()
        }
    }
}
