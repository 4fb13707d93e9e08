//! Question answering over the filtered tables
//!
//! Summarises the current selection as text, wraps it with the analyst's
//! question and forwards it to a generative text service. Failures never
//! propagate: an unconfigured service or a failed call come back as text.

use super::aggregation::{argmax, Aggregator};
use crate::constants::AI_UNAVAILABLE_MESSAGE;
use crate::error::AssistantError;
use crate::models::metrics::{mean_defined, sum_defined};
use crate::models::{AssistantConfig, BusinessTable, Dimension, MarketingTable};
use crate::utils::{format_amount, format_thousands};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// A remote service that turns a prompt into text
#[async_trait]
pub trait TextService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError>;
}

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client from configuration
    ///
    /// Returns `AssistantError::Unavailable` when no API key is configured.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let api_key = config.api_key.clone().ok_or(AssistantError::Unavailable)?;

        // Trim whitespace and remove trailing slashes from base_url
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AssistantError::Service(format!(
                "Invalid base_url: must start with http:// or https://, got: '{}'",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistantError::Service(format!("Failed to create HTTP client: {}", e)))?;

        info!("Created GeminiClient: base_url='{}', model='{}'", base_url, config.model);

        Ok(Self {
            base_url,
            model: config.model.clone(),
            api_key,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl TextService for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let url = self.endpoint();
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        debug!("Sending prompt ({} chars) to {}", prompt.len(), url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Service(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(AssistantError::Service(format!(
                "API returned error status {}: {}",
                status, body
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Service(format!("Failed to parse response: {}", e)))?;

        parsed
            .text()
            .ok_or_else(|| AssistantError::Service("response contained no text".to_string()))
    }
}

static SHARED_CLIENT: OnceLock<Option<Arc<GeminiClient>>> = OnceLock::new();

/// Process-wide client, configured from the environment on first use
///
/// `None` when `GEMINI_API_KEY` is not set. Initialisation happens once even
/// with concurrent callers; later calls reuse the same handle.
pub fn shared_client() -> Option<Arc<GeminiClient>> {
    SHARED_CLIENT
        .get_or_init(|| match GeminiClient::from_config(&AssistantConfig::from_env()) {
            Ok(client) => Some(Arc::new(client)),
            Err(AssistantError::Unavailable) => {
                info!("GEMINI_API_KEY not set, assistant disabled");
                None
            }
            Err(e) => {
                warn!("Failed to configure assistant: {}", e);
                None
            }
        })
        .clone()
}

/// Textual summary of the selection for the prompt
pub fn build_context(marketing: &MarketingTable, business: &BusinessTable) -> String {
    let total_spend = sum_defined(marketing.iter().map(|r| r.spend));
    let total_revenue = sum_defined(marketing.iter().map(|r| r.attributed_revenue));
    let average_roas = mean_defined(marketing.iter().map(|r| r.roas));

    let platforms = Aggregator::group_by(marketing, Dimension::Platform);
    let states = Aggregator::group_by(marketing, Dimension::State);
    let best_platform = argmax(&platforms, |g| g.roas).map(|g| g.key.clone());
    let best_state = argmax(&states, |g| g.roas).map(|g| g.key.clone());

    let platform_names: Vec<&str> = marketing.platforms().iter().map(|p| p.as_str()).collect();

    let total_orders: u64 = business.iter().filter_map(|r| r.orders).sum();
    let business_revenue = sum_defined(business.iter().map(|r| r.total_revenue));
    let new_customers: u64 = business.iter().filter_map(|r| r.new_customers).sum();
    let avg_order_value = mean_defined(business.iter().map(|r| r.avg_order_value));

    format!(
        "
    MARKETING DATA SUMMARY:
    - Total Spend: ${}
    - Total Revenue: ${}
    - Average ROAS: {}
    - Best Platform: {}
    - Best State: {}
    - Platforms: {}
    - States: {}
    - Tactics: {}

    BUSINESS DATA SUMMARY:
    - Total Orders: {}
    - Total Revenue: ${}
    - New Customers: {}
    - Avg Order Value: {}
    ",
        format_amount(total_spend),
        format_amount(total_revenue),
        average_roas.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}x", v)),
        best_platform.as_deref().unwrap_or("n/a"),
        best_state.as_deref().unwrap_or("n/a"),
        platform_names.join(", "),
        marketing.states().join(", "),
        marketing.tactics().join(", "),
        format_thousands(total_orders),
        format_amount(business_revenue),
        format_thousands(new_customers),
        avg_order_value.map_or_else(|| "n/a".to_string(), |v| format!("${:.2}", v)),
    )
}

/// Wrap the question and the data context into the final prompt
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "CONTEXT:{}\n\nQUESTION: {}\n\nProvide a concise, actionable answer to the question based on the context above.",
        context, question
    )
}

/// Answer `question` about the selection; never fails
///
/// # Returns
/// The service's text, the fixed unavailable message when `service` is
/// `None`, or `"AI Error: ..."` when the call fails
pub async fn ask_ai(
    question: &str,
    marketing: &MarketingTable,
    business: &BusinessTable,
    service: Option<&dyn TextService>,
) -> String {
    let Some(service) = service else {
        return AI_UNAVAILABLE_MESSAGE.to_string();
    };

    let prompt = build_prompt(question, &build_context(marketing, business));

    match service.generate(&prompt).await {
        Ok(text) => text,
        Err(AssistantError::Unavailable) => AI_UNAVAILABLE_MESSAGE.to_string(),
        Err(e) => {
            warn!("Assistant call failed: {}", e);
            format!("AI Error: {}", e)
        }
    }
}
