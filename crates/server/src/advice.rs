use async_trait::async_trait;
use log::warn;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::{aqi::AqiCategory, Error, Sample};

/// A text-generation backend. The service treats model output as untrusted:
/// whatever comes back goes through best-effort JSON extraction and falls
/// back to canned advice when that fails.
#[async_trait]
pub trait TextGeneration: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, Error>;
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category: String,
    pub title: String,
    pub description: String,
    pub priority: String,
}

/// Health guidance for the current conditions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub urgency: String,
    pub summary: String,
    pub recommendations: Vec<Recommendation>,
    pub should_go_outside: bool,
    pub next_check: String,
}

/// Advice plus whether it is the canned fallback rather than model output
pub struct AdviceOutcome {
    pub advice: Advice,
    pub fallback: bool,
}

/// Ask the backend for advice on the given conditions. Never fails: a
/// missing backend, a transport error and unparsable output all yield the
/// canned default.
pub async fn generate_advice(
    backend: Option<&dyn TextGeneration>,
    conditions: &Sample,
) -> AdviceOutcome {
    let Some(backend) = backend else {
        return AdviceOutcome {
            advice: default_advice(conditions.category),
            fallback: true,
        };
    };

    let prompt = build_prompt(conditions);
    match backend.complete(&prompt).await {
        Ok(text) => match extract_advice(&text) {
            Some(advice) => AdviceOutcome {
                advice,
                fallback: false,
            },
            None => {
                warn!("text generation returned no parsable advice, serving default");
                AdviceOutcome {
                    advice: default_advice(conditions.category),
                    fallback: true,
                }
            }
        },
        Err(err) => {
            warn!("text generation unavailable, serving default advice: {}", err);
            AdviceOutcome {
                advice: default_advice(conditions.category),
                fallback: true,
            }
        }
    }
}

fn build_prompt(conditions: &Sample) -> String {
    format!(
        "You are an environmental health assistant. Current air quality: \
         AQI {} ({}), PM2.5 {:.1} ug/m3, PM10 {:.1} ug/m3, ozone {:.1} ug/m3. \
         Respond with a single JSON object shaped as {{\"urgency\": \
         \"low|medium|high\", \"summary\": string, \"recommendations\": \
         [{{\"category\": string, \"title\": string, \"description\": string, \
         \"priority\": \"low|medium|high\"}}], \"shouldGoOutside\": boolean, \
         \"nextCheck\": string}} and nothing else.",
        conditions.aqi,
        conditions.category.label(),
        conditions.pm25,
        conditions.pm10,
        conditions.ozone,
    )
}

/// Pull the first-to-last brace span out of the model's reply and parse it.
/// Models habitually wrap JSON in prose or code fences, so a strict parse of
/// the whole reply is useless.
pub(crate) fn extract_advice(text: &str) -> Option<Advice> {
    let braces = Regex::new(r"\{[\s\S]*\}").ok()?;
    let candidate = braces.find(text)?;
    serde_json::from_str(candidate.as_str()).ok()
}

/// Canned guidance served when no backend is configured or its output is
/// unusable
pub(crate) fn default_advice(category: AqiCategory) -> Advice {
    Advice {
        urgency: "medium".to_string(),
        summary: format!("Air quality is currently {}", category.label()),
        recommendations: vec![Recommendation {
            category: "general".to_string(),
            title: "Monitor air quality".to_string(),
            description: "Stay informed about current conditions before planning outdoor activity"
                .to_string(),
            priority: "medium".to_string(),
        }],
        should_go_outside: matches!(category, AqiCategory::Good | AqiCategory::Moderate),
        next_check: "in 1 hour".to_string(),
    }
}

/// Client for a text-generation HTTP gateway: POSTs `{"prompt": ...}` and
/// returns the response body verbatim
pub struct HttpTextGeneration {
    client: Client,
    url: String,
}

impl HttpTextGeneration {
    pub fn new(url: String) -> Self {
        HttpTextGeneration {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl TextGeneration for HttpTextGeneration {
    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let text = self
            .client
            .post(&self.url)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}
