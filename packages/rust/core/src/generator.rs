//! Roadmap generation via a hosted LLM.
//!
//! The model is asked for a bare JSON object, but replies are parsed
//! leniently: a fenced ```` ```json ```` block wins, otherwise the outermost
//! `{ ... }` slice of the reply is used.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use pathfinder_providers::{build_client, endpoint};
use pathfinder_shared::{GeneratorConfig, PathfinderError, Result, RoadmapDocument};

/// Generation is far slower than metadata lookups.
const GENERATOR_TIMEOUT: Duration = Duration::from_secs(60);

/// Matches a fenced JSON block and captures its body.
static FENCED_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("fenced json regex should compile")
});

/// Drafts a learning roadmap for a topic.
#[async_trait]
pub trait RoadmapGenerator: Send + Sync {
    /// Returns a document with at least one step and no resource bag.
    async fn generate(&self, topic: &str) -> Result<RoadmapDocument>;
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Roadmap generator backed by the Gemini `generateContent` endpoint.
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    step_count: u32,
}

impl GeminiGenerator {
    /// Fails with a config error when no API key was resolved.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| PathfinderError::config("roadmap generator API key is not set"))?;

        Ok(Self {
            client: build_client(GENERATOR_TIMEOUT)?,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            step_count: config.step_count.max(1),
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = endpoint(
            &self.base_url,
            &format!("models/{}:generateContent", self.model),
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateRequest {
                contents: [Content {
                    parts: [Part { text: prompt }],
                }],
            })
            .send()
            .await
            .map_err(|e| PathfinderError::generator(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(500).collect();
            warn!(%status, body = %excerpt, "generator returned an error");
            return Err(PathfinderError::generator(format!("HTTP {status}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PathfinderError::generator(format!("unreadable response: {e}")))?;

        body.text()
            .ok_or_else(|| PathfinderError::generator("response contained no text"))
    }
}

#[async_trait]
impl RoadmapGenerator for GeminiGenerator {
    #[instrument(skip(self), fields(model = %self.model))]
    async fn generate(&self, topic: &str) -> Result<RoadmapDocument> {
        let prompt = build_prompt(topic, self.step_count);
        let reply = self.complete(&prompt).await?;
        debug!(len = reply.len(), "received generator reply");

        let doc = parse_roadmap_response(&reply).inspect_err(|e| {
            let excerpt: String = reply.chars().take(500).collect();
            warn!(error = %e, reply = %excerpt, "could not parse generator reply");
        })?;

        info!(steps = doc.steps.len(), "roadmap generated");
        Ok(doc)
    }
}

// ---------------------------------------------------------------------------
// Prompt and parsing
// ---------------------------------------------------------------------------

/// Prompt asking for a `step_count`-step roadmap as a bare JSON object.
pub fn build_prompt(topic: &str, step_count: u32) -> String {
    format!(
        r#"Create a detailed {step_count}-step learning roadmap for the topic: "{topic}".
Focus on practical steps and essential concepts for a beginner to intermediate learner.

For each step, provide:
- id: A sequential string identifier ("1", "2", ... "{step_count}").
- title: A concise and descriptive title for the step (max 10 words).
- duration: An estimated time commitment (e.g. "2-4 hours", "1 day").
- description: A brief (1-2 sentences) explanation of the learning goal for this step.
- resources: An array of 1-2 strings suggesting specific types of learning materials.
- practice: An array of 1-2 strings suggesting concrete practice activities.

Respond ONLY with the JSON object. Do not include any other text or markdown fences.
The response must start with '{{' and end with '}}'.

Example:
{{
  "steps": [
    {{
      "id": "1",
      "title": "Understand Core Concepts",
      "duration": "3-5 hours",
      "description": "Grasp the fundamental principles and terminology.",
      "resources": ["Read the official getting started guide"],
      "practice": ["Set up a development environment"]
    }}
  ]
}}"#
    )
}

/// Parse a generator reply into a roadmap.
///
/// Steps without an id are numbered by position. A reply with no steps is
/// a generator failure, not an empty roadmap.
pub fn parse_roadmap_response(reply: &str) -> Result<RoadmapDocument> {
    let json = json_slice(reply);

    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| PathfinderError::generator(format!("reply is not valid JSON: {e}")))?;

    if !value.get("steps").is_some_and(serde_json::Value::is_array) {
        return Err(PathfinderError::generator(
            "reply is not an object with a 'steps' array",
        ));
    }

    let mut doc: RoadmapDocument = serde_json::from_value(value)
        .map_err(|e| PathfinderError::generator(format!("malformed roadmap step: {e}")))?;

    if doc.steps.is_empty() {
        return Err(PathfinderError::generator("no meaningful steps in reply"));
    }

    for (i, step) in doc.steps.iter_mut().enumerate() {
        if step.id.trim().is_empty() {
            step.id = (i + 1).to_string();
        }
    }
    doc.resources = None;

    Ok(doc)
}

/// The part of a reply most likely to be the JSON object.
fn json_slice(reply: &str) -> &str {
    if let Some(body) = FENCED_JSON_RE.captures(reply).and_then(|c| c.get(1)) {
        return body.as_str();
    }

    let trimmed = reply.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return trimmed;
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    }
}
