//! Boundary with the external text-generation service.
//!
//! The service is asked for `{ nodes, executiveSummary, researchReport }` but
//! what comes back is model output: wrapped in Markdown fences, preceded by
//! prose, with trailing commas or unquoted keys. Decoding tolerates all of
//! that; validating the node list is left to [`crate::reconstruct`].

use crate::config::ReconstructOptions;
use crate::error::{Error, Result};
use crate::model::{ConceptTree, RawNodeRecord};
use crate::reconstruct::reconstruct_output;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOutput {
    #[serde(default, alias = "mindMap", alias = "mindmap")]
    pub nodes: Vec<RawNodeRecord>,
    #[serde(
        default,
        alias = "executive_summary",
        alias = "summary",
        deserialize_with = "lenient_text"
    )]
    pub executive_summary: String,
    #[serde(
        default,
        alias = "research_report",
        alias = "report",
        deserialize_with = "lenient_text"
    )]
    pub research_report: String,
}

/// The text-generation collaborator: full document text in, flat node list
/// and two text blobs out.
pub trait Generator {
    fn generate(&self, document_text: &str) -> Result<GeneratorOutput>;
}

/// Replays a saved service response.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    response: String,
}

impl StaticGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl Generator for StaticGenerator {
    fn generate(&self, _document_text: &str) -> Result<GeneratorOutput> {
        parse_generator_response(&self.response)
    }
}

/// Generates and reconstructs in one step. Generator failures surface as
/// they are; nothing is retried.
pub fn analyze_document<G>(
    generator: &G,
    document_text: &str,
    options: &ReconstructOptions,
) -> Result<ConceptTree>
where
    G: Generator + ?Sized,
{
    let output = generator.generate(document_text)?;
    log::debug!(
        "generator returned {} nodes, summary {} bytes, report {} bytes",
        output.nodes.len(),
        output.executive_summary.len(),
        output.research_report.len()
    );
    reconstruct_output(&output, options)
}

pub fn parse_generator_response(text: &str) -> Result<GeneratorOutput> {
    let body = extract_payload(text);
    if body.is_empty() {
        return Err(Error::malformed("response is empty"));
    }
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(strict) => {
            log::debug!("strict JSON decode failed ({strict}); retrying as JSON5");
            json5::from_str(body)
                .map_err(|lenient| Error::malformed(format!("{strict}; as JSON5: {lenient}")))?
        }
    };
    decode_value(value)
}

fn decode_value(value: Value) -> Result<GeneratorOutput> {
    match value {
        Value::Array(_) => {
            let nodes: Vec<RawNodeRecord> =
                serde_json::from_value(value).map_err(|err| Error::malformed(err.to_string()))?;
            Ok(GeneratorOutput {
                nodes,
                ..GeneratorOutput::default()
            })
        }
        Value::Object(_) => {
            serde_json::from_value(value).map_err(|err| Error::malformed(err.to_string()))
        }
        other => Err(Error::malformed(format!(
            "expected an object or a node array, found `{other}`"
        ))),
    }
}

/// The JSON document inside a fenced block or surrounded by prose.
fn extract_payload(text: &str) -> &str {
    if let Some(captures) = FENCE_RE.captures(text)
        && let Some(inner) = captures.get(1)
    {
        return inner.as_str().trim();
    }
    let trimmed = text.trim();
    let start = trimmed.find(['{', '[']);
    let end = trimmed.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        other => other.to_string(),
    })
}
