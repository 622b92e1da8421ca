//! # Webhook Processing Module
//!
//! Decodes and validates inbound build-metrics report envelopes.
//!
//! The envelope is decoded in two stages: the outer JSON body first, then the
//! `payload.build` member, which the agent transmits as a JSON-encoded string.
//! Validation runs fail-fast in a fixed order and the first failing check
//! determines the single [`WebhookRejection`] returned:
//!
//! 1. envelope decoding
//! 2. metadata presence
//! 3. build payload decoding
//! 4. source object presence
//! 5. source completeness
//! 6. relevance of the build status

use crate::metrics::{BuildMetrics, BuildReport};
use crate::report::SourceCoordinate;
use serde::Deserialize;
use tracing::{debug, warn};

// ============================================================================
// Envelope Types
// ============================================================================

/// Inbound report-processing request as posted by the platform gate
///
/// Every member is optional here so that absence is reported by the
/// validation pipeline rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportProcessRequest {
    #[serde(default)]
    pub data: Option<ReportData>,

    #[serde(default)]
    pub meta: Option<ReportProcessMetadata>,
}

/// The `data` member of the envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportData {
    #[serde(default)]
    pub report: Option<RawBuildReport>,

    /// Headers of the original agent request, forwarded by the gate
    #[serde(default)]
    pub headers: Option<serde_json::Value>,
}

/// Build report before its inner payload has been decoded
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBuildReport {
    #[serde(default)]
    pub event_name: Option<String>,

    #[serde(default)]
    pub payload: Option<RawBuildPayload>,
}

/// The `payload` member of a raw build report
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBuildPayload {
    /// JSON-encoded [`BuildMetrics`]
    #[serde(default)]
    pub build: Option<serde_json::Value>,

    #[serde(default)]
    pub build_id: Option<String>,
}

/// The `meta` member of the envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportProcessMetadata {
    #[serde(default)]
    pub source: Option<RawSource>,
}

/// Source object as received, before completeness is checked
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub repo: Option<String>,

    #[serde(default)]
    pub sha: Option<String>,

    #[serde(default)]
    pub branch: Option<Vec<String>>,
}

impl From<RawSource> for SourceCoordinate {
    fn from(raw: RawSource) -> Self {
        Self {
            owner: raw.owner.unwrap_or_default(),
            repo: raw.repo.unwrap_or_default(),
            sha: raw.sha.unwrap_or_default(),
            branch: raw.branch.unwrap_or_default(),
        }
    }
}

/// A request that passed every validation check
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedReport {
    pub report: BuildReport,
    pub source: SourceCoordinate,
}

// ============================================================================
// Rejections
// ============================================================================

/// Reasons an inbound webhook is rejected
///
/// The display text is the message returned to the caller. Two variants share
/// the same text; [`WebhookRejection::code`] keeps them distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookRejection {
    /// Body is not a JSON object of the envelope shape
    #[error("request body is not a valid report envelope.")]
    MalformedEnvelope { reason: String },

    /// The `meta` member is absent
    #[error("missing source coordinates in request metadata.")]
    MissingMetadata,

    /// The build payload is absent or not a decodable JSON string
    #[error("could not parse build payload. Check your request.")]
    UnparsableBuildPayload { reason: String },

    /// The `meta.source` member is absent
    #[error("malformed source object in request metadata.")]
    MalformedSource,

    /// The source object lacks required members
    #[error("missing source coordinates in request metadata.")]
    IncompleteSource { missing: Vec<&'static str> },

    /// The build carries no usable status
    #[error("webhook data did not contain a report. This event will be ignored.")]
    IrrelevantEvent,
}

impl WebhookRejection {
    /// Stable machine-readable code for this rejection
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedEnvelope { .. } => "malformed_envelope",
            Self::MissingMetadata => "missing_metadata",
            Self::UnparsableBuildPayload { .. } => "unparsable_build_payload",
            Self::MalformedSource => "malformed_source",
            Self::IncompleteSource { .. } => "incomplete_source",
            Self::IrrelevantEvent => "irrelevant_event",
        }
    }

    /// Irrelevant events are "nothing to report" rather than bad input
    pub fn is_irrelevant_event(&self) -> bool {
        matches!(self, Self::IrrelevantEvent)
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Stage one: decode the outer envelope
pub fn decode_envelope(body: &[u8]) -> Result<ReportProcessRequest, WebhookRejection> {
    serde_json::from_slice(body).map_err(|e| WebhookRejection::MalformedEnvelope {
        reason: e.to_string(),
    })
}

/// Stage two: decode the JSON-encoded `build` member into [`BuildMetrics`]
pub fn decode_build_payload(
    payload: Option<&RawBuildPayload>,
) -> Result<BuildMetrics, WebhookRejection> {
    let encoded = match payload.and_then(|p| p.build.as_ref()) {
        Some(serde_json::Value::String(encoded)) => encoded,
        Some(other) => {
            return Err(WebhookRejection::UnparsableBuildPayload {
                reason: format!("expected a JSON-encoded string, found {}", json_kind(other)),
            });
        }
        None => {
            return Err(WebhookRejection::UnparsableBuildPayload {
                reason: "build payload is missing".to_string(),
            });
        }
    };

    serde_json::from_str(encoded).map_err(|e| WebhookRejection::UnparsableBuildPayload {
        reason: e.to_string(),
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// ============================================================================
// Validation Pipeline
// ============================================================================

/// Run the full validation pipeline over a raw request body
pub fn validate_request(body: &[u8]) -> Result<AcceptedReport, WebhookRejection> {
    let envelope = decode_envelope(body)?;

    let meta = envelope.meta.ok_or(WebhookRejection::MissingMetadata)?;

    let raw_report = envelope.data.and_then(|d| d.report).unwrap_or_default();
    let build = decode_build_payload(raw_report.payload.as_ref()).inspect_err(|rejection| {
        if let WebhookRejection::UnparsableBuildPayload { reason } = rejection {
            warn!(reason = %reason, "Failed to parse build-metrics payload; skipping event");
        }
    })?;

    let raw_source = meta.source.ok_or(WebhookRejection::MalformedSource)?;

    let source = SourceCoordinate::from(raw_source);
    let missing = source.missing_fields();
    if !missing.is_empty() {
        return Err(WebhookRejection::IncompleteSource { missing });
    }

    let report = BuildReport::new(
        raw_report.event_name,
        raw_report.payload.and_then(|p| p.build_id),
        build,
    );

    if !report.is_relevant() {
        debug!("Build-metrics webhook data did not contain a report; ignoring event");
        return Err(WebhookRejection::IrrelevantEvent);
    }

    Ok(AcceptedReport { report, source })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
