//! Structured pipeline output.

use super::candidate::ValidationContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How a failing validator affects the overall result.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Failure makes the move invalid.
    Blocking,
    /// Failure is reported but does not block.
    Warning,
    /// Failure is informational only.
    Info,
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Severity of the validator that raised it.
    #[serde(rename = "type")]
    pub kind: Severity,
    /// Registered name of the validator.
    pub validator_name: String,
    /// Message shown to the player.
    pub message: String,
    /// Validator-specific detail.
    pub data: Option<Value>,
    /// Context the pipeline ran with.
    pub context: ValidationContext,
}

/// Bookkeeping about a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    /// Pipeline that produced the result.
    pub pipeline_name: String,
    /// Wall-clock duration of the run.
    pub execution_time_ms: u64,
    /// Validators that actually ran, in order.
    pub validators_executed: Vec<String>,
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
}

/// Outcome of running a pipeline over a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// False if any blocking validator failed.
    pub valid: bool,
    /// Blocking failures.
    pub errors: Vec<ValidationIssue>,
    /// Warning failures.
    pub warnings: Vec<ValidationIssue>,
    /// Informational failures.
    pub info: Vec<ValidationIssue>,
    /// Run bookkeeping.
    pub metadata: ResultMetadata,
    /// Data each validator returned, keyed by validator name.
    #[serde(flatten)]
    pub supplemental: BTreeMap<String, Value>,
}

impl ValidationResult {
    pub(crate) fn new(pipeline_name: &str) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
            metadata: ResultMetadata {
                pipeline_name: pipeline_name.to_string(),
                execution_time_ms: 0,
                validators_executed: Vec::new(),
                timestamp: Utc::now(),
            },
            supplemental: BTreeMap::new(),
        }
    }

    /// Files an issue under the list matching its severity.
    pub(crate) fn record(&mut self, issue: ValidationIssue) {
        match issue.kind {
            Severity::Blocking => {
                self.valid = false;
                self.errors.push(issue);
            }
            Severity::Warning => self.warnings.push(issue),
            Severity::Info => self.info.push(issue),
        }
    }

    /// Data returned by the named validator.
    pub fn data_for(&self, validator_name: &str) -> Option<&Value> {
        self.supplemental.get(validator_name)
    }

    /// True if both results agree on everything except timing.
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.valid == other.valid
            && self.errors == other.errors
            && self.warnings == other.warnings
            && self.info == other.info
    }

    /// First blocking message, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(kind: Severity) -> ValidationIssue {
        ValidationIssue {
            kind,
            validator_name: "probe".to_string(),
            message: "probe failed".to_string(),
            data: None,
            context: ValidationContext::default(),
        }
    }

    #[test]
    fn test_only_blocking_issues_invalidate() {
        let mut result = ValidationResult::new("default");
        result.record(issue(Severity::Warning));
        result.record(issue(Severity::Info));
        assert!(result.valid);
        result.record(issue(Severity::Blocking));
        assert!(!result.valid);
        assert_eq!(result.first_error(), Some("probe failed"));
    }

    #[test]
    fn test_supplemental_data_flattened() {
        let mut result = ValidationResult::new("default");
        result
            .supplemental
            .insert("tile_availability".to_string(), serde_json::json!({"shortages": []}));
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["tile_availability"]["shortages"].is_array());
        assert_eq!(json["metadata"]["pipelineName"], "default");
    }
}
