use serde_json::Value;

use crate::entities::{RecordBatch, REQUIRED_FIELDS};
use crate::error::{IngestError, Violation};
use crate::value_objects::ValidationMode;

pub const DEFAULT_MAX_VIOLATIONS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub mode: ValidationMode,
    pub validated: usize,
}

#[derive(Debug, Clone)]
pub struct RecordValidator {
    required_fields: Vec<String>,
    sample_limit: Option<usize>,
    max_violations: usize,
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new(
            REQUIRED_FIELDS.iter().map(|field| field.to_string()).collect(),
            None,
            DEFAULT_MAX_VIOLATIONS,
        )
    }
}

impl RecordValidator {
    pub fn new(
        required_fields: Vec<String>,
        sample_limit: Option<usize>,
        max_violations: usize,
    ) -> Self {
        Self {
            required_fields,
            sample_limit: sample_limit.filter(|limit| *limit > 0),
            max_violations: max_violations.max(1),
        }
    }

    pub fn with_sample_limit(mut self, sample_limit: Option<usize>) -> Self {
        self.sample_limit = sample_limit.filter(|limit| *limit > 0);
        self
    }

    pub fn with_max_violations(mut self, max_violations: usize) -> Self {
        self.max_violations = max_violations.max(1);
        self
    }

    /// Checks the batch, or its leading sample when a limit is set.
    ///
    /// Violations are collected up to `max_violations`; any violation
    /// rejects the whole batch.
    pub fn validate(&self, batch: &RecordBatch) -> Result<ValidationReport, IngestError> {
        let validated = match self.sample_limit {
            Some(limit) => batch.len().min(limit),
            None => batch.len(),
        };

        let mut violations = Vec::new();
        let mut truncated = false;
        for (index, record) in batch.iter().take(validated).enumerate() {
            let Some(violation) = self.check_record(index, record) else {
                continue;
            };
            if violations.len() == self.max_violations {
                truncated = true;
                break;
            }
            violations.push(violation);
        }

        if !violations.is_empty() {
            return Err(IngestError::InvalidRecords {
                violations,
                truncated,
            });
        }

        let mode = if validated < batch.len() {
            ValidationMode::Partial
        } else {
            ValidationMode::Full
        };
        Ok(ValidationReport { mode, validated })
    }

    fn check_record(&self, index: usize, record: &Value) -> Option<Violation> {
        let Some(fields) = record.as_object() else {
            return Some(Violation::not_an_object(index));
        };
        let missing: Vec<String> = self
            .required_fields
            .iter()
            .filter(|field| !fields.contains_key(field.as_str()))
            .cloned()
            .collect();
        if missing.is_empty() {
            None
        } else {
            Some(Violation::missing_fields(index, missing))
        }
    }
}
