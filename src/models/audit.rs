//! Audit trace models.
//!
//! Every derivation records the rule decisions it made, in order, so a billing
//! clerk can see why a record carries the codes it does.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a derivation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during derivation.
///
/// Warnings mark lookups that degraded to a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a derivation.
///
/// # Example
///
/// ```
/// use service_record_engine::models::AuditTrace;
///
/// let mut trace = AuditTrace::default();
/// trace.record("time_class", "Time Class", serde_json::json!({}), serde_json::json!({}), "ok");
/// assert_eq!(trace.steps[0].step_number, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrace {
    /// The sequence of derivation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during derivation.
    pub warnings: Vec<AuditWarning>,
    /// The total derivation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Appends a step, numbering it after the last one.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: impl Into<String>,
    ) {
        self.steps.push(AuditStep {
            step_number: self.steps.len() as u32 + 1,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning: reasoning.into(),
        });
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: &str, message: impl Into<String>) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message: message.into(),
            severity: "medium".to_string(),
        });
    }

    /// Returns true if any step used the given rule.
    pub fn has_rule(&self, rule_id: &str) -> bool {
        self.steps.iter().any(|s| s.rule_id == rule_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_numbered_in_order() {
        let mut trace = AuditTrace::default();
        trace.record("a", "A", serde_json::json!({}), serde_json::json!({}), "first");
        trace.record("b", "B", serde_json::json!({}), serde_json::json!({}), "second");

        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.steps[0].step_number, 1);
        assert_eq!(trace.steps[1].step_number, 2);
        assert!(trace.has_rule("b"));
        assert!(!trace.has_rule("c"));
    }

    #[test]
    fn test_warning_serialization() {
        let mut trace = AuditTrace::default();
        trace.warn("PLAN_LOOKUP_UNAVAILABLE", "plan store timed out");

        let json = serde_json::to_string(&trace).unwrap();
        assert!(json.contains("\"code\":\"PLAN_LOOKUP_UNAVAILABLE\""));
        assert!(json.contains("\"durationUs\":0"));
    }
}
