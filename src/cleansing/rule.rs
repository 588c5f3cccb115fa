//! Cleansing rule definitions.
//!
//! Rules arrive in a loose wire shape (`{type, target_fields, parameters, severity}` per step)
//! and are validated into closed types here, so an unknown step kind or a bad severity is a
//! [`RuleError`] at load time rather than a failure halfway through a job.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};
use crate::types::Value;

/// Per-step failure policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Failures are recorded but the row passes through.
    #[default]
    Soft,
    /// Failing rows are rejected from the output.
    Hard,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Soft => "soft",
            Severity::Hard => "hard",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(Severity::Soft),
            "hard" => Ok(Severity::Hard),
            _ => Err(RuleError::InvalidSeverity {
                value: s.to_string(),
            }),
        }
    }
}

/// Case mapping applied by a standardize step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMapping {
    Upper,
    Lower,
    /// Unrecognised or absent format hint; values are left alone.
    Preserve,
}

/// Parameters of a `standardize` step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardizeParams {
    /// Format hint, e.g. `upper`, `lower` or `ISO-4217`. Matched case-insensitively.
    pub format: Option<String>,
}

impl StandardizeParams {
    pub fn case_mapping(&self) -> CaseMapping {
        match self.format.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("iso-4217") | Some("upper") => CaseMapping::Upper,
            Some("lower") => CaseMapping::Lower,
            _ => CaseMapping::Preserve,
        }
    }
}

/// Parameters of a `fill_missing` step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillMissingParams {
    /// Replacement for missing values. `None` means missing values are failures.
    pub default: Option<Value>,
}

/// Parameters of a `deduplicate` step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeduplicateParams {
    /// Key fields. When `None`, the step's `target_fields` are used.
    pub keys: Option<Vec<String>>,
}

/// The closed set of transformation kinds, each with its own parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformationKind {
    Standardize(StandardizeParams),
    FillMissing(FillMissingParams),
    Deduplicate(DeduplicateParams),
}

impl TransformationKind {
    /// Canonical lower-case name, used as the metrics key.
    pub fn name(&self) -> &'static str {
        match self {
            TransformationKind::Standardize(_) => "standardize",
            TransformationKind::FillMissing(_) => "fill_missing",
            TransformationKind::Deduplicate(_) => "deduplicate",
        }
    }
}

/// A single cleansing transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransformationStep", into = "RawTransformationStep")]
pub struct TransformationStep {
    pub kind: TransformationKind,
    /// Fields the step operates on, in order.
    pub target_fields: Vec<String>,
    pub severity: Severity,
    /// Guard expression. Carried through but not evaluated by any handler.
    pub condition: Option<String>,
}

impl TransformationStep {
    pub fn new(kind: TransformationKind, target_fields: Vec<String>) -> Self {
        Self {
            kind,
            target_fields,
            severity: Severity::Soft,
            condition: None,
        }
    }

    pub fn standardize<S: Into<String>>(
        target_fields: impl IntoIterator<Item = S>,
        format: impl Into<String>,
    ) -> Self {
        Self::new(
            TransformationKind::Standardize(StandardizeParams {
                format: Some(format.into()),
            }),
            target_fields.into_iter().map(Into::into).collect(),
        )
    }

    pub fn fill_missing<S: Into<String>>(
        target_fields: impl IntoIterator<Item = S>,
        default: Option<Value>,
    ) -> Self {
        Self::new(
            TransformationKind::FillMissing(FillMissingParams { default }),
            target_fields.into_iter().map(Into::into).collect(),
        )
    }

    /// Deduplicate on explicit `keys`.
    pub fn deduplicate<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            TransformationKind::Deduplicate(DeduplicateParams {
                keys: Some(keys.into_iter().map(Into::into).collect()),
            }),
            Vec::new(),
        )
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_target_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.target_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Wire shape of a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawTransformationStep {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    target_fields: Vec<String>,
    #[serde(default)]
    parameters: serde_json::Map<String, serde_json::Value>,
    #[serde(default = "default_severity")]
    severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
}

fn default_severity() -> String {
    Severity::Soft.as_str().to_string()
}

impl TryFrom<RawTransformationStep> for TransformationStep {
    type Error = RuleError;

    fn try_from(raw: RawTransformationStep) -> Result<Self, Self::Error> {
        let kind_name = raw.kind.trim().to_ascii_lowercase();
        if kind_name.is_empty() {
            return Err(RuleError::EmptyTransformationType);
        }
        let severity = raw.severity.parse::<Severity>()?;

        let kind = match kind_name.as_str() {
            "standardize" | "standardise" => TransformationKind::Standardize(StandardizeParams {
                format: optional_string(&raw.parameters, "standardize", "format")?,
            }),
            "fill_missing" => {
                let default = match raw.parameters.get("default") {
                    None => None,
                    Some(v) => match Value::from_json(v) {
                        Some(Value::Null) => None,
                        Some(value) => Some(value),
                        None => {
                            return Err(RuleError::InvalidParameter {
                                kind: "fill_missing",
                                parameter: "default",
                                message: "expected a scalar value".to_string(),
                            });
                        }
                    },
                };
                TransformationKind::FillMissing(FillMissingParams { default })
            }
            "deduplicate" => TransformationKind::Deduplicate(DeduplicateParams {
                keys: key_list(&raw.parameters)?,
            }),
            _ => return Err(RuleError::UnsupportedTransformation { kind: kind_name }),
        };

        Ok(Self {
            kind,
            target_fields: raw.target_fields,
            severity,
            condition: raw.condition,
        })
    }
}

impl From<TransformationStep> for RawTransformationStep {
    fn from(step: TransformationStep) -> Self {
        let mut parameters = serde_json::Map::new();
        match &step.kind {
            TransformationKind::Standardize(p) => {
                if let Some(format) = &p.format {
                    parameters.insert("format".to_string(), format.clone().into());
                }
            }
            TransformationKind::FillMissing(p) => {
                if let Some(default) = &p.default {
                    parameters.insert("default".to_string(), default.to_json());
                }
            }
            TransformationKind::Deduplicate(p) => {
                if let Some(keys) = &p.keys {
                    parameters.insert("keys".to_string(), keys.clone().into());
                }
            }
        }
        Self {
            kind: step.kind.name().to_string(),
            target_fields: step.target_fields,
            parameters,
            severity: step.severity.as_str().to_string(),
            condition: step.condition,
        }
    }
}

fn optional_string(
    parameters: &serde_json::Map<String, serde_json::Value>,
    kind: &'static str,
    parameter: &'static str,
) -> RuleResult<Option<String>> {
    match parameters.get(parameter) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(RuleError::InvalidParameter {
            kind,
            parameter,
            message: format!("expected string, got {other}"),
        }),
    }
}

// An empty list is treated like an absent one so target_fields take over.
fn key_list(parameters: &serde_json::Map<String, serde_json::Value>) -> RuleResult<Option<Vec<String>>> {
    let invalid = |message: String| RuleError::InvalidParameter {
        kind: "deduplicate",
        parameter: "keys",
        message,
    };
    match parameters.get("keys") {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Array(items)) => {
            let keys = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(format!("expected string key, got {item}")))
                })
                .collect::<RuleResult<Vec<_>>>()?;
            Ok(if keys.is_empty() { None } else { Some(keys) })
        }
        Some(other) => Err(invalid(format!("expected list of strings, got {other}"))),
    }
}

/// A named, versioned, ordered list of transformation steps for one dataset type.
///
/// Step order is significant: each step sees the output of the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCleansingRule")]
pub struct CleansingRule {
    pub rule_id: String,
    pub name: String,
    pub dataset_type: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_from: Option<NaiveDate>,
    pub transformations: Vec<TransformationStep>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct RawCleansingRule {
    rule_id: String,
    name: String,
    dataset_type: String,
    version: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    active_from: Option<NaiveDate>,
    transformations: Vec<TransformationStep>,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<RawCleansingRule> for CleansingRule {
    type Error = RuleError;

    fn try_from(raw: RawCleansingRule) -> Result<Self, Self::Error> {
        CleansingRule {
            rule_id: raw.rule_id,
            name: raw.name,
            dataset_type: raw.dataset_type,
            version: raw.version,
            description: raw.description,
            active_from: raw.active_from,
            transformations: raw.transformations,
            metadata: raw.metadata,
        }
        .validated()
    }
}

/// Compact description of a rule for listings and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub rule_id: String,
    pub name: String,
    pub dataset_type: String,
    pub version: String,
    pub transformation_count: usize,
}

impl CleansingRule {
    pub fn new(
        rule_id: impl Into<String>,
        name: impl Into<String>,
        dataset_type: impl Into<String>,
        version: impl Into<String>,
        transformations: Vec<TransformationStep>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            name: name.into(),
            dataset_type: dataset_type.into(),
            version: version.into(),
            description: None,
            active_from: None,
            transformations,
            metadata: BTreeMap::new(),
        }
    }

    /// Trim the identifying fields and reject any that end up empty.
    pub fn validated(mut self) -> RuleResult<Self> {
        for (field, value) in [
            ("rule_id", &mut self.rule_id),
            ("name", &mut self.name),
            ("dataset_type", &mut self.dataset_type),
            ("version", &mut self.version),
        ] {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                return Err(RuleError::EmptyIdentifier { field });
            }
            *value = trimmed;
        }
        Ok(self)
    }

    pub fn describe(&self) -> RuleSummary {
        RuleSummary {
            rule_id: self.rule_id.clone(),
            name: self.name.clone(),
            dataset_type: self.dataset_type.clone(),
            version: self.version.clone(),
            transformation_count: self.transformations.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_step(json: &str) -> RuleResult<TransformationStep> {
        serde_json::from_str::<TransformationStep>(json).map_err(|e| RuleError::Parse {
            path: "inline".into(),
            message: e.to_string(),
        })
    }

    #[test]
    fn step_kind_is_trimmed_and_lowercased() {
        let step = parse_step(r#"{"type":"  Standardise ","target_fields":["Cur"],"parameters":{"format":"ISO-4217"}}"#)
            .unwrap();
        assert_eq!(step.kind_name(), "standardize");
        assert_eq!(step.severity, Severity::Soft);
        match &step.kind {
            TransformationKind::Standardize(p) => assert_eq!(p.case_mapping(), CaseMapping::Upper),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn british_spelling_serializes_under_canonical_name() {
        let step = parse_step(r#"{"type":"standardise","target_fields":["Cur"],"parameters":{"format":"upper"}}"#)
            .unwrap();
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["type"], "standardize");
    }

    #[test]
    fn unknown_kind_is_rejected_at_parse_time() {
        let err = parse_step(r#"{"type":"explode","target_fields":["a"]}"#).unwrap_err();
        assert!(err.to_string().contains("unsupported transformation type: explode"));
    }

    #[test]
    fn empty_kind_is_rejected() {
        let err = parse_step(r#"{"type":"   "}"#).unwrap_err();
        assert!(err.to_string().contains("transformation type cannot be empty"));
    }

    #[test]
    fn severity_must_be_soft_or_hard() {
        let step = parse_step(r#"{"type":"deduplicate","severity":" HARD ","parameters":{"keys":["id"]}}"#).unwrap();
        assert_eq!(step.severity, Severity::Hard);

        let err = parse_step(r#"{"type":"deduplicate","severity":"fatal"}"#).unwrap_err();
        assert!(err.to_string().contains("severity must be either"));
    }

    #[test]
    fn fill_missing_null_default_means_no_default() {
        let step = parse_step(r#"{"type":"fill_missing","target_fields":["c"],"parameters":{"default":null}}"#).unwrap();
        assert_eq!(step.kind, TransformationKind::FillMissing(FillMissingParams { default: None }));

        let step = parse_step(r#"{"type":"fill_missing","target_fields":["c"],"parameters":{"default":0}}"#).unwrap();
        assert_eq!(
            step.kind,
            TransformationKind::FillMissing(FillMissingParams {
                default: Some(Value::Int64(0))
            })
        );
    }

    #[test]
    fn empty_key_list_falls_back_to_target_fields() {
        let step = parse_step(r#"{"type":"deduplicate","target_fields":["id"],"parameters":{"keys":[]}}"#).unwrap();
        assert_eq!(step.kind, TransformationKind::Deduplicate(DeduplicateParams { keys: None }));
    }

    #[test]
    fn non_string_keys_are_invalid() {
        let err = parse_step(r#"{"type":"deduplicate","parameters":{"keys":[1]}}"#).unwrap_err();
        assert!(err.to_string().contains("invalid parameter 'keys' for deduplicate"));
    }

    #[test]
    fn step_serializes_back_to_wire_shape() {
        let step = TransformationStep::fill_missing(["CustomerId"], Some(Value::from("UNKNOWN")))
            .with_severity(Severity::Hard);
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "fill_missing",
                "target_fields": ["CustomerId"],
                "parameters": {"default": "UNKNOWN"},
                "severity": "hard"
            })
        );
        let back: TransformationStep = serde_json::from_value(json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn rule_identifiers_are_trimmed_and_required() {
        let rule: CleansingRule = serde_json::from_str(
            r#"{"rule_id":" r1 ","name":"n","dataset_type":"billing","version":"1","transformations":[]}"#,
        )
        .unwrap();
        assert_eq!(rule.rule_id, "r1");

        let err = serde_json::from_str::<CleansingRule>(
            r#"{"rule_id":"r1","name":"  ","dataset_type":"billing","version":"1","transformations":[]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("rule field 'name' cannot be empty"));
    }

    #[test]
    fn describe_counts_transformations() {
        let rule = CleansingRule::new(
            "r1",
            "Rule",
            "billing",
            "1",
            vec![TransformationStep::deduplicate(["id"])],
        );
        assert_eq!(rule.describe().transformation_count, 1);
    }
}
