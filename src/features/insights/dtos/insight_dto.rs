use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::insights::models::Insight;
use crate::shared::validation::validate_not_blank;

fn validate_json_object(value: &Value) -> Result<(), ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::new("not_object").with_message("must be a JSON object".into()));
    }
    Ok(())
}

fn validate_entries(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(ValidationError::new("blank_entry")
            .with_message("entries must not be blank".into()));
    }
    Ok(())
}

/// Request DTO for storing an insight
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInsightDto {
    #[validate(custom(function = "validate_not_blank"))]
    pub executive_summary: String,
    #[schema(value_type = Object)]
    #[validate(custom(function = "validate_json_object"))]
    pub key_findings: Value,
    #[serde(default)]
    #[validate(custom(function = "validate_entries"))]
    pub recommendations: Vec<String>,
    #[validate(custom(function = "validate_entries"))]
    pub operational_actions: Option<Vec<String>>,
    #[serde(default = "empty_object")]
    #[schema(value_type = Object)]
    #[validate(custom(function = "validate_json_object"))]
    pub raw_metrics: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// Response DTO for an insight
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InsightResponseDto {
    pub id: Uuid,
    pub executive_summary: String,
    #[schema(value_type = Object)]
    pub key_findings: Value,
    pub recommendations: Vec<String>,
    pub operational_actions: Option<Vec<String>>,
    #[schema(value_type = Object)]
    pub raw_metrics: Value,
    pub created_at: DateTime<Utc>,
}

impl From<Insight> for InsightResponseDto {
    fn from(i: Insight) -> Self {
        Self {
            id: i.id,
            executive_summary: i.executive_summary,
            key_findings: i.key_findings,
            recommendations: i.recommendations,
            operational_actions: i.operational_actions,
            raw_metrics: i.raw_metrics,
            created_at: i.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dto() -> CreateInsightDto {
        CreateInsightDto {
            executive_summary: "Avalanche callouts doubled this month".to_string(),
            key_findings: json!({ "busiest_station": "North Ridge" }),
            recommendations: vec!["Pre-position shovels at North Ridge".to_string()],
            operational_actions: None,
            raw_metrics: json!({}),
        }
    }

    #[test]
    fn test_valid_insight() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn test_key_findings_must_be_object() {
        let mut d = dto();
        d.key_findings = json!(["not", "an", "object"]);
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_blank_action_rejected() {
        let mut d = dto();
        d.operational_actions = Some(vec!["  ".to_string()]);
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_raw_metrics_defaults_to_empty_object() {
        let d: CreateInsightDto = serde_json::from_value(json!({
            "executive_summary": "Quiet week",
            "key_findings": {}
        }))
        .unwrap();
        assert_eq!(d.raw_metrics, json!({}));
        assert!(d.recommendations.is_empty());
    }
}
