use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Signals extracted from one job posting, partitioned into the four groups the
/// extraction pipeline produces. Keys are open-ended; the engine only reads the
/// ones it knows about and falls back to defaults for anything missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureBundle {
    pub text_features: FeatureGroup,
    pub quality_features: FeatureGroup,
    pub content_features: FeatureGroup,
    pub red_flag_features: FeatureGroup,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_content: Option<String>,
}

/// Body accepted by `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub features: FeatureBundle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_content: Option<String>,
}

impl PredictionRequest {
    /// Folds the request-level posting text into the bundle.
    pub fn into_bundle(self) -> FeatureBundle {
        let mut bundle = self.features;
        if self.job_content.is_some() {
            bundle.job_content = self.job_content;
        }
        bundle
    }
}

/// Name → value mapping for one feature group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureGroup(BTreeMap<String, Value>);

impl FeatureGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Raised when a known signal carries a value of the wrong JSON type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureBundleError {
    #[error("{group}.{key} must be a {expected}, found {found}")]
    InvalidType {
        group: &'static str,
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

struct Lookup<'a> {
    group: &'static str,
    values: &'a FeatureGroup,
}

impl<'a> Lookup<'a> {
    fn new(group: &'static str, values: &'a FeatureGroup) -> Self {
        Self { group, values }
    }

    fn flag(&self, key: &'static str, default: bool) -> Result<bool, FeatureBundleError> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(other) => Err(self.mismatch(key, "boolean", other)),
        }
    }

    fn number(&self, key: &'static str, default: f64) -> Result<f64, FeatureBundleError> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Number(number)) => number
                .as_f64()
                .ok_or_else(|| self.mismatch(key, "number", &Value::Number(number.clone()))),
            Some(other) => Err(self.mismatch(key, "number", other)),
        }
    }

    fn mismatch(
        &self,
        key: &'static str,
        expected: &'static str,
        found: &Value,
    ) -> FeatureBundleError {
        FeatureBundleError::InvalidType {
            group: self.group,
            key,
            expected,
            found: json_kind(found),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSignals {
    pub sentence_count: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualitySignals {
    pub grammar_quality_score: f64,
    /// Carried for future calibration; no formula reads it yet.
    pub readability_score: f64,
    pub has_clear_responsibilities: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentSignals {
    pub mentions_salary: bool,
    pub uses_generic_email: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RedFlagSignals {
    pub requests_payment: bool,
    pub requests_ssn: bool,
    pub requests_bank_info: bool,
    pub guarantees_income: bool,
    pub too_good_to_be_true: bool,
    pub has_training_fee: bool,
    pub uses_generic_email: bool,
    pub requests_off_platform: bool,
    pub urgency_keywords: f64,
    pub pressure_keywords: f64,
}

/// Typed, validated view over a [`FeatureBundle`] with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSignals {
    pub text: TextSignals,
    pub quality: QualitySignals,
    pub content: ContentSignals,
    pub red_flags: RedFlagSignals,
}

impl Default for FeatureSignals {
    fn default() -> Self {
        Self {
            text: TextSignals {
                sentence_count: 0.0,
            },
            quality: QualitySignals {
                grammar_quality_score: 50.0,
                readability_score: 50.0,
                has_clear_responsibilities: true,
            },
            content: ContentSignals {
                mentions_salary: false,
                uses_generic_email: false,
            },
            red_flags: RedFlagSignals::default(),
        }
    }
}

impl FeatureSignals {
    pub fn extract(bundle: &FeatureBundle) -> Result<Self, FeatureBundleError> {
        let defaults = Self::default();

        let text = Lookup::new("textFeatures", &bundle.text_features);
        let quality = Lookup::new("qualityFeatures", &bundle.quality_features);
        let content = Lookup::new("contentFeatures", &bundle.content_features);
        let red = Lookup::new("redFlagFeatures", &bundle.red_flag_features);

        Ok(Self {
            text: TextSignals {
                sentence_count: text.number("sentenceCount", defaults.text.sentence_count)?,
            },
            quality: QualitySignals {
                grammar_quality_score: quality.number(
                    "grammarQualityScore",
                    defaults.quality.grammar_quality_score,
                )?,
                readability_score: quality
                    .number("readabilityScore", defaults.quality.readability_score)?,
                has_clear_responsibilities: quality.flag(
                    "hasClearResponsibilities",
                    defaults.quality.has_clear_responsibilities,
                )?,
            },
            content: ContentSignals {
                mentions_salary: content.flag("mentionsSalary", false)?,
                uses_generic_email: content.flag("usesGenericEmail", false)?,
            },
            red_flags: RedFlagSignals {
                requests_payment: red.flag("requestsPayment", false)?,
                requests_ssn: red.flag("requestsSSN", false)?,
                requests_bank_info: red.flag("requestsBankInfo", false)?,
                guarantees_income: red.flag("guaranteesIncome", false)?,
                too_good_to_be_true: red.flag("tooGoodToBeTrue", false)?,
                has_training_fee: red.flag("hasTrainingFee", false)?,
                uses_generic_email: red.flag("usesGenericEmail", false)?,
                requests_off_platform: red.flag("requestsOffPlatform", false)?,
                urgency_keywords: red.number("urgencyKeywords", 0.0)?,
                pressure_keywords: red.number("pressureKeywords", 0.0)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_bundle_yields_documented_defaults() {
        let signals = FeatureSignals::extract(&FeatureBundle::default()).expect("defaults apply");
        assert_eq!(signals, FeatureSignals::default());
        assert_eq!(signals.quality.grammar_quality_score, 50.0);
        assert!(signals.quality.has_clear_responsibilities);
    }

    #[test]
    fn null_values_fall_back_to_defaults() {
        let bundle = FeatureBundle {
            quality_features: FeatureGroup::new().with("grammarQualityScore", Value::Null),
            ..FeatureBundle::default()
        };
        let signals = FeatureSignals::extract(&bundle).expect("null treated as absent");
        assert_eq!(signals.quality.grammar_quality_score, 50.0);
    }

    #[test]
    fn wrong_type_is_rejected_with_location() {
        let bundle = FeatureBundle {
            red_flag_features: FeatureGroup::new().with("requestsPayment", "yes"),
            ..FeatureBundle::default()
        };
        let err = FeatureSignals::extract(&bundle).expect_err("string flag rejected");
        assert_eq!(
            err,
            FeatureBundleError::InvalidType {
                group: "redFlagFeatures",
                key: "requestsPayment",
                expected: "boolean",
                found: "string",
            }
        );
        assert_eq!(
            err.to_string(),
            "redFlagFeatures.requestsPayment must be a boolean, found string"
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let bundle = FeatureBundle {
            text_features: FeatureGroup::new()
                .with("wordCount", 420)
                .with("hasEmails", json!(true)),
            ..FeatureBundle::default()
        };
        assert!(FeatureSignals::extract(&bundle).is_ok());
    }

    #[test]
    fn request_body_deserializes_from_camel_case() {
        let request: PredictionRequest = serde_json::from_value(json!({
            "features": {
                "textFeatures": { "sentenceCount": 12 },
                "qualityFeatures": { "grammarQualityScore": 72.5 },
                "contentFeatures": {},
                "redFlagFeatures": { "urgencyKeywords": 3 },
                "metadata": { "company": "Acme" }
            },
            "jobContent": "We are hiring"
        }))
        .expect("request parses");

        let bundle = request.into_bundle();
        assert_eq!(bundle.job_content.as_deref(), Some("We are hiring"));
        let signals = FeatureSignals::extract(&bundle).expect("valid signals");
        assert_eq!(signals.text.sentence_count, 12.0);
        assert_eq!(signals.quality.grammar_quality_score, 72.5);
        assert_eq!(signals.red_flags.urgency_keywords, 3.0);
    }

    #[test]
    fn request_requires_all_four_groups() {
        let parsed = serde_json::from_value::<PredictionRequest>(json!({
            "features": {
                "textFeatures": {},
                "qualityFeatures": {},
                "contentFeatures": {}
            }
        }));
        assert!(parsed.is_err());
    }
}
