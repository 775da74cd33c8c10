//! Model input features and the manual prediction payload.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Features every model needs, in the order the server feeds them to it.
pub const REQUIRED_FEATURES: [&str; 21] = [
    "koi_period",
    "koi_period_err1",
    "koi_period_err2",
    "koi_time0bk_err1",
    "koi_time0bk_err2",
    "koi_time0_err1",
    "koi_time0_err2",
    "koi_impact",
    "koi_duration",
    "koi_duration_err1",
    "koi_duration_err2",
    "koi_depth",
    "koi_prad",
    "koi_prad_err1",
    "koi_sma",
    "koi_insol_err1",
    "koi_insol_err2",
    "koi_model_snr",
    "koi_num_transits",
    "koi_bin_oedp_sig",
    "koi_srad",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("Missing required features: {}", .0.join(", "))]
    Missing(Vec<String>),
    #[error("feature '{feature}' is not a number: '{value}'")]
    NotNumeric { feature: String, value: String },
}

/// Body of `POST /predict/manual`: the model name plus every required
/// feature as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualPredictionInput {
    pub model: String,
    #[serde(flatten)]
    pub features: IndexMap<String, f64>,
}

impl ManualPredictionInput {
    /// Builds the payload from `(name, raw value)` pairs. Unknown names are
    /// dropped; every required feature must be present and numeric.
    pub fn from_pairs<'a, I>(model: impl Into<String>, pairs: I) -> Result<Self, FeatureError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let provided: IndexMap<&str, &str> = pairs.into_iter().map(|(name, value)| (name.trim(), value)).collect();
        let missing = missing_features(provided.keys().copied());
        if !missing.is_empty() {
            return Err(FeatureError::Missing(missing));
        }

        let mut features = IndexMap::with_capacity(REQUIRED_FEATURES.len());
        for feature in REQUIRED_FEATURES {
            let raw = provided.get(feature).copied().unwrap_or_default();
            let value = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| FeatureError::NotNumeric {
                    feature: feature.to_string(),
                    value: raw.to_string(),
                })?;
            features.insert(feature.to_string(), value);
        }
        Ok(Self {
            model: model.into(),
            features,
        })
    }

    /// Builds the payload from a table record given its column labels.
    pub fn from_record(model: impl Into<String>, headers: &[&str], cells: &[String]) -> Result<Self, FeatureError> {
        Self::from_pairs(model, headers.iter().copied().zip(cells.iter().map(String::as_str)))
    }
}

/// Required features absent from `available`, in canonical order.
pub fn missing_features<'a>(available: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let available: Vec<&str> = available.into_iter().map(str::trim).collect();
    REQUIRED_FEATURES
        .iter()
        .filter(|feature| !available.contains(feature))
        .map(|feature| feature.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_pairs() -> Vec<(&'static str, String)> {
        REQUIRED_FEATURES
            .iter()
            .enumerate()
            .map(|(index, name)| (*name, format!("{}.5", index)))
            .collect()
    }

    #[test]
    fn builds_payload_in_canonical_order() {
        let pairs = complete_pairs();
        let input = ManualPredictionInput::from_pairs("rf", pairs.iter().rev().map(|(n, v)| (*n, v.as_str()))).unwrap();
        let names: Vec<&str> = input.features.keys().map(String::as_str).collect();
        assert_eq!(names, REQUIRED_FEATURES);
        assert_eq!(input.features["koi_period"], 0.5);

        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body["model"], "rf");
        assert_eq!(body["koi_srad"], 20.5);
    }

    #[test]
    fn reports_missing_features() {
        let pairs = complete_pairs();
        let partial = pairs
            .iter()
            .filter(|(name, _)| *name != "koi_depth" && *name != "koi_srad")
            .map(|(n, v)| (*n, v.as_str()));
        let error = ManualPredictionInput::from_pairs("rf", partial).unwrap_err();
        assert_eq!(error, FeatureError::Missing(vec!["koi_depth".into(), "koi_srad".into()]));
        assert_eq!(error.to_string(), "Missing required features: koi_depth, koi_srad");
    }

    #[test]
    fn rejects_non_numeric_values() {
        let mut pairs = complete_pairs();
        pairs[7].1 = "n/a".into();
        let error = ManualPredictionInput::from_pairs("rf", pairs.iter().map(|(n, v)| (*n, v.as_str()))).unwrap_err();
        assert!(matches!(error, FeatureError::NotNumeric { ref feature, .. } if feature == "koi_impact"));
    }
}
