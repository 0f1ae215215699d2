//! Normalized report records and the helpers shared by every projection.
//!
//! Each submodule owns one report type: it builds the outbound request and
//! projects the provider body into a flat record. Envelope validation (the
//! status code embedded in an HTTP 200 body) lives here so that every report
//! type goes through the same check.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;

use crate::{
    config::Credential,
    error::QWeatherError,
    locale::{Locale, NOT_AVAILABLE},
    transport::{ApiRequest, Auth},
};

pub mod air;
pub mod forecast;
pub mod indices;
pub mod now;
pub mod warning;

pub use air::{AirReport, AqiCn, AqiUs, CoordinateAirReport, StationAirReport};
pub use forecast::{ForecastDay, ForecastReport};
pub use indices::{IndexEntry, IndicesReport};
pub use now::NowReport;
pub use warning::{WarningEntry, WarningReport, Warnings};

/// Output record, one shape per report type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedReport {
    Now(NowReport),
    Forecast(ForecastReport),
    Warning(WarningReport),
    Air(AirReport),
    Indices(IndicesReport),
}

impl NormalizedReport {
    /// Value of the `type` field.
    pub fn label(&self) -> &str {
        match self {
            NormalizedReport::Now(r) => &r.label,
            NormalizedReport::Forecast(r) => &r.label,
            NormalizedReport::Warning(r) => &r.label,
            NormalizedReport::Air(AirReport::Station(r)) => &r.label,
            NormalizedReport::Air(AirReport::Coordinates(r)) => &r.label,
            NormalizedReport::Indices(r) => &r.label,
        }
    }

    /// Pretty JSON with two-space indentation; non-ASCII text stays unescaped.
    pub fn to_json_pretty(&self) -> Result<String, QWeatherError> {
        serde_json::to_string_pretty(self).map_err(|e| QWeatherError::Decode(e.to_string()))
    }
}

/// A provider field value. The APIs mix quoted and bare numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Other(Value),
}

impl Scalar {
    pub fn not_available() -> Self {
        Scalar::Text(NOT_AVAILABLE.to_string())
    }

    fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Flag(b) => write!(f, "{b}"),
            Scalar::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Which status convention a response body follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Weather v7: `"code": "200"` on success, any other code is a failure.
    Weather,
    /// Air-quality v1: no code on success, an `error` object on failure.
    AirQuality,
}

impl Envelope {
    pub fn check(&self, body: &Value) -> Result<(), QWeatherError> {
        match self {
            Envelope::Weather => {
                let code = body.get("code").map(code_text).unwrap_or_else(|| "unknown".into());
                if code == "200" { Ok(()) } else { Err(QWeatherError::provider(code)) }
            }
            Envelope::AirQuality => match body.get("error") {
                Some(error) => {
                    let code = error.get("status").map(code_text).unwrap_or_else(|| "unknown".into());
                    Err(QWeatherError::provider(code))
                }
                None => Ok(()),
            },
        }
    }
}

fn code_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Request builders bound to one host, credential and locale.
#[derive(Debug, Clone, Copy)]
pub struct Endpoints<'a> {
    pub base_url: &'a str,
    pub credential: &'a Credential,
    pub locale: &'a Locale,
}

impl Endpoints<'_> {
    /// `GET {base}/v7/{path}` keyed by query string.
    pub fn weather(&self, path: &str) -> ApiRequest {
        ApiRequest::new(
            format!("{}/v7/{path}", self.base_url),
            Auth::QueryKey(self.credential.clone()),
        )
    }

    /// `GET {base}/airquality/v1/{path}` keyed by bearer token.
    pub fn air_quality(&self, path: &str) -> ApiRequest {
        ApiRequest::new(
            format!("{}/airquality/v1/{path}", self.base_url),
            Auth::Bearer(self.credential.clone()),
        )
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T, QWeatherError> {
    serde_json::from_value(body).map_err(|e| QWeatherError::Decode(e.to_string()))
}

/// Text field, or `fallback` when the provider left it out.
pub(crate) fn text(value: &Option<Scalar>, fallback: &str) -> String {
    value.as_ref().map(Scalar::to_string).unwrap_or_else(|| fallback.to_string())
}

/// Physical quantity with its unit suffix, or the not-available marker.
pub(crate) fn measured(value: &Option<Scalar>, unit: &str) -> String {
    match value {
        Some(v) if !v.is_blank() => format!("{v}{unit}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub(crate) fn wind_scale(value: &Option<Scalar>, locale: &Locale) -> String {
    match value {
        Some(v) if !v.is_blank() => locale.wind_scale(&v.to_string()),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Provider value passed through untouched, or the not-available marker.
pub(crate) fn raw(value: &Option<Scalar>) -> Scalar {
    value.clone().unwrap_or_else(Scalar::not_available)
}

pub(crate) fn raw_or(value: &Option<Scalar>, fallback: &str) -> Scalar {
    value.clone().unwrap_or_else(|| Scalar::Text(fallback.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weather_envelope_accepts_only_code_200() {
        assert!(Envelope::Weather.check(&json!({"code": "200"})).is_ok());

        let err = Envelope::Weather.check(&json!({"code": "402"})).unwrap_err();
        assert_eq!(err.to_string(), "Request quota exceeded or insufficient balance");

        let err = Envelope::Weather.check(&json!({"code": 401})).unwrap_err();
        assert_eq!(err.code(), "401");
    }

    #[test]
    fn weather_envelope_without_code_is_unknown_error() {
        let err = Envelope::Weather.check(&json!({"now": {}})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown error (code: unknown)");
    }

    #[test]
    fn air_envelope_checks_error_object() {
        assert!(Envelope::AirQuality.check(&json!({"indexes": []})).is_ok());

        let body = json!({"error": {"status": 403, "type": "forbidden", "title": "Forbidden"}});
        let err = Envelope::AirQuality.check(&body).unwrap_err();
        assert_eq!(err.to_string(), "Access denied");
        assert_eq!(err.code(), "403");
    }

    #[test]
    fn measured_appends_unit_or_marks_missing() {
        assert_eq!(measured(&Some(Scalar::Text("24".into())), "°C"), "24°C");
        assert_eq!(measured(&Some(Scalar::Number(7u64.into())), " km"), "7 km");
        assert_eq!(measured(&None, "°C"), "N/A");
        assert_eq!(measured(&Some(Scalar::Text(String::new())), "%"), "N/A");
    }

    #[test]
    fn scalar_keeps_provider_json_type() {
        let value: Scalar = serde_json::from_value(json!(46)).unwrap();
        assert_eq!(serde_json::to_value(&value).unwrap(), json!(46));

        let value: Scalar = serde_json::from_value(json!("46")).unwrap();
        assert_eq!(serde_json::to_value(&value).unwrap(), json!("46"));
    }
}
