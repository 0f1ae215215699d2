use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::QWeatherError,
    locale::Locale,
    model::{Location, ReportKind},
    transport::ApiRequest,
};

use super::{Endpoints, Scalar, decode, text};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningReport {
    #[serde(rename = "type")]
    pub label: String,
    pub update_time: String,
    pub warning_count: usize,
    pub warnings: Warnings,
}

/// Active warnings, or a sentence saying there are none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Warnings {
    Active(Vec<WarningEntry>),
    Quiet(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningEntry {
    pub id: String,
    pub sender: String,
    pub pub_time: String,
    pub title: String,
    pub severity: String,
    pub severity_color: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub type_name: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWarningResponse {
    update_time: Option<String>,
    warning: Option<Vec<RawWarning>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWarning {
    id: Option<Scalar>,
    sender: Option<Scalar>,
    pub_time: Option<Scalar>,
    title: Option<Scalar>,
    severity: Option<Scalar>,
    severity_color: Option<Scalar>,
    #[serde(rename = "type")]
    kind: Option<Scalar>,
    type_name: Option<Scalar>,
    text: Option<Scalar>,
}

pub(crate) fn request(endpoints: &Endpoints<'_>, location: &Location) -> ApiRequest {
    endpoints
        .weather("warning/now")
        .param("location", location.as_param())
        .param("lang", endpoints.locale.lang.as_str())
}

pub(crate) fn project(body: Value, locale: &Locale) -> Result<WarningReport, QWeatherError> {
    let parsed: RawWarningResponse = decode(body)?;

    let entries: Vec<WarningEntry> = parsed
        .warning
        .unwrap_or_default()
        .iter()
        .map(|w| WarningEntry {
            id: text(&w.id, ""),
            sender: text(&w.sender, ""),
            pub_time: text(&w.pub_time, ""),
            title: text(&w.title, ""),
            severity: text(&w.severity, ""),
            severity_color: text(&w.severity_color, ""),
            kind: text(&w.kind, ""),
            type_name: text(&w.type_name, ""),
            text: text(&w.text, ""),
        })
        .collect();

    let warning_count = entries.len();
    let warnings = if entries.is_empty() {
        Warnings::Quiet(locale.no_warnings().to_string())
    } else {
        Warnings::Active(entries)
    };

    Ok(WarningReport {
        label: locale.report_label(ReportKind::Warning, 0),
        update_time: parsed.update_time.unwrap_or_default(),
        warning_count,
        warnings,
    })
}
