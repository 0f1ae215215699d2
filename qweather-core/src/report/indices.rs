use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::QWeatherError,
    locale::Locale,
    model::{IndexSelector, Location, ReportKind},
    transport::ApiRequest,
};

use super::{Endpoints, Scalar, decode, text};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicesReport {
    #[serde(rename = "type")]
    pub label: String,
    pub update_time: String,
    pub indices: Vec<IndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub level: String,
    pub category: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIndicesResponse {
    update_time: Option<String>,
    daily: Option<Vec<RawIndex>>,
}

#[derive(Debug, Deserialize)]
struct RawIndex {
    #[serde(rename = "type")]
    kind: Option<Scalar>,
    name: Option<Scalar>,
    level: Option<Scalar>,
    category: Option<Scalar>,
    text: Option<Scalar>,
}

pub(crate) fn request(
    endpoints: &Endpoints<'_>,
    location: &Location,
    selector: &IndexSelector,
) -> ApiRequest {
    endpoints
        .weather("indices/1d")
        .param("location", location.as_param())
        .param("lang", endpoints.locale.lang.as_str())
        .param("type", selector.as_str())
}

pub(crate) fn project(body: Value, locale: &Locale) -> Result<IndicesReport, QWeatherError> {
    let parsed: RawIndicesResponse = decode(body)?;
    let daily = parsed.daily.ok_or(QWeatherError::EmptyPayload("daily"))?;

    let indices = daily
        .iter()
        .map(|item| IndexEntry {
            kind: text(&item.kind, ""),
            name: text(&item.name, ""),
            level: text(&item.level, ""),
            category: text(&item.category, ""),
            text: text(&item.text, ""),
        })
        .collect();

    Ok(IndicesReport {
        label: locale.report_label(ReportKind::Indices, 0),
        update_time: parsed.update_time.unwrap_or_default(),
        indices,
    })
}
