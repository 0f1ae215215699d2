use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::QWeatherError,
    locale::Locale,
    model::{ForecastRange, Location, ReportKind},
    transport::ApiRequest,
};

use super::{Endpoints, Scalar, decode, measured, raw, text, wind_scale};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    #[serde(rename = "type")]
    pub label: String,
    pub update_time: String,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: String,
    pub temp_max: String,
    pub temp_min: String,
    pub text_day: String,
    pub text_night: String,
    pub icon_day: String,
    pub icon_night: String,
    pub wind_dir_day: String,
    pub wind_scale_day: String,
    pub humidity: String,
    pub precip: String,
    pub uv_index: Scalar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawForecastResponse {
    update_time: Option<String>,
    daily: Option<Vec<RawDay>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDay {
    fx_date: Option<Scalar>,
    temp_max: Option<Scalar>,
    temp_min: Option<Scalar>,
    text_day: Option<Scalar>,
    text_night: Option<Scalar>,
    icon_day: Option<Scalar>,
    icon_night: Option<Scalar>,
    wind_dir_day: Option<Scalar>,
    wind_scale_day: Option<Scalar>,
    humidity: Option<Scalar>,
    precip: Option<Scalar>,
    uv_index: Option<Scalar>,
}

pub(crate) fn request(
    endpoints: &Endpoints<'_>,
    location: &Location,
    range: ForecastRange,
) -> ApiRequest {
    endpoints
        .weather(&format!("weather/{}", range.path()))
        .param("location", location.as_param())
        .param("lang", endpoints.locale.lang.as_str())
        .param("unit", endpoints.locale.unit.as_str())
}

pub(crate) fn project(
    body: Value,
    range: ForecastRange,
    locale: &Locale,
) -> Result<ForecastReport, QWeatherError> {
    let parsed: RawForecastResponse = decode(body)?;
    let daily = parsed.daily.ok_or(QWeatherError::EmptyPayload("daily"))?;
    let temp = locale.unit.temperature();

    let forecast = daily
        .iter()
        .map(|day| ForecastDay {
            date: text(&day.fx_date, ""),
            temp_max: measured(&day.temp_max, temp),
            temp_min: measured(&day.temp_min, temp),
            text_day: text(&day.text_day, ""),
            text_night: text(&day.text_night, ""),
            icon_day: text(&day.icon_day, ""),
            icon_night: text(&day.icon_night, ""),
            wind_dir_day: text(&day.wind_dir_day, ""),
            wind_scale_day: wind_scale(&day.wind_scale_day, locale),
            humidity: measured(&day.humidity, "%"),
            precip: measured(&day.precip, " mm"),
            uv_index: raw(&day.uv_index),
        })
        .collect();

    Ok(ForecastReport {
        label: locale.report_label(ReportKind::Forecast, range.days()),
        update_time: parsed.update_time.unwrap_or_default(),
        forecast,
    })
}
