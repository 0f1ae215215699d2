use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::QWeatherError,
    locale::Locale,
    model::{Location, ReportKind},
    transport::ApiRequest,
};

use super::{Endpoints, Scalar, decode, measured, text, wind_scale};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowReport {
    #[serde(rename = "type")]
    pub label: String,
    pub update_time: String,
    pub temperature: String,
    pub feels_like: String,
    pub condition: String,
    pub icon: String,
    pub humidity: String,
    pub wind_dir: String,
    pub wind_scale: String,
    pub wind_speed: String,
    pub pressure: String,
    pub visibility: String,
    pub cloud: String,
    pub dew: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNowResponse {
    update_time: Option<String>,
    now: Option<RawNow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNow {
    temp: Option<Scalar>,
    feels_like: Option<Scalar>,
    text: Option<Scalar>,
    icon: Option<Scalar>,
    humidity: Option<Scalar>,
    wind_dir: Option<Scalar>,
    wind_scale: Option<Scalar>,
    wind_speed: Option<Scalar>,
    pressure: Option<Scalar>,
    vis: Option<Scalar>,
    cloud: Option<Scalar>,
    dew: Option<Scalar>,
}

pub(crate) fn request(endpoints: &Endpoints<'_>, location: &Location) -> ApiRequest {
    endpoints
        .weather("weather/now")
        .param("location", location.as_param())
        .param("lang", endpoints.locale.lang.as_str())
        .param("unit", endpoints.locale.unit.as_str())
}

pub(crate) fn project(body: Value, locale: &Locale) -> Result<NowReport, QWeatherError> {
    let parsed: RawNowResponse = decode(body)?;
    let now = parsed.now.ok_or(QWeatherError::EmptyPayload("now"))?;
    let unit = locale.unit;

    Ok(NowReport {
        label: locale.report_label(ReportKind::Now, 0),
        update_time: parsed.update_time.unwrap_or_default(),
        temperature: measured(&now.temp, unit.temperature()),
        feels_like: measured(&now.feels_like, unit.temperature()),
        condition: text(&now.text, locale.unknown()),
        icon: text(&now.icon, ""),
        humidity: measured(&now.humidity, "%"),
        wind_dir: text(&now.wind_dir, locale.unknown()),
        wind_scale: wind_scale(&now.wind_scale, locale),
        wind_speed: measured(&now.wind_speed, unit.speed()),
        pressure: measured(&now.pressure, " hPa"),
        visibility: measured(&now.vis, unit.distance()),
        cloud: measured(&now.cloud, "%"),
        dew: measured(&now.dew, unit.temperature()),
    })
}
