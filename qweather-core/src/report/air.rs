//! Air quality. Station ids go to the weather v7 endpoint and produce a
//! single-scale record; coordinate pairs go to the air-quality v1 endpoint and
//! produce a record with both the Chinese (`qaqi`) and US EPA scales.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::{
    error::QWeatherError,
    locale::Locale,
    model::{Location, ReportKind},
    transport::ApiRequest,
};

use super::{Endpoints, Scalar, decode, raw, raw_or};

const CN_SCALE: &str = "qaqi";
const US_SCALE: &str = "us-epa";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AirReport {
    Station(StationAirReport),
    Coordinates(CoordinateAirReport),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationAirReport {
    #[serde(rename = "type")]
    pub label: String,
    #[serde(rename = "updateTime")]
    pub update_time: String,
    pub aqi: Scalar,
    pub level: Scalar,
    pub category: Scalar,
    pub primary: Scalar,
    pub pm10: Scalar,
    pub pm2p5: Scalar,
    pub no2: Scalar,
    pub so2: Scalar,
    pub co: Scalar,
    pub o3: Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateAirReport {
    #[serde(rename = "type")]
    pub label: String,
    #[serde(rename = "updateTime")]
    pub update_time: String,
    pub aqi_cn: AqiCn,
    pub aqi_us: AqiUs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiCn {
    pub aqi: Scalar,
    pub level: Scalar,
    pub category: Scalar,
    pub color: Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiUs {
    pub aqi: Scalar,
    pub category: Scalar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStationResponse {
    update_time: Option<String>,
    now: Option<RawStationAir>,
}

#[derive(Debug, Deserialize)]
struct RawStationAir {
    aqi: Option<Scalar>,
    level: Option<Scalar>,
    category: Option<Scalar>,
    primary: Option<Scalar>,
    pm10: Option<Scalar>,
    pm2p5: Option<Scalar>,
    no2: Option<Scalar>,
    so2: Option<Scalar>,
    co: Option<Scalar>,
    o3: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
struct RawCoordinateResponse {
    metadata: Option<RawMetadata>,
    indexes: Option<RawIndexes>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    timestamp: Option<String>,
}

/// The v1 API lists indexes as an array tagged by `code`; a map keyed by the
/// scale code is accepted as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIndexes {
    List(Vec<RawAirIndex>),
    ByCode(HashMap<String, RawAirIndex>),
}

impl RawIndexes {
    fn find(&self, code: &str) -> Option<&RawAirIndex> {
        match self {
            RawIndexes::List(items) => items.iter().find(|i| i.code.as_deref() == Some(code)),
            RawIndexes::ByCode(map) => map.get(code),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawAirIndex {
    code: Option<String>,
    aqi: Option<Scalar>,
    level: Option<Scalar>,
    category: Option<Scalar>,
    color: Option<Scalar>,
}

pub(crate) fn request(endpoints: &Endpoints<'_>, location: &Location) -> ApiRequest {
    match location {
        Location::Coordinates { lon, lat } => endpoints
            .air_quality(&format!("current/{lat}/{lon}"))
            .param("lang", endpoints.locale.lang.as_str()),
        Location::Station(_) => endpoints
            .weather("air/now")
            .param("location", location.as_param())
            .param("lang", endpoints.locale.lang.as_str()),
    }
}

pub(crate) fn project_station(body: Value, locale: &Locale) -> Result<AirReport, QWeatherError> {
    let parsed: RawStationResponse = decode(body)?;
    let now = parsed.now.ok_or(QWeatherError::EmptyPayload("now"))?;

    Ok(AirReport::Station(StationAirReport {
        label: locale.report_label(ReportKind::Air, 0),
        update_time: parsed.update_time.unwrap_or_default(),
        aqi: raw(&now.aqi),
        level: raw(&now.level),
        category: raw_or(&now.category, locale.unknown()),
        primary: raw_or(&now.primary, locale.no_pollutant()),
        pm10: raw(&now.pm10),
        pm2p5: raw(&now.pm2p5),
        no2: raw(&now.no2),
        so2: raw(&now.so2),
        co: raw(&now.co),
        o3: raw(&now.o3),
    }))
}

pub(crate) fn project_coordinates(
    body: Value,
    locale: &Locale,
) -> Result<AirReport, QWeatherError> {
    let parsed: RawCoordinateResponse = decode(body)?;
    let indexes = parsed.indexes.ok_or(QWeatherError::EmptyPayload("indexes"))?;

    let missing = RawAirIndex::default();
    let cn = indexes.find(CN_SCALE).unwrap_or(&missing);
    let us = indexes.find(US_SCALE).unwrap_or(&missing);

    Ok(AirReport::Coordinates(CoordinateAirReport {
        label: locale.report_label(ReportKind::Air, 0),
        update_time: parsed.metadata.and_then(|m| m.timestamp).unwrap_or_default(),
        aqi_cn: AqiCn {
            aqi: raw(&cn.aqi),
            level: raw(&cn.level),
            category: raw_or(&cn.category, locale.unknown()),
            color: raw_or(&cn.color, ""),
        },
        aqi_us: AqiUs {
            aqi: raw(&us.aqi),
            category: raw_or(&us.category, locale.unknown()),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn station_record_is_single_scale() {
        let body = json!({
            "code": "200",
            "updateTime": "2024-05-01T10:00+08:00",
            "now": {
                "pubTime": "2024-05-01T10:00+08:00",
                "aqi": "46",
                "level": "1",
                "category": "优",
                "primary": "NA",
                "pm10": "46",
                "pm2p5": "12",
                "no2": "19",
                "so2": "2",
                "co": "0.3",
                "o3": "87"
            }
        });

        let AirReport::Station(report) = project_station(body, &Locale::default()).unwrap() else {
            panic!("expected station record");
        };
        assert_eq!(report.label, "空气质量");
        assert_eq!(report.aqi, Scalar::Text("46".into()));
        assert_eq!(report.category, Scalar::Text("优".into()));
        assert_eq!(report.co, Scalar::Text("0.3".into()));

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("aqi_cn").is_none());
        assert_eq!(value["pm2p5"], "12");
    }

    #[test]
    fn station_defaults_fill_missing_pollutants() {
        let body = json!({"code": "200", "now": {"aqi": "80"}});
        let AirReport::Station(report) = project_station(body, &Locale::default()).unwrap() else {
            panic!("expected station record");
        };

        assert_eq!(report.primary, Scalar::Text("无".into()));
        assert_eq!(report.category, Scalar::Text("未知".into()));
        assert_eq!(report.o3, Scalar::not_available());
    }

    #[test]
    fn coordinate_record_is_dual_scale() {
        let body = json!({
            "metadata": {"tag": "abc", "timestamp": "2024-05-01T02:00Z"},
            "indexes": [
                {
                    "code": "us-epa",
                    "name": "AQI (US)",
                    "aqi": 72,
                    "category": "Moderate",
                    "color": {"red": 255, "green": 255, "blue": 0, "alpha": 1}
                },
                {
                    "code": "qaqi",
                    "name": "QAQI",
                    "aqi": 1.4,
                    "level": "1",
                    "category": "Excellent",
                    "color": {"red": 80, "green": 240, "blue": 230, "alpha": 1}
                }
            ]
        });

        let AirReport::Coordinates(report) =
            project_coordinates(body, &Locale::default()).unwrap()
        else {
            panic!("expected coordinate record");
        };
        assert_eq!(report.update_time, "2024-05-01T02:00Z");

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["aqi_cn"]["aqi"], json!(1.4));
        assert_eq!(value["aqi_cn"]["level"], "1");
        assert_eq!(value["aqi_cn"]["color"]["green"], 240);
        assert_eq!(value["aqi_us"]["aqi"], json!(72));
        assert_eq!(value["aqi_us"]["category"], "Moderate");
        assert!(value.get("pm10").is_none());
    }

    #[test]
    fn coordinate_indexes_keyed_by_code_are_accepted() {
        let body = json!({
            "metadata": {"timestamp": "t"},
            "indexes": {"qaqi": {"aqi": "30", "level": "1", "category": "优", "color": "#00e400"}}
        });

        let AirReport::Coordinates(report) =
            project_coordinates(body, &Locale::default()).unwrap()
        else {
            panic!("expected coordinate record");
        };
        assert_eq!(report.aqi_cn.color, Scalar::Text("#00e400".into()));
        assert_eq!(report.aqi_us.aqi, Scalar::not_available());
        assert_eq!(report.aqi_us.category, Scalar::Text("未知".into()));
    }

    #[test]
    fn coordinate_without_indexes_is_an_error() {
        let err = project_coordinates(json!({"metadata": {}}), &Locale::default()).unwrap_err();
        assert_eq!(err, QWeatherError::EmptyPayload("indexes"));
    }
}
