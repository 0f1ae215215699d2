use std::{fmt, str::FromStr};

use crate::{error::QWeatherError, locale::Lang};

/// The five report categories the CLI can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Now,
    Forecast,
    Warning,
    Air,
    Indices,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Now => "now",
            ReportKind::Forecast => "forecast",
            ReportKind::Warning => "warning",
            ReportKind::Air => "air",
            ReportKind::Indices => "indices",
        }
    }

    pub const fn all() -> &'static [ReportKind] {
        &[
            ReportKind::Now,
            ReportKind::Forecast,
            ReportKind::Warning,
            ReportKind::Air,
            ReportKind::Indices,
        ]
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReportKind {
    type Error = QWeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        ReportKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| QWeatherError::UnsupportedReport(value.to_string()))
    }
}

/// Where a report is for: a provider station id or a literal coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Station(String),
    Coordinates { lon: String, lat: String },
}

impl Location {
    /// Value of the `location` query parameter.
    pub fn as_param(&self) -> String {
        match self {
            Location::Station(id) => id.clone(),
            Location::Coordinates { lon, lat } => format!("{lon},{lat}"),
        }
    }
}

impl FromStr for Location {
    type Err = QWeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(QWeatherError::InvalidLocation(s.to_string()));
        }

        let Some((lon, lat)) = token.split_once(',') else {
            return Ok(Location::Station(token.to_string()));
        };

        let (lon, lat) = (lon.trim(), lat.trim());
        let in_range = |value: &str, limit: f64| {
            value.parse::<f64>().is_ok_and(|v| v.is_finite() && v.abs() <= limit)
        };

        if !in_range(lon, 180.0) || !in_range(lat, 90.0) {
            return Err(QWeatherError::InvalidLocation(s.to_string()));
        }

        Ok(Location::Coordinates { lon: lon.to_string(), lat: lat.to_string() })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_param())
    }
}

/// Forecast horizons offered by the daily forecast endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ForecastRange {
    Days3,
    Days7,
    Days10,
    #[default]
    Days15,
    Days30,
}

impl ForecastRange {
    pub fn days(&self) -> u8 {
        match self {
            ForecastRange::Days3 => 3,
            ForecastRange::Days7 => 7,
            ForecastRange::Days10 => 10,
            ForecastRange::Days15 => 15,
            ForecastRange::Days30 => 30,
        }
    }

    /// Last path segment of the endpoint, e.g. `15d`.
    pub fn path(&self) -> String {
        format!("{}d", self.days())
    }
}

impl FromStr for ForecastRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches(['d', 'D']) {
            "3" => Ok(ForecastRange::Days3),
            "7" => Ok(ForecastRange::Days7),
            "10" => Ok(ForecastRange::Days10),
            "15" => Ok(ForecastRange::Days15),
            "30" => Ok(ForecastRange::Days30),
            _ => Err(format!("unsupported forecast range '{s}' (expected 3, 7, 10, 15 or 30)")),
        }
    }
}

/// The sixteen daily life indices published by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Sport = 1,
    CarWash = 2,
    Clothing = 3,
    Fishing = 4,
    Ultraviolet = 5,
    Travel = 6,
    PollenAllergy = 7,
    Comfort = 8,
    ColdRisk = 9,
    AirPollutionDispersion = 10,
    AirConditioning = 11,
    Sunglasses = 12,
    Makeup = 13,
    Drying = 14,
    Traffic = 15,
    Sunscreen = 16,
}

impl IndexKind {
    pub const fn all() -> &'static [IndexKind] {
        &[
            IndexKind::Sport,
            IndexKind::CarWash,
            IndexKind::Clothing,
            IndexKind::Fishing,
            IndexKind::Ultraviolet,
            IndexKind::Travel,
            IndexKind::PollenAllergy,
            IndexKind::Comfort,
            IndexKind::ColdRisk,
            IndexKind::AirPollutionDispersion,
            IndexKind::AirConditioning,
            IndexKind::Sunglasses,
            IndexKind::Makeup,
            IndexKind::Drying,
            IndexKind::Traffic,
            IndexKind::Sunscreen,
        ]
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Option<IndexKind> {
        IndexKind::all().iter().copied().find(|kind| kind.code() == code)
    }

    pub fn name(&self, lang: Lang) -> &'static str {
        match lang {
            Lang::Zh => match self {
                IndexKind::Sport => "运动指数",
                IndexKind::CarWash => "洗车指数",
                IndexKind::Clothing => "穿衣指数",
                IndexKind::Fishing => "钓鱼指数",
                IndexKind::Ultraviolet => "紫外线指数",
                IndexKind::Travel => "旅游指数",
                IndexKind::PollenAllergy => "花粉过敏指数",
                IndexKind::Comfort => "舒适度指数",
                IndexKind::ColdRisk => "感冒指数",
                IndexKind::AirPollutionDispersion => "空气污染扩散条件指数",
                IndexKind::AirConditioning => "空调开启指数",
                IndexKind::Sunglasses => "太阳镜指数",
                IndexKind::Makeup => "化妆指数",
                IndexKind::Drying => "晾晒指数",
                IndexKind::Traffic => "交通指数",
                IndexKind::Sunscreen => "防晒指数",
            },
            Lang::En => match self {
                IndexKind::Sport => "sport",
                IndexKind::CarWash => "car wash",
                IndexKind::Clothing => "clothing",
                IndexKind::Fishing => "fishing",
                IndexKind::Ultraviolet => "UV",
                IndexKind::Travel => "travel",
                IndexKind::PollenAllergy => "pollen allergy",
                IndexKind::Comfort => "comfort",
                IndexKind::ColdRisk => "cold risk",
                IndexKind::AirPollutionDispersion => "air pollution dispersion",
                IndexKind::AirConditioning => "air conditioning",
                IndexKind::Sunglasses => "sunglasses",
                IndexKind::Makeup => "makeup",
                IndexKind::Drying => "drying",
                IndexKind::Traffic => "traffic",
                IndexKind::Sunscreen => "sunscreen",
            },
        }
    }
}

/// Comma-separated life index codes, forwarded to the provider verbatim.
///
/// Code `0` asks the provider for every index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSelector(String);

impl IndexSelector {
    pub const DEFAULT: &'static str = "1,2,3,5,9,16";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Named indices this selector asks for; empty when it asks for all of them.
    pub fn kinds(&self) -> Vec<IndexKind> {
        self.0
            .split(',')
            .filter_map(|item| item.trim().parse::<u8>().ok())
            .filter_map(IndexKind::from_code)
            .collect()
    }
}

impl Default for IndexSelector {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl FromStr for IndexSelector {
    type Err = QWeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = !s.trim().is_empty()
            && s.split(',').all(|item| item.trim().parse::<u8>().is_ok_and(|code| code <= 16));

        if !valid {
            return Err(QWeatherError::InvalidSelector(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}

/// A report request together with its report-specific options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Now,
    Forecast(ForecastRange),
    Warning,
    Air,
    Indices(IndexSelector),
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        match self {
            Report::Now => ReportKind::Now,
            Report::Forecast(_) => ReportKind::Forecast,
            Report::Warning => ReportKind::Warning,
            Report::Air => ReportKind::Air,
            Report::Indices(_) => ReportKind::Indices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub report: Report,
    pub location: Location,
}

impl Query {
    pub fn new(report: Report, location: &str) -> Result<Self, QWeatherError> {
        Ok(Self { report, location: location.parse()? })
    }
}
