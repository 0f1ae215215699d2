use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ReportKind;

/// Marker rendered in place of a value the provider did not send.
pub const NOT_AVAILABLE: &str = "N/A";

/// Response language requested from the provider; also drives report labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lang {
    #[default]
    #[serde(rename = "zh")]
    Zh,
    #[serde(rename = "en")]
    En,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Zh => "zh",
            Lang::En => "en",
        }
    }

    pub const fn all() -> &'static [Lang] {
        &[Lang::Zh, Lang::En]
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurement system requested from the provider (`m` metric, `i` imperial).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    #[serde(rename = "m")]
    Metric,
    #[serde(rename = "i")]
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "i",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }

    pub fn temperature(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed(&self) -> &'static str {
        match self {
            UnitSystem::Metric => " km/h",
            UnitSystem::Imperial => " mph",
        }
    }

    pub fn distance(&self) -> &'static str {
        match self {
            UnitSystem::Metric => " km",
            UnitSystem::Imperial => " mi",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation settings applied while projecting a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Locale {
    pub lang: Lang,
    pub unit: UnitSystem,
}

impl Locale {
    pub fn new(lang: Lang, unit: UnitSystem) -> Self {
        Self { lang, unit }
    }

    /// Value of the `type` field of a normalized report.
    pub fn report_label(&self, kind: ReportKind, forecast_days: u8) -> String {
        match (self.lang, kind) {
            (Lang::Zh, ReportKind::Now) => "实时天气".to_string(),
            (Lang::Zh, ReportKind::Forecast) => format!("{forecast_days}天天气预报"),
            (Lang::Zh, ReportKind::Warning) => "气象灾害预警".to_string(),
            (Lang::Zh, ReportKind::Air) => "空气质量".to_string(),
            (Lang::Zh, ReportKind::Indices) => "生活指数".to_string(),
            (Lang::En, ReportKind::Now) => "Current weather".to_string(),
            (Lang::En, ReportKind::Forecast) => format!("{forecast_days}-day forecast"),
            (Lang::En, ReportKind::Warning) => "Severe weather warnings".to_string(),
            (Lang::En, ReportKind::Air) => "Air quality".to_string(),
            (Lang::En, ReportKind::Indices) => "Life indices".to_string(),
        }
    }

    pub fn unknown(&self) -> &'static str {
        match self.lang {
            Lang::Zh => "未知",
            Lang::En => "Unknown",
        }
    }

    pub fn no_pollutant(&self) -> &'static str {
        match self.lang {
            Lang::Zh => "无",
            Lang::En => "None",
        }
    }

    pub fn no_warnings(&self) -> &'static str {
        match self.lang {
            Lang::Zh => "当前无预警信息",
            Lang::En => "No active warnings",
        }
    }

    pub fn wind_scale(&self, level: &str) -> String {
        match self.lang {
            Lang::Zh => format!("{level}级"),
            Lang::En => format!("level {level}"),
        }
    }
}
