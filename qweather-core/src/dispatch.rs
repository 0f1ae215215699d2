use serde_json::Value;
use tracing::{debug, info};

use crate::{
    config::{Config, Credential},
    error::QWeatherError,
    locale::Locale,
    model::{Location, Query, Report},
    report::{Endpoints, Envelope, NormalizedReport, air, forecast, indices, now, warning},
    transport::{ApiRequest, Transport},
};

/// Runs one query: build the request, call the provider once, validate, project.
#[derive(Debug)]
pub struct Dispatcher<T> {
    transport: T,
    credential: Credential,
    base_url: String,
    locale: Locale,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, credential: Credential, config: &Config) -> Self {
        Self {
            transport,
            credential,
            base_url: config.base_url(),
            locale: config.locale(),
        }
    }

    #[cfg(test)]
    fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn dispatch(&self, query: &Query) -> Result<NormalizedReport, QWeatherError> {
        let endpoints = Endpoints {
            base_url: &self.base_url,
            credential: &self.credential,
            locale: &self.locale,
        };
        let location = &query.location;
        info!(report = %query.report.kind(), %location, "dispatching query");

        let report = match &query.report {
            Report::Now => {
                let body = self.fetch(now::request(&endpoints, location), Envelope::Weather).await?;
                NormalizedReport::Now(now::project(body, &self.locale)?)
            }
            Report::Forecast(range) => {
                let request = forecast::request(&endpoints, location, *range);
                let body = self.fetch(request, Envelope::Weather).await?;
                NormalizedReport::Forecast(forecast::project(body, *range, &self.locale)?)
            }
            Report::Warning => {
                let request = warning::request(&endpoints, location);
                let body = self.fetch(request, Envelope::Weather).await?;
                NormalizedReport::Warning(warning::project(body, &self.locale)?)
            }
            Report::Air => {
                let request = air::request(&endpoints, location);
                let record = match location {
                    Location::Coordinates { .. } => {
                        let body = self.fetch(request, Envelope::AirQuality).await?;
                        air::project_coordinates(body, &self.locale)?
                    }
                    Location::Station(_) => {
                        let body = self.fetch(request, Envelope::Weather).await?;
                        air::project_station(body, &self.locale)?
                    }
                };
                NormalizedReport::Air(record)
            }
            Report::Indices(selector) => {
                let request = indices::request(&endpoints, location, selector);
                let body = self.fetch(request, Envelope::Weather).await?;
                NormalizedReport::Indices(indices::project(body, &self.locale)?)
            }
        };

        debug!(label = report.label(), "projection complete");
        Ok(report)
    }

    async fn fetch(&self, request: ApiRequest, envelope: Envelope) -> Result<Value, QWeatherError> {
        let body = self.transport.get_json(&request).await?;

        if let Err(err) = envelope.check(&body) {
            debug!(code = %err.code(), error = %err, "provider reported an application error");
            return Err(err);
        }

        Ok(body)
    }
}

/// Convenience for callers that only need the rendered JSON.
pub async fn dispatch_to_json<T: Transport>(
    dispatcher: &Dispatcher<T>,
    query: &Query,
) -> Result<String, QWeatherError> {
    dispatcher.dispatch(query).await?.to_json_pretty()
}
