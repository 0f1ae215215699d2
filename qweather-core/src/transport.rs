use async_trait::async_trait;
use reqwest::{Client, header::AUTHORIZATION};
use serde_json::Value;
use std::{fmt::Debug, time::Duration};
use tracing::{debug, info};

use crate::{config::Credential, error::QWeatherError};

/// How the credential travels with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// `key=<credential>` query parameter (weather v7 API).
    QueryKey(Credential),
    /// `Authorization: Bearer <credential>` header (air-quality v1 API).
    Bearer(Credential),
}

/// One outbound GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub params: Vec<(&'static str, String)>,
    pub auth: Auth,
}

impl ApiRequest {
    pub fn new(url: impl Into<String>, auth: Auth) -> Self {
        Self { url: url.into(), params: Vec::new(), auth }
    }

    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    /// Look up a non-credential query parameter.
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }
}

/// Performs a request and hands back the decoded JSON body.
///
/// Implementations map failures onto `Connect`, `Timeout`, `HttpStatus` and
/// `Decode`; the embedded provider code is checked by the caller.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, QWeatherError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, QWeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("qweather-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QWeatherError::Transport(e.to_string()))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, QWeatherError> {
        let mut builder = self.http.get(&request.url).query(&request.params);

        builder = match &request.auth {
            Auth::QueryKey(key) => {
                debug!(url = %request.url, key = %key.masked(), "sending request with query key");
                builder.query(&[("key", key.expose())])
            }
            Auth::Bearer(key) => {
                debug!(url = %request.url, key = %key.masked(), "sending request with bearer token");
                builder.header(AUTHORIZATION, format!("Bearer {}", key.expose()))
            }
        };

        let res = builder.send().await.map_err(classify)?;

        let status = res.status();
        let body = res.text().await.map_err(classify)?;
        info!(url = %request.url, status = status.as_u16(), bytes = body.len(), "provider responded");

        if !status.is_success() {
            debug!(status = status.as_u16(), body = %truncate_body(&body), "non-success HTTP status");
            return Err(QWeatherError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| QWeatherError::Decode(e.to_string()))
    }
}

fn classify(err: reqwest::Error) -> QWeatherError {
    if err.is_timeout() {
        QWeatherError::Timeout
    } else if err.is_connect() {
        QWeatherError::Connect
    } else {
        QWeatherError::Transport(err.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    fn key() -> Credential {
        Credential::new("TEST_KEY_0123")
    }

    #[tokio::test]
    async fn query_key_request_sends_params_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v7/weather/now"))
            .and(query_param("location", "101010100"))
            .and(query_param("key", "TEST_KEY_0123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "200"})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let request = ApiRequest::new(format!("{}/v7/weather/now", server.uri()), Auth::QueryKey(key()))
            .param("location", "101010100");

        let body = transport.get_json(&request).await.unwrap();
        assert_eq!(body["code"], "200");
    }

    #[tokio::test]
    async fn bearer_request_sends_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/airquality/v1/current/39.92/116.41"))
            .and(header("authorization", "Bearer TEST_KEY_0123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"indexes": []})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let request = ApiRequest::new(
            format!("{}/airquality/v1/current/39.92/116.41", server.uri()),
            Auth::Bearer(key()),
        );

        assert!(transport.get_json(&request).await.is_ok());
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let request = ApiRequest::new(format!("{}/v7/warning/now", server.uri()), Auth::QueryKey(key()));

        let err = transport.get_json(&request).await.unwrap_err();
        assert_eq!(
            err,
            QWeatherError::HttpStatus { status: 503, body: "down for maintenance".into() }
        );
    }

    #[tokio::test]
    async fn slow_response_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": "200"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_millis(200)).unwrap();
        let request = ApiRequest::new(format!("{}/v7/weather/now", server.uri()), Auth::QueryKey(key()));

        let err = transport.get_json(&request).await.unwrap_err();
        assert_eq!(err, QWeatherError::Timeout);
        assert_eq!(err.to_string(), "Request timed out, try again later");
    }

    #[tokio::test]
    async fn refused_connection_is_connect_error() {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let request = ApiRequest::new("http://127.0.0.1:1/v7/weather/now", Auth::QueryKey(key()));

        let err = transport.get_json(&request).await.unwrap_err();
        assert_eq!(err, QWeatherError::Connect);
        assert_eq!(
            err.to_string(),
            "Network connection failed, check your network connection"
        );
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let request = ApiRequest::new(server.uri(), Auth::QueryKey(key()));

        let err = transport.get_json(&request).await.unwrap_err();
        assert!(matches!(err, QWeatherError::Decode(_)));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "预".repeat(100);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }
}
