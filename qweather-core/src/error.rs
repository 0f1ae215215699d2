use thiserror::Error;

use crate::config::API_KEY_ENV;

/// Every way a single report invocation can fail.
///
/// All variants are terminal: nothing is retried, and the binary turns each one
/// into a JSON error document plus a non-zero exit status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QWeatherError {
    #[error("QWEATHER_API_KEY environment variable is not set")]
    MissingCredential,

    #[error("Network connection failed, check your network connection")]
    Connect,

    #[error("Request timed out, try again later")]
    Timeout,

    #[error("HTTP request failed ({status})")]
    HttpStatus { status: u16, body: String },

    #[error("{message}")]
    Provider { code: String, message: String },

    #[error("Provider response is missing its `{0}` payload")]
    EmptyPayload(&'static str),

    #[error("Failed to parse provider response: {0}")]
    Decode(String),

    #[error("Unsupported report type '{0}'. Supported types: now, forecast, warning, air, indices")]
    UnsupportedReport(String),

    #[error("Invalid location '{0}': expected a station id (e.g. 101010100) or a lon,lat pair (e.g. 116.41,39.92)")]
    InvalidLocation(String),

    #[error("Invalid index selector '{0}': expected comma-separated index codes between 0 and 16")]
    InvalidSelector(String),

    #[error("Request failed: {0}")]
    Transport(String),
}

impl QWeatherError {
    /// Build an application error from the status code embedded in a response body.
    pub fn provider(code: impl Into<String>) -> Self {
        let code = code.into();
        let message = provider_error_message(&code);
        Self::Provider { code, message }
    }

    /// Stable machine-readable code written next to the message in the error document.
    pub fn code(&self) -> String {
        match self {
            Self::MissingCredential => "missing_credential".to_string(),
            Self::Connect => "connection_failed".to_string(),
            Self::Timeout => "timeout".to_string(),
            Self::HttpStatus { status, .. } => status.to_string(),
            Self::Provider { code, .. } => code.clone(),
            Self::EmptyPayload(_) => "empty_payload".to_string(),
            Self::Decode(_) => "invalid_response".to_string(),
            Self::UnsupportedReport(_) => "unsupported_report".to_string(),
            Self::InvalidLocation(_) => "invalid_location".to_string(),
            Self::InvalidSelector(_) => "invalid_selector".to_string(),
            Self::Transport(_) => "transport".to_string(),
        }
    }

    /// Remediation hint printed after the error document, if one applies.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingCredential => Some(format!(
                "Hint: run `export {API_KEY_ENV}='your_api_key'` or `qweather configure`."
            )),
            Self::Provider { code, .. } if code == "401" => Some(format!(
                "Hint: check the key in {API_KEY_ENV} or rerun `qweather configure`."
            )),
            _ => None,
        }
    }
}

/// Human-readable cause for a provider application error code.
pub fn provider_error_message(code: &str) -> String {
    let known = match code {
        "400" => "Bad request, check the parameter format",
        "401" => "Authentication failed, check that the API key is correct",
        "402" => "Request quota exceeded or insufficient balance",
        "403" => "Access denied",
        "404" => "The requested data does not exist",
        "429" => "Request rate limit exceeded",
        "500" => "Server error, try again later",
        _ => return format!("Unknown error (code: {code})"),
    };

    known.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_table_entries() {
        let table = [
            ("400", "Bad request, check the parameter format"),
            ("401", "Authentication failed, check that the API key is correct"),
            ("402", "Request quota exceeded or insufficient balance"),
            ("403", "Access denied"),
            ("404", "The requested data does not exist"),
            ("429", "Request rate limit exceeded"),
            ("500", "Server error, try again later"),
        ];

        for (code, expected) in table {
            let err = QWeatherError::provider(code);
            assert_eq!(err.to_string(), expected);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn unknown_code_uses_generic_message_with_raw_code() {
        let err = QWeatherError::provider("204");
        assert_eq!(err.to_string(), "Unknown error (code: 204)");
        assert_eq!(err.code(), "204");
    }

    #[test]
    fn transport_errors_have_distinct_wording() {
        assert_eq!(
            QWeatherError::Connect.to_string(),
            "Network connection failed, check your network connection"
        );
        assert_eq!(QWeatherError::Timeout.to_string(), "Request timed out, try again later");
        assert_ne!(QWeatherError::Connect.code(), QWeatherError::Timeout.code());
    }

    #[test]
    fn missing_credential_carries_hint() {
        let err = QWeatherError::MissingCredential;
        assert!(err.to_string().contains("QWEATHER_API_KEY"));
        assert!(err.hint().unwrap().contains("export QWEATHER_API_KEY"));
    }

    #[test]
    fn http_status_code_is_numeric_status() {
        let err = QWeatherError::HttpStatus { status: 503, body: String::new() };
        assert_eq!(err.code(), "503");
        assert_eq!(err.to_string(), "HTTP request failed (503)");
    }
}
