use qweather_core::QWeatherError;
use serde_json::{Value, json};

/// `{"error": ..., "code": ...}` document for a failed invocation.
pub fn error_document(err: &anyhow::Error) -> Value {
    match err.downcast_ref::<QWeatherError>() {
        Some(e) => json!({ "error": e.to_string(), "code": e.code() }),
        None => json!({ "error": format!("{err:#}"), "code": "error" }),
    }
}

/// Write the error document, plus any remediation hint, to stderr.
pub fn print_error(err: &anyhow::Error) {
    let doc = error_document(err);
    let rendered = serde_json::to_string_pretty(&doc).unwrap_or_else(|_| doc.to_string());
    eprintln!("{rendered}");

    if let Some(hint) = err.downcast_ref::<QWeatherError>().and_then(QWeatherError::hint) {
        eprintln!("{hint}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn provider_error_document_uses_table_message() {
        let err = anyhow::Error::new(QWeatherError::provider("429"));
        assert_eq!(
            error_document(&err),
            json!({"error": "Request rate limit exceeded", "code": "429"})
        );
    }

    #[test]
    fn missing_credential_document() {
        let err = anyhow::Error::new(QWeatherError::MissingCredential);
        let doc = error_document(&err);
        assert_eq!(doc["code"], "missing_credential");
        assert_eq!(doc["error"], "QWEATHER_API_KEY environment variable is not set");
    }

    #[test]
    fn other_errors_keep_context_chain() {
        let err = anyhow!("disk full").context("Failed to write config file: /tmp/x");
        let doc = error_document(&err);
        assert_eq!(doc["code"], "error");
        assert_eq!(doc["error"], "Failed to write config file: /tmp/x: disk full");
    }

    #[test]
    fn non_ascii_messages_stay_unescaped() {
        let doc = json!({"error": "当前无预警信息", "code": "x"});
        assert!(serde_json::to_string_pretty(&doc).unwrap().contains("当前无预警信息"));
    }
}
