use std::fmt;

use serde_json::Value;

/// Which of the two remote services a call was addressed to.
///
/// Carried by transport-level failures so the caller can render a targeted
/// "is it running?" hint, and by application errors so the origin of a
/// structured error value stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Chain,
    Wallet,
}

impl Service {
    /// Conventional name of the daemon serving this endpoint.
    pub fn daemon(&self) -> &'static str {
        match self {
            Service::Chain => "quilld",
            Service::Wallet => "quillwd",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Chain => write!(f, "chain"),
            Service::Wallet => write!(f, "wallet"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Transport-level failure: the service could not be reached at all.
    /// Never retried here; retry policy for idempotent reads lives in `req`.
    #[error("failed to connect to {} at {}; is {} running?", .service, .url, .service.daemon())]
    Connection {
        service: Service,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The transport exchange succeeded but the service answered with a
    /// structured error value (authorization failure, unknown block, ...).
    #[error("{service} error: {message}")]
    Application {
        service: Service,
        message: String,
        code: Option<i64>,
        details: Option<Value>,
    },

    /// Malformed user input caught before any remote call was made.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("transaction encode error: {0}")]
    PackEncode(#[from] rmp_serde::encode::Error),

    #[error("transaction decode error: {0}")]
    PackDecode(#[from] rmp_serde::decode::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request error: {0}")]
    GenericRequest(reqwest::Error),
}

impl Error {
    /// Full diagnostic form, used by the CLI under `--verbose`.
    pub fn detail(&self) -> String {
        match self {
            Error::Connection {
                service,
                url,
                source,
            } => format!("connection to {service} service at {url} failed: {source:?}"),
            Error::Application {
                service,
                message,
                code,
                details,
            } => {
                let mut out = format!("{service} service returned an error: {message}");
                if let Some(code) = code {
                    out.push_str(&format!(" (code {code})"));
                }
                if let Some(details) = details {
                    out.push_str(&format!(
                        "\n{}",
                        serde_json::to_string_pretty(details)
                            .unwrap_or_else(|_| details.to_string())
                    ));
                }
                out
            }
            other => other.to_string(),
        }
    }

    /// True for errors caused by the local invocation rather than a service.
    pub fn is_local(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Json(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // reqwest errors cannot be constructed directly; a malformed URL passed
    // to a request builder yields one without touching the network.
    fn reqwest_error() -> reqwest::Error {
        reqwest::Client::new()
            .get("http://[malformed")
            .build()
            .unwrap_err()
    }

    #[test]
    fn connection_error_names_the_daemon() {
        let err = Error::Connection {
            service: Service::Wallet,
            url: "http://127.0.0.1:9999".to_string(),
            source: reqwest_error(),
        };
        let msg = err.to_string();
        assert!(msg.contains("quillwd"), "message was: {msg}");
        assert!(msg.contains("wallet"));
    }

    #[test]
    fn application_error_detail_includes_code_and_payload() {
        let err = Error::Application {
            service: Service::Chain,
            message: "unknown block".to_string(),
            code: Some(3_100_002),
            details: Some(serde_json::json!({"block_num_or_id": "deadbeef"})),
        };
        assert_eq!(err.to_string(), "chain error: unknown block");
        let detail = err.detail();
        assert!(detail.contains("3100002"));
        assert!(detail.contains("deadbeef"));
    }

    #[test]
    fn validation_errors_are_local() {
        assert!(Error::Validation("bad name".into()).is_local());
    }
}
