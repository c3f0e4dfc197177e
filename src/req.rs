use log::{debug, warn};
use rand::Rng;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::consts::{IDEMPOTENT_RETRIES, RETRY_BASE_DELAY_MS, RETRY_JITTER_MS};
use crate::errors::{Error, Service};
use crate::prelude::Result;

/// RPC boundary shared by the chain and wallet services.
///
/// One named call against one of the two endpoints, carrying a JSON payload
/// and returning the response value or a classified error. Implemented by
/// [`HttpClient`] for real use and by recording stubs in tests.
pub trait Transport {
    fn call(
        &self,
        service: Service,
        path: &str,
        body: Value,
    ) -> impl std::future::Future<Output = Result<Value>> + Send;
}

/// HTTP transport over reqwest, POSTing JSON to `base_url + path`.
///
/// A single per-request deadline from [`ClientConfig::timeout`] applies to
/// every call. No retries happen at this layer; [`call_idempotent`] adds a
/// bounded retry for reads that tolerate it.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    chain_url: String,
    wallet_url: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::GenericRequest)?;
        Ok(Self {
            client,
            chain_url: config.chain_url.trim_end_matches('/').to_string(),
            wallet_url: config.wallet_url.trim_end_matches('/').to_string(),
        })
    }

    fn base_url(&self, service: Service) -> &str {
        match service {
            Service::Chain => &self.chain_url,
            Service::Wallet => &self.wallet_url,
        }
    }
}

impl Transport for HttpClient {
    async fn call(&self, service: Service, path: &str, body: Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url(service), path);
        debug!("POST {url}");

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(source) if source.is_connect() || source.is_timeout() => {
                return Err(Error::Connection {
                    service,
                    url,
                    source,
                })
            }
            Err(source) => return Err(Error::GenericRequest(source)),
        };

        let status = response.status();
        let text = response.text().await.map_err(Error::GenericRequest)?;

        if status.is_success() {
            if text.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(Error::Json);
        }
        Err(classify_application_error(service, status.as_u16(), &text))
    }
}

/// Turn a non-2xx response body into an [`Error::Application`].
///
/// Services answer errors as `{"error": {"code", "what", "details"}}`; a
/// body that does not follow that shape is surfaced raw.
pub(crate) fn classify_application_error(service: Service, status: u16, body: &str) -> Error {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let error = value.get("error").unwrap_or(&value);
        let message = error
            .get("what")
            .or_else(|| error.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("http status {status}"));
        let code = error.get("code").and_then(Value::as_i64);
        return Error::Application {
            service,
            message,
            code,
            details: Some(error.clone()),
        };
    }
    Error::Application {
        service,
        message: if body.is_empty() {
            format!("http status {status}")
        } else {
            body.to_string()
        },
        code: None,
        details: None,
    }
}

/// Bounded retry for idempotent chain reads (get-info, get-block).
///
/// Retries only transport failures; an application error means the service
/// answered and is returned as-is.
pub(crate) async fn call_idempotent<T: Transport>(
    transport: &T,
    service: Service,
    path: &str,
    body: Value,
) -> Result<Value> {
    let mut attempt = 0;
    loop {
        match transport.call(service, path, body.clone()).await {
            Err(err @ Error::Connection { .. }) if attempt < IDEMPOTENT_RETRIES => {
                attempt += 1;
                let jitter = rand::thread_rng().gen_range(0..=RETRY_JITTER_MS);
                let delay = RETRY_BASE_DELAY_MS * u64::from(attempt) + jitter;
                warn!("{path} attempt {attempt} failed ({err}), retrying in {delay}ms");
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_error_body_is_classified() {
        let body = json!({
            "error": {
                "code": 3_010_004,
                "what": "unknown reference block",
                "details": {"block_num_or_id": "999999"}
            }
        })
        .to_string();
        match classify_application_error(Service::Chain, 500, &body) {
            Error::Application {
                service,
                message,
                code,
                details,
            } => {
                assert_eq!(service, Service::Chain);
                assert_eq!(message, "unknown reference block");
                assert_eq!(code, Some(3_010_004));
                assert!(details.is_some());
            }
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn plain_text_error_body_is_kept_verbatim() {
        match classify_application_error(Service::Wallet, 401, "wallet is locked") {
            Error::Application { message, code, .. } => {
                assert_eq!(message, "wallet is locked");
                assert_eq!(code, None);
            }
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn empty_error_body_reports_http_status() {
        match classify_application_error(Service::Chain, 503, "") {
            Error::Application { message, .. } => assert_eq!(message, "http status 503"),
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn base_urls_are_normalized() {
        let config = ClientConfig::default().with_chain_url("http://10.0.0.1:8888/");
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.base_url(Service::Chain), "http://10.0.0.1:8888");
        assert_eq!(client.base_url(Service::Wallet), "http://127.0.0.1:9999");
    }
}
