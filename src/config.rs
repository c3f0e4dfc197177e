use std::time::Duration;

use crate::consts::{
    DEFAULT_CHAIN_URL, DEFAULT_EXPIRATION_SECS, DEFAULT_TIMEOUT_MS, DEFAULT_WALLET_URL,
};
use crate::types::Compression;

/// Connection settings for the two remote services.
///
/// Passed explicitly into [`crate::HttpClient::new`]; nothing in the crate
/// reads process-wide state, so several differently configured clients can
/// coexist in one process (and in one test).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub chain_url: String,
    pub wallet_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chain_url: DEFAULT_CHAIN_URL.to_string(),
            wallet_url: DEFAULT_WALLET_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `QUILL_CHAIN_URL` / `QUILL_WALLET_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("QUILL_CHAIN_URL") {
            config.chain_url = url;
        }
        if let Ok(url) = std::env::var("QUILL_WALLET_URL") {
            config.wallet_url = url;
        }
        config
    }

    pub fn with_chain_url(mut self, url: impl Into<String>) -> Self {
        self.chain_url = url.into();
        self
    }

    pub fn with_wallet_url(mut self, url: impl Into<String>) -> Self {
        self.wallet_url = url.into();
        self
    }
}

/// Per-invocation transaction options, the `-x/-s/-d/-r/-c` surface of the
/// CLI. One value is built per command invocation and moved into the
/// pipeline; no option is shared across invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOptions {
    /// Seconds between the chain head time at binding and expiration.
    pub expiration_secs: u64,
    /// Explicit TAPOS reference block (number or id); defaults to the last
    /// irreversible block when absent.
    pub ref_block: Option<String>,
    /// Skip key resolution and signing entirely.
    pub skip_sign: bool,
    /// Print the final transaction instead of submitting it.
    pub dont_broadcast: bool,
    /// Compression applied when packing for broadcast.
    pub compression: Compression,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self {
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            ref_block: None,
            skip_sign: false,
            dont_broadcast: false,
            compression: Compression::None,
        }
    }
}
