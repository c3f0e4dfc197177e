/// Default URL of the chain daemon (`quilld`).
pub const DEFAULT_CHAIN_URL: &str = "http://127.0.0.1:8888";
/// Default URL of the wallet daemon (`quillwd`).
pub const DEFAULT_WALLET_URL: &str = "http://127.0.0.1:9999";

/// Default window between binding and expiration of a transaction.
pub const DEFAULT_EXPIRATION_SECS: u64 = 30;

/// Per-request deadline applied to every remote call.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Extra attempts for idempotent chain reads after a transport failure.
/// Mutating calls and wallet calls are never retried.
pub const IDEMPOTENT_RETRIES: u32 = 2;
pub const RETRY_BASE_DELAY_MS: u64 = 200;
pub const RETRY_JITTER_MS: u64 = 100;

// Chain service endpoints.
pub const GET_INFO: &str = "/v1/chain/get_info";
pub const GET_BLOCK: &str = "/v1/chain/get_block";
pub const GET_REQUIRED_KEYS: &str = "/v1/chain/get_required_keys";
pub const PUSH_TRANSACTION: &str = "/v1/chain/push_transaction";
pub const PUSH_TRANSACTIONS: &str = "/v1/chain/push_transactions";

// Chain read surface.
pub const GET_DOMAIN: &str = "/v1/quill/get_domain";
pub const GET_TOKEN: &str = "/v1/quill/get_token";
pub const GET_GROUP: &str = "/v1/quill/get_group";
pub const GET_ACCOUNT: &str = "/v1/quill/get_account";
pub const GET_TRANSACTION: &str = "/v1/history/get_transaction";
pub const GET_TRANSACTIONS: &str = "/v1/history/get_transactions";

// Net plugin endpoints.
pub const NET_CONNECT: &str = "/v1/net/connect";
pub const NET_DISCONNECT: &str = "/v1/net/disconnect";
pub const NET_STATUS: &str = "/v1/net/status";
pub const NET_CONNECTIONS: &str = "/v1/net/connections";

// Wallet service endpoints.
pub const WALLET_CREATE: &str = "/v1/wallet/create";
pub const WALLET_OPEN: &str = "/v1/wallet/open";
pub const WALLET_LOCK: &str = "/v1/wallet/lock";
pub const WALLET_LOCK_ALL: &str = "/v1/wallet/lock_all";
pub const WALLET_UNLOCK: &str = "/v1/wallet/unlock";
pub const WALLET_IMPORT_KEY: &str = "/v1/wallet/import_key";
pub const WALLET_LIST: &str = "/v1/wallet/list_wallets";
pub const WALLET_PUBLIC_KEYS: &str = "/v1/wallet/get_public_keys";
pub const WALLET_SIGN_TRX: &str = "/v1/wallet/sign_transaction";

/// Prefix carried by every public key rendered in text form.
pub const PUBLIC_KEY_PREFIX: &str = "QLL";
