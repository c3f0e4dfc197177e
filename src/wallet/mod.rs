//! Typed wrapper over the wallet service endpoints.
//!
//! Private keys never leave the wallet daemon: the client only lists public
//! keys and hands over transactions to be signed inside the wallet's trust
//! boundary.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::consts;
use crate::errors::Service;
use crate::prelude::Result;
use crate::req::Transport;
use crate::types::{PublicKey, SignedTransaction, Transaction};

#[derive(Debug, Clone)]
pub struct WalletClient<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> WalletClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    async fn call(&self, path: &str, body: Value) -> Result<Value> {
        self.transport.call(Service::Wallet, path, body).await
    }

    /// Public keys of all currently unlocked wallets.
    pub async fn public_keys(&self) -> Result<Vec<PublicKey>> {
        let value = self.call(consts::WALLET_PUBLIC_KEYS, json!(null)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Ask the wallet to sign the transaction's canonical encoding with each
    /// of `required_keys`. The chain id scopes every signature to one chain
    /// so it can never be replayed on another.
    pub async fn sign_transaction(
        &self,
        transaction: &Transaction,
        required_keys: &[PublicKey],
        chain_id: &str,
    ) -> Result<SignedTransaction> {
        let value = self
            .call(
                consts::WALLET_SIGN_TRX,
                json!([transaction, required_keys, chain_id]),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Create a named wallet; the response carries the generated password.
    pub async fn create(&self, name: &str) -> Result<Value> {
        self.call(consts::WALLET_CREATE, json!(name)).await
    }

    pub async fn open(&self, name: &str) -> Result<Value> {
        self.call(consts::WALLET_OPEN, json!(name)).await
    }

    pub async fn lock(&self, name: &str) -> Result<Value> {
        self.call(consts::WALLET_LOCK, json!(name)).await
    }

    pub async fn lock_all(&self) -> Result<Value> {
        self.call(consts::WALLET_LOCK_ALL, json!(null)).await
    }

    pub async fn unlock(&self, name: &str, password: &str) -> Result<Value> {
        self.call(consts::WALLET_UNLOCK, json!([name, password]))
            .await
    }

    /// Import a private key (WIF text form) into a wallet. The key text is
    /// forwarded as-is; it is never parsed or logged here.
    pub async fn import_key(&self, name: &str, wif_key: &str) -> Result<Value> {
        self.call(consts::WALLET_IMPORT_KEY, json!([name, wif_key]))
            .await
    }

    /// List known wallets; unlocked ones are marked by the service.
    pub async fn list_wallets(&self) -> Result<Value> {
        self.call(consts::WALLET_LIST, json!(null)).await
    }
}
