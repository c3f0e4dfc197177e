//! Typed wrapper over the chain service endpoints.

use std::sync::Arc;

use log::debug;
use serde_json::{json, Value};

use crate::consts;
use crate::errors::{Error, Service};
use crate::prelude::Result;
use crate::req::{call_idempotent, Transport};
use crate::types::{BlockId, ChainInfo, PackedTransaction, PublicKey, Transaction};

#[derive(Debug, Clone)]
pub struct ChainClient<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> ChainClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    async fn call(&self, path: &str, body: Value) -> Result<Value> {
        self.transport.call(Service::Chain, path, body).await
    }

    /// Fresh chain state. Read-only and safe to retry on transport failure.
    pub async fn get_info(&self) -> Result<ChainInfo> {
        let value =
            call_idempotent(&*self.transport, Service::Chain, consts::GET_INFO, json!({})).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Full block by number or id, as returned by the service.
    pub async fn get_block(&self, block_num_or_id: &str) -> Result<Value> {
        call_idempotent(
            &*self.transport,
            Service::Chain,
            consts::GET_BLOCK,
            json!({ "block_num_or_id": block_num_or_id }),
        )
        .await
    }

    /// Resolve a block number or id to the block's canonical id.
    ///
    /// An unknown or malformed reference is a user-visible validation error
    /// naming the offending value; transport failures pass through
    /// untouched so the connection hint stays accurate.
    pub async fn get_block_id(&self, block_num_or_id: &str) -> Result<BlockId> {
        let invalid = || {
            Error::Validation(format!(
                "invalid reference block num or id: {block_num_or_id}"
            ))
        };
        let block = match self.get_block(block_num_or_id).await {
            Ok(block) => block,
            Err(err @ Error::Connection { .. }) => return Err(err),
            Err(other) => {
                debug!("reference block lookup failed: {other}");
                return Err(invalid());
            }
        };
        block
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(invalid)
            .and_then(BlockId::new)
            .map_err(|_| invalid())
    }

    /// Minimal subset of `available_keys` that satisfies every action's
    /// permission, as evaluated by the chain. Must be requested only after
    /// the transaction is bound: the answer is tied to chain state.
    pub async fn get_required_keys(
        &self,
        transaction: &Transaction,
        available_keys: &[PublicKey],
    ) -> Result<Vec<PublicKey>> {
        let value = self
            .call(
                consts::GET_REQUIRED_KEYS,
                json!({
                    "transaction": transaction,
                    "available_keys": available_keys,
                }),
            )
            .await?;
        let keys = value
            .get("required_keys")
            .cloned()
            .unwrap_or(Value::Array(vec![]));
        Ok(serde_json::from_value(keys)?)
    }

    /// Submit one packed transaction. Never retried.
    pub async fn push_transaction(&self, packed: &PackedTransaction) -> Result<Value> {
        self.call(consts::PUSH_TRANSACTION, serde_json::to_value(packed)?)
            .await
    }

    /// Submit a batch of packed transactions. Never retried.
    pub async fn push_transactions(&self, packed: &[PackedTransaction]) -> Result<Value> {
        self.call(consts::PUSH_TRANSACTIONS, serde_json::to_value(packed)?)
            .await
    }

    pub async fn get_domain(&self, name: &str) -> Result<Value> {
        self.call(consts::GET_DOMAIN, json!({ "name": name })).await
    }

    pub async fn get_token(&self, domain: &str, name: &str) -> Result<Value> {
        self.call(consts::GET_TOKEN, json!({ "domain": domain, "name": name }))
            .await
    }

    pub async fn get_group(&self, id: &str) -> Result<Value> {
        self.call(consts::GET_GROUP, json!({ "id": id })).await
    }

    pub async fn get_account(&self, name: &str) -> Result<Value> {
        self.call(consts::GET_ACCOUNT, json!({ "name": name }))
            .await
    }

    pub async fn get_transaction(&self, id: &str) -> Result<Value> {
        self.call(consts::GET_TRANSACTION, json!({ "transaction_id": id }))
            .await
    }

    /// Transactions referencing an account, newest first. `skip` and `num`
    /// page through the history when given.
    pub async fn get_transactions(
        &self,
        account_name: &str,
        skip: Option<u32>,
        num: Option<u32>,
    ) -> Result<Value> {
        let mut body = json!({ "account_name": account_name });
        if let Some(skip) = skip {
            body["skip_seq"] = json!(skip);
            if let Some(num) = num {
                body["num_seq"] = json!(num);
            }
        }
        self.call(consts::GET_TRANSACTIONS, body).await
    }

    pub async fn net_connect(&self, host: &str) -> Result<Value> {
        self.call(consts::NET_CONNECT, json!(host)).await
    }

    pub async fn net_disconnect(&self, host: &str) -> Result<Value> {
        self.call(consts::NET_DISCONNECT, json!(host)).await
    }

    pub async fn net_status(&self, host: &str) -> Result<Value> {
        self.call(consts::NET_STATUS, json!(host)).await
    }

    pub async fn net_peers(&self) -> Result<Value> {
        self.call(consts::NET_CONNECTIONS, json!(null)).await
    }
}
