//! Transaction lifecycle: bind, resolve keys, sign, dispatch.
//!
//! A transaction moves through fixed stages:
//!
//! ```text
//! Draft -> Bound -> { Signed | Unsigned-final } -> { Broadcast | Printed }
//! ```
//!
//! Correctness rests entirely on the ordering of the remote exchanges, not
//! on any synchronization: the chain snapshot is fetched immediately before
//! binding, keys are resolved only against the bound transaction, signing
//! happens only after key resolution, and nothing mutates the transaction
//! once signatures exist. Every invocation owns its transaction; nothing is
//! shared or reused across invocations.

use std::sync::Arc;

use chrono::Duration;
use log::debug;
use serde_json::Value;

use crate::chain::ChainClient;
use crate::config::TxOptions;
use crate::errors::Error;
use crate::prelude::Result;
use crate::req::Transport;
use crate::types::{Action, ChainInfo, PackedTransaction, SignedTransaction, Transaction};
use crate::wallet::WalletClient;

/// Terminal state of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The packed transaction was submitted; this is the chain's response
    /// (included block, processing receipts, or its rejection payload).
    Broadcast(Value),
    /// `dont_broadcast` was set: the final (possibly unsigned) transaction
    /// in structured form, never submitted.
    Printed(Value),
}

impl Outcome {
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Broadcast(value) | Outcome::Printed(value) => value,
        }
    }
}

/// One-shot transaction pipeline over a shared transport.
///
/// Both service clients borrow the same transport so a single stub can
/// observe the full call sequence in tests.
pub struct TxPipeline<T: Transport> {
    chain: ChainClient<T>,
    wallet: WalletClient<T>,
    opts: TxOptions,
}

impl<T: Transport> TxPipeline<T> {
    pub fn new(transport: Arc<T>, opts: TxOptions) -> Self {
        Self {
            chain: ChainClient::new(Arc::clone(&transport)),
            wallet: WalletClient::new(transport),
            opts,
        }
    }

    pub fn chain(&self) -> &ChainClient<T> {
        &self.chain
    }

    pub fn wallet(&self) -> &WalletClient<T> {
        &self.wallet
    }

    /// Build a draft from an action list and run it to a terminal state.
    pub async fn push_actions(&self, actions: Vec<Action>) -> Result<Outcome> {
        self.execute(Transaction::from_actions(actions)).await
    }

    /// Run a draft transaction to a terminal state.
    pub async fn execute(&self, mut trx: Transaction) -> Result<Outcome> {
        let info = self.chain.get_info().await?;
        self.bind(&mut trx, &info).await?;

        let signed = if self.opts.skip_sign {
            SignedTransaction::unsigned(trx)
        } else {
            self.sign(trx, &info).await?
        };

        if self.opts.dont_broadcast {
            debug!("broadcast disabled, emitting transaction");
            return Ok(Outcome::Printed(serde_json::to_value(&signed)?));
        }

        let packed = PackedTransaction::pack(&signed, self.opts.compression)?;
        Ok(Outcome::Broadcast(self.chain.push_transaction(&packed).await?))
    }

    /// Bind expiration and TAPOS reference to the given chain snapshot.
    ///
    /// The reference block is the caller's explicit number-or-id when given,
    /// otherwise the last irreversible block; either way it is resolved
    /// through the chain to the canonical block id first. An unresolvable
    /// reference aborts here, before any wallet contact.
    async fn bind(&self, trx: &mut Transaction, info: &ChainInfo) -> Result<()> {
        let out_of_range = || {
            Error::Validation(format!(
                "expiration offset out of range: {}s",
                self.opts.expiration_secs
            ))
        };
        let offset = i64::try_from(self.opts.expiration_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(out_of_range)?;
        trx.expiration = info
            .head_block_time
            .checked_add_signed(offset)
            .ok_or_else(out_of_range)?;

        let ref_block_arg = match &self.opts.ref_block {
            Some(arg) => arg.clone(),
            None => info.last_irreversible_block_num.to_string(),
        };
        let ref_block_id = self.chain.get_block_id(&ref_block_arg).await?;
        trx.set_reference_block(&ref_block_id);
        debug!(
            "bound transaction: expiration={}, ref_block_num={}, ref_block_prefix={}",
            trx.expiration, trx.ref_block_num, trx.ref_block_prefix
        );
        Ok(())
    }

    /// Resolve the required key set and obtain signatures from the wallet.
    ///
    /// The wallet is asked for its unlocked public keys first; only then is
    /// the chain asked which subset must sign. A wallet connection failure
    /// therefore surfaces before any required-keys call is made.
    async fn sign(&self, trx: Transaction, info: &ChainInfo) -> Result<SignedTransaction> {
        let available_keys = self.wallet.public_keys().await?;
        let required_keys = self.chain.get_required_keys(&trx, &available_keys).await?;
        debug!(
            "signing with {} of {} available keys",
            required_keys.len(),
            available_keys.len()
        );
        self.wallet
            .sign_transaction(&trx, &required_keys, &info.chain_id)
            .await
    }
}
