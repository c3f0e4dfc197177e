mod actions;

pub use actions::*;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::PUBLIC_KEY_PREFIX;
use crate::errors::Error;
use crate::prelude::Result;

/// A 32-byte block identifier in lowercase hex.
///
/// The chain embeds the block number in the first four (big-endian) bytes of
/// the id, which is what makes the TAPOS encoding in
/// [`Transaction::set_reference_block`] possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockId(String);

impl BlockId {
    pub fn new(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|_| Error::Validation(format!("block id is not hex: {s}")))?;
        if bytes.len() != 32 {
            return Err(Error::Validation(format!(
                "block id must be 32 bytes, got {}: {s}",
                bytes.len()
            )));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        // Length was validated at construction.
        if let Ok(bytes) = hex::decode(&self.0) {
            if bytes.len() == 32 {
                out.copy_from_slice(&bytes);
            }
        }
        out
    }

    /// Block height embedded in the id.
    pub fn block_num(&self) -> u32 {
        let b = self.bytes();
        u32::from_be_bytes([b[0], b[1], b[2], b[3]])
    }

    /// 32-bit hash suffix used as the TAPOS prefix check.
    pub fn ref_block_prefix(&self) -> u32 {
        let b = self.bytes();
        u32::from_le_bytes([b[8], b[9], b[10], b[11]])
    }
}

impl TryFrom<String> for BlockId {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> {
        Self::new(&s)
    }
}

impl From<BlockId> for String {
    fn from(id: BlockId) -> Self {
        id.0
    }
}

impl FromStr for BlockId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A public key in the chain's text form: the `QLL` prefix followed by a
/// base58 body. Only the shape is validated locally; all cryptography lives
/// in the wallet and chain services.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey(String);

impl PublicKey {
    pub fn new(s: &str) -> Result<Self> {
        let body = s.strip_prefix(PUBLIC_KEY_PREFIX).ok_or_else(|| {
            Error::Validation(format!("public key must start with {PUBLIC_KEY_PREFIX}: {s}"))
        })?;
        if body.len() < 30 || body.len() > 60 {
            return Err(Error::Validation(format!("public key has bad length: {s}")));
        }
        let base58 = body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l'));
        if !base58 {
            return Err(Error::Validation(format!(
                "public key contains non-base58 characters: {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PublicKey {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> {
        Self::new(&s)
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.0
    }
}

impl FromStr for PublicKey {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of chain state, fetched fresh immediately before every
/// transaction is bound. Never cached across invocations: the smaller the
/// staleness window, the longer the expiration and TAPOS reference stay
/// valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub chain_id: String,
    pub head_block_num: u32,
    pub head_block_time: DateTime<Utc>,
    pub head_block_id: BlockId,
    pub last_irreversible_block_num: u32,
    pub last_irreversible_block_id: BlockId,
}

/// One typed intent against a logical resource.
///
/// `domain` and `key` identify what the action affects (a domain name and a
/// token name, say), not where it is sent. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub domain: String,
    pub key: String,
    pub data: Value,
}

impl Action {
    pub fn new<T: Serialize>(
        domain: impl Into<String>,
        key: impl Into<String>,
        payload: &T,
    ) -> Result<Self> {
        Ok(Self {
            domain: domain.into(),
            key: key.into(),
            data: serde_json::to_value(payload)?,
        })
    }
}

/// A transaction in its draft or bound state.
///
/// Created from a list of actions with placeholder expiration and reference
/// fields; [`crate::TxPipeline`] binds those exactly once and never mutates
/// them again afterwards, since any mutation after signing would invalidate
/// the signatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub expiration: DateTime<Utc>,
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub actions: Vec<Action>,
}

impl Transaction {
    pub fn from_actions(actions: Vec<Action>) -> Self {
        Self {
            expiration: DateTime::<Utc>::UNIX_EPOCH,
            ref_block_num: 0,
            ref_block_prefix: 0,
            actions,
        }
    }

    /// Bind this transaction to a reference block (TAPOS).
    ///
    /// The low 16 bits of the block height plus a 32-bit slice of the block
    /// hash scope replay protection to a recent block window without
    /// requiring the full id in the transaction.
    pub fn set_reference_block(&mut self, id: &BlockId) {
        self.ref_block_num = (id.block_num() & 0xffff) as u16;
        self.ref_block_prefix = id.ref_block_prefix();
    }

    /// Whether this transaction's TAPOS fields match the given block.
    pub fn verify_reference_block(&self, id: &BlockId) -> bool {
        self.ref_block_num == (id.block_num() & 0xffff) as u16
            && self.ref_block_prefix == id.ref_block_prefix()
    }
}

/// A bound transaction plus the signatures the wallet attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    #[serde(default)]
    pub signatures: Vec<String>,
}

impl SignedTransaction {
    /// Wrap a bound transaction without signatures (skip-sign path).
    pub fn unsigned(transaction: Transaction) -> Self {
        Self {
            transaction,
            signatures: Vec::new(),
        }
    }
}

/// Compression applied to the packed transaction body. Orthogonal to
/// signing; chosen per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    #[default]
    None,
    Zstd,
}

impl FromStr for Compression {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Compression::None),
            "zstd" => Ok(Compression::Zstd),
            other => Err(Error::Validation(format!(
                "unknown compression mode: {other} (expected none or zstd)"
            ))),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::None => f.write_str("none"),
            Compression::Zstd => f.write_str("zstd"),
        }
    }
}

/// Wire form of a transaction for submission: the canonical msgpack bytes
/// of the bound transaction (optionally compressed, always hex-rendered)
/// with the signatures alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedTransaction {
    pub signatures: Vec<String>,
    pub compression: Compression,
    pub packed_trx: String,
}

impl PackedTransaction {
    pub fn pack(trx: &SignedTransaction, compression: Compression) -> Result<Self> {
        let raw = rmp_serde::to_vec_named(&trx.transaction)?;
        let bytes = match compression {
            Compression::None => raw,
            Compression::Zstd => zstd::encode_all(raw.as_slice(), 3)?,
        };
        Ok(Self {
            signatures: trx.signatures.clone(),
            compression,
            packed_trx: hex::encode(bytes),
        })
    }

    pub fn unpack(&self) -> Result<SignedTransaction> {
        let bytes = hex::decode(&self.packed_trx)
            .map_err(|_| Error::Validation("packed transaction is not hex".to_string()))?;
        let raw = match self.compression {
            Compression::None => bytes,
            Compression::Zstd => zstd::decode_all(bytes.as_slice())?,
        };
        let transaction: Transaction = rmp_serde::from_slice(&raw)?;
        Ok(SignedTransaction {
            transaction,
            signatures: self.signatures.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block_id(num: u32, fill: u8) -> BlockId {
        let mut bytes = [fill; 32];
        bytes[..4].copy_from_slice(&num.to_be_bytes());
        BlockId::new(&hex::encode(bytes)).unwrap()
    }

    #[test]
    fn block_id_rejects_bad_input() {
        assert!(BlockId::new("zzzz").is_err());
        assert!(BlockId::new("abcd").is_err()); // too short
        assert!(BlockId::new(&"ab".repeat(32)).is_ok());
    }

    #[test]
    fn block_id_embeds_height() {
        let id = block_id(0x0102_0304, 0xaa);
        assert_eq!(id.block_num(), 0x0102_0304);
        assert_eq!(id.ref_block_prefix(), u32::from_le_bytes([0xaa; 4]));
    }

    #[test]
    fn tapos_round_trips_and_rejects_forks() {
        let id = block_id(100, 0x11);
        let mut trx = Transaction::from_actions(vec![]);
        trx.set_reference_block(&id);

        assert_eq!(trx.ref_block_num, 100);
        assert!(trx.verify_reference_block(&id));

        // Same height, different hash: a fork's block must not verify.
        let fork = block_id(100, 0x22);
        assert!(!trx.verify_reference_block(&fork));
    }

    #[test]
    fn set_reference_block_truncates_height() {
        let id = block_id(0x0001_0005, 0x33);
        let mut trx = Transaction::from_actions(vec![]);
        trx.set_reference_block(&id);
        assert_eq!(trx.ref_block_num, 0x0005);
    }

    #[test]
    fn chain_info_deserializes_the_full_snapshot() {
        let head_id = block_id(104, 0x99);
        let lib_id = block_id(100, 0x11);
        let info: ChainInfo = serde_json::from_value(json!({
            "chain_id": "3c8d0e4bb2cf4b12a0e54c4b2f6cf256dbd4b56f00f483a9e36a08a5b6d7a111",
            "head_block_num": 104,
            "head_block_time": "2026-08-26T10:00:00Z",
            "head_block_id": head_id.as_str(),
            "last_irreversible_block_num": 100,
            "last_irreversible_block_id": lib_id.as_str(),
        }))
        .unwrap();
        assert_eq!(info.head_block_id, head_id);
        assert_eq!(info.last_irreversible_block_num, 100);
        assert_eq!(info.last_irreversible_block_id, lib_id);
    }

    #[test]
    fn public_key_validation() {
        assert!(PublicKey::new("QLL6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV").is_ok());
        assert!(PublicKey::new("EVT6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV").is_err());
        assert!(PublicKey::new("QLL0000").is_err());
    }

    #[test]
    fn packed_transaction_round_trip() {
        let action = Action::new("domain", "cookies", &json!({"name": "cookies"})).unwrap();
        let mut trx = Transaction::from_actions(vec![action]);
        trx.set_reference_block(&block_id(7, 0x44));
        let signed = SignedTransaction {
            transaction: trx,
            signatures: vec!["SIG_K1_example".to_string()],
        };

        for compression in [Compression::None, Compression::Zstd] {
            let packed = PackedTransaction::pack(&signed, compression).unwrap();
            let unpacked = packed.unpack().unwrap();
            assert_eq!(unpacked, signed, "mode {compression}");
        }
    }

    #[test]
    fn signed_transaction_json_is_flat() {
        let signed = SignedTransaction::unsigned(Transaction::from_actions(vec![]));
        let value = serde_json::to_value(&signed).unwrap();
        assert!(value.get("expiration").is_some());
        assert!(value.get("signatures").is_some());
        assert!(value.get("transaction").is_none());
    }
}
