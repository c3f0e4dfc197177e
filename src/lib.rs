//! Client library for the Quill token chain.
//!
//! The crate builds transactions out of typed actions, binds them to the
//! chain's current state (expiration + TAPOS reference block), resolves the
//! required signing keys, obtains signatures from a remote wallet daemon and
//! finally broadcasts or prints the packed transaction. See [`TxPipeline`]
//! for the full lifecycle and [`Transport`] for the RPC boundary shared by
//! the chain and wallet services.

pub mod chain;
pub mod config;
pub mod consts;
pub mod errors;
pub mod json;
pub mod pipeline;
pub mod prelude;
pub mod req;
pub mod types;
pub mod wallet;

pub use chain::ChainClient;
pub use config::{ClientConfig, TxOptions};
pub use errors::{Error, Service};
pub use pipeline::{Outcome, TxPipeline};
pub use req::{HttpClient, Transport};
pub use types::{
    Action, AuthorizerRef, AuthorizerWeight, BlockId, ChainInfo, Compression, IssueToken,
    NewAccount, NewDomain, NewGroup, PackedTransaction, Permission, PublicKey, SignedTransaction,
    Transaction, TransferFunds, TransferToken, UpdateDomain, UpdateGroup, UpdateOwner,
};
pub use wallet::WalletClient;
