//! Typed payloads for the chain's native actions.
//!
//! Each payload serializes to the structured-value form the chain expects
//! and is wrapped into an [`Action`](super::Action) by the CLI layer before
//! entering the pipeline.

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::prelude::Result;
use crate::types::PublicKey;

/// Reserved group name an authorizer can reference instead of a key.
pub const OWNER_GROUP: &str = "owner";

/// Validate a domain/token/account/group name.
///
/// Names are short identifiers; the chain enforces its own canonical rules,
/// this check only rejects input that could never be valid so bad names
/// fail before any remote call.
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name.len() <= 21
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if ok {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid {kind} name: {name:?}")))
    }
}

/// What an authorizer slot points at: a single key or a named group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AuthorizerRef {
    Account(PublicKey),
    Group(String),
}

/// One weighted authorizer inside a permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizerWeight {
    #[serde(rename = "ref")]
    pub authorizer: AuthorizerRef,
    pub weight: u32,
}

/// A weighted-threshold permission attached to a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    pub threshold: u32,
    pub authorizers: Vec<AuthorizerWeight>,
}

impl Permission {
    /// The permission used when a command does not spell one out: threshold
    /// one, a single authorizer. With no key the slot references the owner
    /// group instead.
    pub fn single(name: impl Into<String>, key: Option<PublicKey>) -> Self {
        let authorizer = match key {
            Some(key) => AuthorizerRef::Account(key),
            None => AuthorizerRef::Group(OWNER_GROUP.to_string()),
        };
        Self {
            name: name.into(),
            threshold: 1,
            authorizers: vec![AuthorizerWeight {
                authorizer,
                weight: 1,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDomain {
    pub name: String,
    pub issuer: PublicKey,
    pub issue: Permission,
    pub transfer: Permission,
    pub manage: Permission,
}

/// Domain update; absent permissions are left untouched on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDomain {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<Permission>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer: Option<Permission>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage: Option<Permission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueToken {
    pub domain: String,
    pub names: Vec<String>,
    pub owner: Vec<PublicKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferToken {
    pub domain: String,
    pub name: String,
    pub to: Vec<PublicKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub owner: Vec<PublicKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOwner {
    pub name: String,
    pub owner: Vec<PublicKey>,
}

/// Move native funds between named accounts. The amount keeps the chain's
/// decimal text form (e.g. `"12.00000 QUL"`); the chain parses and checks
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFunds {
    pub from: String,
    pub to: String,
    pub amount: String,
}

/// Create a permission group from its structured definition.
///
/// Group definitions are deep weighted trees evaluated entirely by the
/// chain, so the client passes them through as a structured value and only
/// checks the pieces it needs: the definition must be an object carrying
/// the group key the chain derives the canonical group id from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGroup {
    pub group: serde_json::Value,
}

impl NewGroup {
    pub fn from_value(group: serde_json::Value) -> Result<Self> {
        group
            .as_object()
            .and_then(|obj| obj.get("key"))
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                Error::Validation("group definition must be an object with a \"key\"".to_string())
            })?;
        Ok(Self { group })
    }

    /// The group key, used as the action key until the chain assigns an id.
    pub fn key(&self) -> &str {
        // Presence was validated in from_value.
        self.group
            .get("key")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateGroup {
    pub id: String,
    pub group: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> PublicKey {
        PublicKey::new("QLL6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV").unwrap()
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("domain", "cookies").is_ok());
        assert!(validate_name("domain", "a.b-c_9").is_ok());
        assert!(validate_name("domain", "").is_err());
        assert!(validate_name("domain", "white space").is_err());
        assert!(validate_name("domain", &"x".repeat(22)).is_err());
    }

    #[test]
    fn default_permission_with_key_references_the_account() {
        let p = Permission::single("issue", Some(key()));
        assert_eq!(p.threshold, 1);
        assert_eq!(p.authorizers.len(), 1);
        assert_eq!(p.authorizers[0].weight, 1);
        assert!(matches!(
            p.authorizers[0].authorizer,
            AuthorizerRef::Account(_)
        ));
    }

    #[test]
    fn default_permission_without_key_references_owner_group() {
        let p = Permission::single("transfer", None);
        assert_eq!(
            p.authorizers[0].authorizer,
            AuthorizerRef::Group(OWNER_GROUP.to_string())
        );
    }

    #[test]
    fn new_group_requires_a_key() {
        let good = serde_json::json!({"key": "QLL6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV", "root": {}});
        let group = NewGroup::from_value(good).unwrap();
        assert!(group.key().starts_with("QLL"));

        assert!(NewGroup::from_value(serde_json::json!({"root": {}})).is_err());
        assert!(NewGroup::from_value(serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn update_domain_omits_untouched_permissions() {
        let ud = UpdateDomain {
            name: "cookies".to_string(),
            issue: Some(Permission::single("issue", Some(key()))),
            transfer: None,
            manage: None,
        };
        let value = serde_json::to_value(&ud).unwrap();
        assert!(value.get("issue").is_some());
        assert!(value.get("transfer").is_none());
        assert!(value.get("manage").is_none());
    }
}
