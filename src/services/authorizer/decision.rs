//! API-gateway style authorization decision.
//!
//! Every decision authorizes exactly one action on one resource; there is no
//! per-route or per-principal differentiation. ALLOW is all-or-nothing.

use serde::{Deserialize, Serialize};

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";
pub const ANY_RESOURCE: &str = "*";
/// Principal reported on DENY; never derived from the rejected token.
pub const DENIED_PRINCIPAL: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
}

impl Decision {
    pub fn allow(principal_id: impl Into<String>) -> Self {
        Self::new(principal_id.into(), Effect::Allow)
    }

    pub fn deny() -> Self {
        Self::new(DENIED_PRINCIPAL.to_string(), Effect::Deny)
    }

    fn new(principal_id: String, effect: Effect) -> Self {
        Self {
            principal_id,
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![Statement {
                    action: INVOKE_ACTION.to_string(),
                    effect,
                    resource: ANY_RESOURCE.to_string(),
                }],
            },
        }
    }

    pub fn effect(&self) -> Effect {
        // Always exactly one statement
        self.policy_document
            .statement
            .first()
            .map(|s| s.effect)
            .unwrap_or(Effect::Deny)
    }

    pub fn is_allowed(&self) -> bool {
        self.effect() == Effect::Allow
    }
}
