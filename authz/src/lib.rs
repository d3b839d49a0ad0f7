//! CEDAR-based authorization engine for the publishing board.
//!
//! The board's access rules live in a single [CEDAR](https://www.cedarpolicy.com/)
//! policy set (`policies/board.cedar`). Every lifecycle operation asks the
//! [`AuthzEngine`] for a [`Decision`] through the same call:
//!
//! ```text
//! decide(caller, capability, resource owner) -> Allow | Deny
//! ```
//!
//! # Decision Rules
//!
//! 1. `ViewBoard`: any of User, Editor, Admin.
//! 2. `CreateArticle`: Editor or Admin.
//! 3. `CreateComment`: any of User, Editor, Admin.
//! 4. `MutateArticle` / `MutateComment`: Admin, or the resource owner.
//!
//! A caller without a recognized role is denied everything, including on
//! resources it owns.
//!
//! # Purity
//!
//! The engine never touches the resource store. Owners are passed in by the
//! caller of [`AuthzEngine::decide`], so the rules are unit-testable with no
//! database or session at hand.

pub mod error;
pub mod types;

use cedar_policy::{
    Authorizer, Context, Decision as CedarDecision, Entities, EntityId, EntityTypeName, EntityUid,
    PolicySet, Request,
};
use error::{AuthzError, Result};
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::{debug, info, warn};

pub use types::{Caller, Capability, Decision, Role};

/// The board policy set, compiled into the binary.
pub const BOARD_POLICIES: &str = include_str!("../policies/board.cedar");

/// Entity id used for the synthetic resource a capability is checked against.
const TARGET_ID: &str = "target";

/// Entity id used for callers without an identity.
const ANONYMOUS_ID: &str = "anonymous";

/// The authorization engine for evaluating board policies.
///
/// Policies are parsed once on construction; the engine is cheap to share
/// behind an `Arc` across request handlers.
///
/// # Example
///
/// ```rust
/// use authz::{AuthzEngine, Caller, Capability, Role};
///
/// let engine = AuthzEngine::new().unwrap();
/// let editor = Caller::new("editor-1", [Role::Editor]);
///
/// assert!(engine.decide(&editor, Capability::CreateArticle, None).is_allowed());
/// assert!(!engine
///     .decide(&editor, Capability::MutateArticle, Some("someone-else"))
///     .is_allowed());
/// ```
pub struct AuthzEngine {
    authorizer: Authorizer,
    policies: PolicySet,
}

impl AuthzEngine {
    /// Creates an engine over the board policy set.
    pub fn new() -> Result<Self> {
        Self::from_policies(BOARD_POLICIES)
    }

    /// Creates an engine over an arbitrary Cedar policy source.
    pub fn from_policies(policy_src: &str) -> Result<Self> {
        let policies =
            PolicySet::from_str(policy_src).map_err(|e| AuthzError::PolicyParse(e.to_string()))?;

        Ok(Self {
            authorizer: Authorizer::new(),
            policies,
        })
    }

    /// Decides whether `caller` may exercise `capability`.
    ///
    /// `owner` is the user id stored on the targeted resource and is only
    /// consulted for ownership-aware capabilities. Evaluation errors fail
    /// closed.
    pub fn decide(&self, caller: &Caller, capability: Capability, owner: Option<&str>) -> Decision {
        let decision = match self.evaluate(caller, capability, owner) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    "AUTHZ: evaluation error for {:?} {}: {}",
                    caller.id, capability, e
                );
                Decision::Deny
            }
        };

        match decision {
            Decision::Allow => info!(
                "AUTHZ: ALLOWED {} for caller={:?} owner={:?}",
                capability, caller.id, owner
            ),
            Decision::Deny => warn!(
                "AUTHZ: DENIED {} for caller={:?} roles={:?} owner={:?}",
                capability, caller.id, caller.roles, owner
            ),
        }

        decision
    }

    fn evaluate(
        &self,
        caller: &Caller,
        capability: Capability,
        owner: Option<&str>,
    ) -> Result<Decision> {
        let entities = self.build_entities(caller, capability, owner)?;
        let request = self.build_cedar_request(caller, capability)?;

        debug!(
            "AUTHZ: evaluating {} for caller={:?}",
            capability, caller.id
        );

        let response = self
            .authorizer
            .is_authorized(&request, &self.policies, &entities);

        Ok(match response.decision() {
            CedarDecision::Allow => Decision::Allow,
            CedarDecision::Deny => Decision::Deny,
        })
    }

    /// Builds the entity store for a single request: the caller with its
    /// roles as parents, the role entities, and the targeted resource.
    fn build_entities(
        &self,
        caller: &Caller,
        capability: Capability,
        owner: Option<&str>,
    ) -> Result<Entities> {
        let mut entities: Vec<Value> = Role::ALL
            .iter()
            .map(|role| {
                json!({
                    "uid": { "type": "Role", "id": role.as_str() },
                    "attrs": {},
                    "parents": []
                })
            })
            .collect();

        match &caller.id {
            Some(id) => {
                let parents: Vec<Value> = caller
                    .roles
                    .iter()
                    .map(|role| json!({ "type": "Role", "id": role.as_str() }))
                    .collect();
                entities.push(json!({
                    "uid": { "type": "User", "id": id },
                    "attrs": {},
                    "parents": parents
                }));
            }
            None => entities.push(json!({
                "uid": { "type": "Anonymous", "id": ANONYMOUS_ID },
                "attrs": {},
                "parents": []
            })),
        }

        let attrs = match owner.filter(|_| capability.is_ownership_aware()) {
            Some(owner) => json!({
                "owner": { "__entity": { "type": "User", "id": owner } }
            }),
            None => json!({}),
        };
        entities.push(json!({
            "uid": { "type": capability.resource_type(), "id": TARGET_ID },
            "attrs": attrs,
            "parents": []
        }));

        Entities::from_json_value(Value::Array(entities), None)
            .map_err(|e| AuthzError::EntityCreation(e.to_string()))
    }

    /// Converts our caller and capability into CEDAR's request format.
    fn build_cedar_request(&self, caller: &Caller, capability: Capability) -> Result<Request> {
        let principal_uid = match &caller.id {
            Some(id) => entity_uid("User", id)?,
            None => entity_uid("Anonymous", ANONYMOUS_ID)?,
        };
        let action_uid = entity_uid("Action", capability.action_name())?;
        let resource_uid = entity_uid(capability.resource_type(), TARGET_ID)?;

        Request::new(
            Some(principal_uid),
            Some(action_uid),
            Some(resource_uid),
            Context::empty(),
            None,
        )
        .map_err(|e| AuthzError::EvaluationError(e.to_string()))
    }
}

fn entity_uid(type_name: &str, id: &str) -> Result<EntityUid> {
    let type_name = EntityTypeName::from_str(type_name)
        .map_err(|e| AuthzError::EntityCreation(format!("Invalid entity type: {}", e)))?;
    Ok(EntityUid::from_type_name_and_id(type_name, EntityId::new(id)))
}
