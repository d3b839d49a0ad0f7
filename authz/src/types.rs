//! Core authorization types for the board.
//!
//! A decision is always made over three inputs:
//!
//! - the [`Caller`] (who is asking, and with which roles),
//! - the [`Capability`] the operation needs,
//! - the owner of the targeted resource, when the capability is ownership-aware.
//!
//! # Security Note
//! Callers must be derived from the authenticated session only. Flags sent by
//! a client (for example "show edit buttons") are display hints and never an
//! input to these types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::AuthzError;

/// A role assigned to a user by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    User,
    Editor,
    Admin,
}

impl Role {
    /// All roles the board recognizes.
    pub const ALL: [Role; 3] = [Role::User, Role::Editor, Role::Admin];

    /// Name used both for display and as the Cedar entity id.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Editor => "Editor",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Role::User),
            "Editor" => Ok(Role::Editor),
            "Admin" => Ok(Role::Admin),
            other => Err(AuthzError::UnknownRole(other.to_string())),
        }
    }
}

/// A named permission check gating one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// List and show articles.
    ViewBoard,
    /// Render the new-article form and create articles.
    CreateArticle,
    /// Attach a comment to an article.
    CreateComment,
    /// Edit or delete an article.
    MutateArticle,
    /// Edit or delete a comment.
    MutateComment,
}

impl Capability {
    /// The Cedar action id for this capability.
    pub fn action_name(&self) -> &'static str {
        match self {
            Capability::ViewBoard => "ViewBoard",
            Capability::CreateArticle => "CreateArticle",
            Capability::CreateComment => "CreateComment",
            Capability::MutateArticle => "MutateArticle",
            Capability::MutateComment => "MutateComment",
        }
    }

    /// The entity type of the resource this capability is checked against.
    pub fn resource_type(&self) -> &'static str {
        match self {
            Capability::ViewBoard | Capability::CreateArticle => "Board",
            Capability::CreateComment => "Article",
            Capability::MutateArticle => "Article",
            Capability::MutateComment => "Comment",
        }
    }

    /// Whether the decision depends on who owns the resource.
    pub fn is_ownership_aware(&self) -> bool {
        matches!(self, Capability::MutateArticle | Capability::MutateComment)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_name())
    }
}

/// The outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// The identity issuing a request, as exposed by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Opaque user id, `None` for an unauthenticated caller.
    pub id: Option<String>,

    /// Roles assigned to the caller.
    pub roles: BTreeSet<Role>,
}

impl Caller {
    /// Creates an authenticated caller with the given roles.
    pub fn new(id: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id: Some(id.into()),
            roles: roles.into_iter().collect(),
        }
    }

    /// Creates a caller with no identity and no roles.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.id.is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Whether `owner_id` names this caller.
    pub fn owns(&self, owner_id: &str) -> bool {
        self.id.as_deref() == Some(owner_id)
    }
}
