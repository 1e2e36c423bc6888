//! Raw declaration types matching the policy document wire format.
//!
//! These are pure data holders; the only behavior is structural validation
//! of one permission group at a time. Cross-entity checks and all rewriting
//! live in the resolution engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::label::{DoubleLabel, SingleLabel, TripleLabel};

/// Reserved resource suffix injected by the engine.
pub const ALL_RESOURCE: &str = "all";

/// Reserved role label synthesized by the engine.
pub const ROOT_ROLE: &str = "root";

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMetadata {
    pub label: SingleLabel,
}

/// One declared resource, e.g. `{label: user.read_basic}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub label: DoubleLabel,
}

/// Implication edge: holding `when` also grants every label in `then`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub when: DoubleLabel,
    pub then: Vec<DoubleLabel>,
}

/// A named group of resources plus the implication rules between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub metadata: GroupMetadata,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl PermissionGroup {
    pub fn label(&self) -> &str {
        self.metadata.label.as_str()
    }

    /// Checks the group in isolation: resource ownership and uniqueness,
    /// rule references, and the reserved `all` suffix.
    pub fn validate_structure(&self) -> ModelResult<()> {
        let group = self.label();

        let mut suffixes: HashSet<&str> = HashSet::new();
        for resource in &self.resources {
            if resource.label.group() != group {
                return Err(ModelError::ForeignResource {
                    group: group.to_string(),
                    resource: resource.label.to_string(),
                });
            }
            if resource.label.resource() == ALL_RESOURCE {
                return Err(ModelError::ReservedAllResource {
                    group: group.to_string(),
                    resource: resource.label.to_string(),
                });
            }
            if !suffixes.insert(resource.label.resource()) {
                return Err(ModelError::DuplicateResource {
                    group: group.to_string(),
                    resource: resource.label.to_string(),
                });
            }
        }

        let declared: HashSet<&str> = self.resources.iter().map(|r| r.label.as_str()).collect();
        for rule in &self.rules {
            if rule.when.resource() == ALL_RESOURCE {
                return Err(ModelError::ReservedAllRule {
                    group: group.to_string(),
                    label: rule.when.to_string(),
                });
            }
            if !declared.contains(rule.when.as_str()) {
                return Err(ModelError::UnknownRuleWhen {
                    group: group.to_string(),
                    when: rule.when.to_string(),
                });
            }
            let mut seen_then: HashSet<&str> = HashSet::new();
            for then in &rule.then {
                if then.resource() == ALL_RESOURCE {
                    return Err(ModelError::ReservedAllRule {
                        group: group.to_string(),
                        label: then.to_string(),
                    });
                }
                if then == &rule.when {
                    return Err(ModelError::SelfImplication {
                        group: group.to_string(),
                        label: then.to_string(),
                    });
                }
                if !seen_then.insert(then.as_str()) {
                    return Err(ModelError::DuplicateThen {
                        group: group.to_string(),
                        label: then.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Whether a grant admits or subtracts a permission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantKind {
    #[default]
    Allow,
    Deny,
}

/// A (permission, allow|deny) pair attached to an organization or role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    #[serde(rename = "type", default)]
    pub kind: GrantKind,
    pub label: TripleLabel,
}

impl Grant {
    pub fn allow(label: TripleLabel) -> Self {
        Self {
            kind: GrantKind::Allow,
            label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMetadata {
    pub label: SingleLabel,
}

/// A declared organization and its direct grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub metadata: OrganizationMetadata,
    #[serde(rename = "permissions", default)]
    pub grants: Vec<Grant>,
}

impl Organization {
    pub fn label(&self) -> &str {
        self.metadata.label.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMetadata {
    pub label: SingleLabel,
    pub organization: SingleLabel,
}

/// A declared role scoped to one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub metadata: RoleMetadata,
    #[serde(rename = "permissions", default)]
    pub grants: Vec<Grant>,
}

impl Role {
    pub fn label(&self) -> &str {
        self.metadata.label.as_str()
    }

    pub fn organization(&self) -> &str {
        self.metadata.organization.as_str()
    }

    /// Fully qualified `organization.role` form.
    pub fn full_label(&self) -> String {
        format!("{}.{}", self.organization(), self.label())
    }
}

/// The whole raw policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDeclaration {
    pub metadata: Metadata,
    #[serde(default)]
    pub permissions: Vec<PermissionGroup>,
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub roles: Vec<Role>,
}
