//! Derived lookup structures built after resolution.
//!
//! Two reverse indexes answer the hot-path question "who grants this
//! permission" with hash lookups only; the label containers expose
//! IDE-friendly uppercase attribute names for every known label.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::declaration::{Organization, Role};
use crate::label::TripleLabel;

/// Reverse index from a permission to the set of label strings granting it.
pub type PermissionIndex = HashMap<TripleLabel, HashSet<String>>;

/// Translates a canonical label into its attribute name:
/// `book123.admin_role` -> `BOOK123__ADMIN_ROLE`.
pub fn attribute_name(label: &str) -> String {
    label.to_uppercase().replace('.', "__")
}

/// Ordered mapping from uppercase attribute names to canonical labels.
///
/// Lookup is explicit (`get`/`contains_*`), no reflection-style attribute
/// synthesis. Iteration yields canonical labels in insertion-independent
/// sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelContainer {
    entries: BTreeMap<String, String>,
    labels: BTreeSet<String>,
}

impl LabelContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a canonical label under its derived attribute name.
    pub(crate) fn insert(&mut self, label: &str) {
        self.entries
            .insert(attribute_name(label), label.to_string());
        self.labels.insert(label.to_string());
    }

    /// Looks up a canonical label by attribute name, e.g. `USER__READ_ALL`.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.entries.get(attribute).map(String::as_str)
    }

    /// True when the canonical label is known.
    pub fn contains_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// True when the attribute name is known.
    pub fn contains_name(&self, attribute: &str) -> bool {
        self.entries.contains_key(attribute)
    }

    /// Iterates canonical labels in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Iterates (attribute name, canonical label) pairs in sorted order.
    pub fn iter_named(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Builds the `ORGS`/`ROLES`/`PERMS` containers from the resolved sections.
///
/// `PERMS` holds the full grantable space: every organization crossed with
/// every declared resource, the same set the root role is granted.
pub(crate) fn build_containers(
    groups: &[crate::declaration::PermissionGroup],
    organizations: &[Organization],
    roles: &[Role],
) -> (LabelContainer, LabelContainer, LabelContainer) {
    let mut orgs = LabelContainer::new();
    let mut role_labels = LabelContainer::new();
    let mut perms = LabelContainer::new();

    for organization in organizations {
        orgs.insert(organization.label());
        for group in groups {
            for resource in &group.resources {
                let permission = TripleLabel::from_parts(organization.label(), &resource.label);
                perms.insert(permission.as_str());
            }
        }
    }
    for role in roles {
        role_labels.insert(&role.full_label());
    }
    (orgs, role_labels, perms)
}

/// Builds the permission -> role reverse index from post-collapse grants.
pub(crate) fn build_role_index(roles: &[Role]) -> PermissionIndex {
    let mut index: PermissionIndex = HashMap::new();
    for role in roles {
        let full_label = role.full_label();
        for grant in &role.grants {
            index
                .entry(grant.label.clone())
                .or_default()
                .insert(full_label.clone());
        }
    }
    index
}

/// Builds the permission -> organization reverse index.
pub(crate) fn build_organization_index(organizations: &[Organization]) -> PermissionIndex {
    let mut index: PermissionIndex = HashMap::new();
    for organization in organizations {
        for grant in &organization.grants {
            index
                .entry(grant.label.clone())
                .or_default()
                .insert(organization.label().to_string());
        }
    }
    index
}
