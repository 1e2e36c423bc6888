//! The resolved, immutable policy model.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::declaration::{Metadata, Organization, PermissionGroup, PolicyDeclaration, Role};
use crate::error::{LabelError, ModelResult};
use crate::index::{LabelContainer, PermissionIndex};
use crate::label::TripleLabel;
use crate::resolve;

/// The fully expanded, allow/deny-resolved grant graph plus the indexes that
/// make permission checks O(1).
///
/// Built once via [`PolicyModel::resolve`]; every method afterwards is
/// read-only, so one instance can be shared freely across readers. The whole
/// struct (reverse indexes included) serializes, forming the snapshot
/// contract: a deserialized model is used verbatim, resolution does not run
/// again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyModel {
    metadata: Metadata,
    permissions: Vec<PermissionGroup>,
    organizations: Vec<Organization>,
    roles: Vec<Role>,
    permission_to_role: PermissionIndex,
    permission_to_organization: PermissionIndex,
    orgs: LabelContainer,
    role_labels: LabelContainer,
    perms: LabelContainer,
}

impl PolicyModel {
    /// Validates and expands a raw declaration into a resolved model.
    ///
    /// All-or-nothing: the first violation aborts with a
    /// [`crate::error::ModelError`] naming the section and offending label.
    pub fn resolve(declaration: PolicyDeclaration) -> ModelResult<Self> {
        resolve::resolve(declaration)
    }

    pub(crate) fn from_resolved_parts(
        declaration: PolicyDeclaration,
        permission_to_role: PermissionIndex,
        permission_to_organization: PermissionIndex,
        orgs: LabelContainer,
        role_labels: LabelContainer,
        perms: LabelContainer,
    ) -> Self {
        Self {
            metadata: declaration.metadata,
            permissions: declaration.permissions,
            organizations: declaration.organizations,
            roles: declaration.roles,
            permission_to_role,
            permission_to_organization,
            orgs,
            role_labels,
            perms,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Permission groups with the synthetic `all` resources and rules.
    pub fn permission_groups(&self) -> &[PermissionGroup] {
        &self.permissions
    }

    /// Organizations with their post-collapse (Allow-only) grants.
    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    /// Declared roles plus the synthesized per-organization `root` roles.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Reverse index: permission -> full `organization.role` labels.
    pub fn permission_to_role(&self) -> &PermissionIndex {
        &self.permission_to_role
    }

    /// Reverse index: permission -> organization labels.
    pub fn permission_to_organization(&self) -> &PermissionIndex {
        &self.permission_to_organization
    }

    /// `ORGS`: organization labels by uppercase attribute name.
    pub fn orgs(&self) -> &LabelContainer {
        &self.orgs
    }

    /// `ROLES`: full role labels by uppercase attribute name.
    pub fn role_labels(&self) -> &LabelContainer {
        &self.role_labels
    }

    /// `PERMS`: every grantable permission by uppercase attribute name.
    pub fn perms(&self) -> &LabelContainer {
        &self.perms
    }

    pub fn organization_exists(&self, label: &str) -> bool {
        self.orgs.contains_label(label)
    }

    /// Checks a fully qualified role, e.g. `role_exists("acme", "admin")`.
    pub fn role_exists(&self, organization: &str, role: &str) -> bool {
        self.role_labels
            .contains_label(&format!("{organization}.{role}"))
    }

    /// The hot-path query: does any role or organization the client holds
    /// grant this permission? An unparsable label is an error; a well-formed
    /// but unknown permission is plain `false`.
    pub fn check(&self, permission: &str, client: &Client) -> Result<bool, LabelError> {
        let label: TripleLabel = permission.parse()?;
        Ok(self.check_label(&label, client))
    }

    /// [`check`](Self::check) for an already parsed label. Hash lookups
    /// only, no grant-list scanning.
    pub fn check_label(&self, permission: &TripleLabel, client: &Client) -> bool {
        if let Some(holders) = self.permission_to_role.get(permission) {
            if client.roles().iter().any(|role| holders.contains(role)) {
                return true;
            }
        }
        if let Some(holders) = self.permission_to_organization.get(permission) {
            if client
                .organizations()
                .iter()
                .any(|organization| holders.contains(organization))
            {
                return true;
            }
        }
        false
    }
}
