//! The runtime client: the organizations a caller has joined and the roles
//! it holds, plus the hot-path permission query.
//!
//! A client is lightweight session state owned by the embedding application;
//! it is not thread-safe and is expected to live inside one logical
//! request/session. All mutators are idempotent and report through their
//! boolean return whether they changed anything.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, LabelError};
use crate::label::{RoleLabel, SingleLabel};
use crate::model::PolicyModel;

/// What to do when a role is added before its organization was joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrganizationPolicy {
    /// Join the role's organization implicitly. The default.
    #[default]
    AutoAdd,
    /// Fail with [`ClientError::OrganizationNotJoined`].
    Reject,
}

/// A set of joined organizations and held fully-qualified roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    organizations: Vec<String>,
    roles: Vec<String>,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a client from comma-separated organization and role strings,
    /// the text form ORM columns store. Every entry is validated; roles
    /// whose organization is missing from the first list join it implicitly.
    pub fn from_parts(organizations: &str, roles: &str) -> Result<Self, ClientError> {
        let mut client = Self::new();
        for organization in organizations.split(',').filter(|s| !s.is_empty()) {
            client.add_organization(organization, None)?;
        }
        for role in roles.split(',').filter(|s| !s.is_empty()) {
            client.add_role(role, None, OrganizationPolicy::AutoAdd)?;
        }
        Ok(client)
    }

    /// Joined organization labels, in join order.
    pub fn organizations(&self) -> &[String] {
        &self.organizations
    }

    /// Held `organization.role` labels, in add order.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Comma-separated form of the organization list.
    pub fn organizations_string(&self) -> String {
        self.organizations.join(",")
    }

    /// Comma-separated form of the role list.
    pub fn roles_string(&self) -> String {
        self.roles.join(",")
    }

    /// Joins an organization. With a model, the organization must exist in
    /// it. Returns false when already joined.
    pub fn add_organization(
        &mut self,
        label: &str,
        model: Option<&PolicyModel>,
    ) -> Result<bool, ClientError> {
        let label = SingleLabel::new(label).map_err(ClientError::from)?;
        if let Some(model) = model {
            if !model.organization_exists(label.as_str()) {
                return Err(ClientError::UnknownOrganization {
                    label: label.to_string(),
                });
            }
        }
        if self.organizations.iter().any(|o| o == label.as_str()) {
            return Ok(false);
        }
        self.organizations.push(label.to_string());
        Ok(true)
    }

    /// Leaves an organization and drops every role scoped to it. Returns
    /// false when the organization was not joined.
    pub fn remove_organization(
        &mut self,
        label: &str,
        model: Option<&PolicyModel>,
    ) -> Result<bool, ClientError> {
        let label = SingleLabel::new(label).map_err(ClientError::from)?;
        if let Some(model) = model {
            if !model.organization_exists(label.as_str()) {
                return Err(ClientError::UnknownOrganization {
                    label: label.to_string(),
                });
            }
        }
        let before = self.organizations.len();
        self.organizations.retain(|o| o != label.as_str());
        if self.organizations.len() == before {
            return Ok(false);
        }
        let prefix = format!("{label}.");
        self.roles.retain(|r| !r.starts_with(&prefix));
        Ok(true)
    }

    /// Adds a fully qualified `organization.role`. With a model, the role
    /// must exist in it. When the role's organization has not been joined,
    /// `policy` decides between joining it implicitly and failing. Returns
    /// false when the role is already held.
    pub fn add_role(
        &mut self,
        label: &str,
        model: Option<&PolicyModel>,
        policy: OrganizationPolicy,
    ) -> Result<bool, ClientError> {
        let label = RoleLabel::new(label).map_err(ClientError::from)?;
        if let Some(model) = model {
            if !model.role_exists(label.organization(), label.role()) {
                return Err(ClientError::UnknownRole {
                    label: label.to_string(),
                });
            }
        }
        if self.roles.iter().any(|r| r == label.as_str()) {
            return Ok(false);
        }
        if !self.organizations.iter().any(|o| o == label.organization()) {
            match policy {
                OrganizationPolicy::AutoAdd => {
                    self.organizations.push(label.organization().to_string());
                }
                OrganizationPolicy::Reject => {
                    return Err(ClientError::OrganizationNotJoined {
                        organization: label.organization().to_string(),
                        role: label.to_string(),
                    });
                }
            }
        }
        self.roles.push(label.to_string());
        Ok(true)
    }

    /// Drops a role. With a model, the role must exist in it. Returns false
    /// when the role was not held.
    pub fn remove_role(
        &mut self,
        label: &str,
        model: Option<&PolicyModel>,
    ) -> Result<bool, ClientError> {
        let label = RoleLabel::new(label).map_err(ClientError::from)?;
        if let Some(model) = model {
            if !model.role_exists(label.organization(), label.role()) {
                return Err(ClientError::UnknownRole {
                    label: label.to_string(),
                });
            }
        }
        let before = self.roles.len();
        self.roles.retain(|r| r != label.as_str());
        Ok(self.roles.len() != before)
    }

    /// True iff any held role or joined organization grants `permission`
    /// in `model`. Alias of [`PolicyModel::check`].
    pub fn has_permission(
        &self,
        permission: &str,
        model: &PolicyModel,
    ) -> Result<bool, LabelError> {
        model.check(permission, self)
    }
}
