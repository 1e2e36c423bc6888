//! Error types for policy compilation and runtime checks.

use thiserror::Error;

/// Declaration section an error originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Metadata,
    Permissions,
    Organizations,
    Roles,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Section::Metadata => "metadata",
            Section::Permissions => "permissions",
            Section::Organizations => "organizations",
            Section::Roles => "roles",
        };
        f.write_str(name)
    }
}

/// A string failed the single/double/triple label grammar.
///
/// Never coerced: uppercase or whitespace input is an error, not something
/// the parser fixes up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// Wrong number of dot-separated segments.
    #[error("label '{value}' must have exactly {expected} dot-separated segment(s), found {found}")]
    SegmentCount {
        value: String,
        expected: usize,
        found: usize,
    },

    /// A segment contains characters outside `[a-z_0-9]`.
    #[error("label '{value}' may only contain lowercase ascii letters, digits and underscores")]
    InvalidCharacters { value: String },

    /// A segment is empty or longer than [`crate::label::MAX_SEGMENT_LENGTH`].
    #[error("label '{value}' has a segment outside the allowed 1..=128 length")]
    InvalidSegmentLength { value: String },
}

/// A referential or uniqueness violation found while resolving a declaration.
///
/// Resolution is all-or-nothing: any of these aborts construction and no
/// partial model is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("error in metadata section: created_at '{value}' is not a valid ISO-8601 timestamp")]
    InvalidCreatedAt { value: String },

    #[error("error in permissions section: found two permission groups with the same label '{label}'")]
    DuplicateGroup { label: String },

    #[error("error in permissions section: resource '{resource}' must start with group label '{group}'")]
    ForeignResource { group: String, resource: String },

    #[error("error in permissions section: found two resources with the same label '{resource}' in group '{group}'")]
    DuplicateResource { group: String, resource: String },

    #[error("error in permissions section: resource '{resource}' uses the reserved suffix 'all'")]
    ReservedAllResource { group: String, resource: String },

    #[error("error in permissions section: rule 'when' condition '{when}' not found among group '{group}' resources")]
    UnknownRuleWhen { group: String, when: String },

    #[error("error in permissions section: rule label '{label}' uses the reserved suffix 'all' in group '{group}'")]
    ReservedAllRule { group: String, label: String },

    #[error("error in permissions section: rule 'then' entry '{label}' equals its own 'when' condition in group '{group}'")]
    SelfImplication { group: String, label: String },

    #[error("error in permissions section: found two 'then' entries with the same label '{label}' in group '{group}'")]
    DuplicateThen { group: String, label: String },

    #[error("error in organizations section: found two organizations with the same label '{label}'")]
    DuplicateOrganization { label: String },

    #[error("error in roles section: found two roles with the same label '{label}' in organization '{organization}'")]
    DuplicateRole { organization: String, label: String },

    #[error("error in roles section: role label 'root' is reserved in organization '{organization}'")]
    ReservedRootRole { organization: String },

    #[error("error in roles section: role '{role}' declares unknown organization '{organization}'")]
    UnknownRoleOrganization { organization: String, role: String },

    #[error("error in {section} section: grant '{label}' does not belong to '{owner}'")]
    ForeignGrant {
        section: Section,
        owner: String,
        label: String,
    },

    #[error("error in {section} section: grant '{label}' on '{owner}' references an unknown permission")]
    UnknownGrantPermission {
        section: Section,
        owner: String,
        label: String,
    },

    #[error(transparent)]
    Label(#[from] LabelError),
}

impl ModelError {
    /// Declaration section the violation was found in.
    pub fn section(&self) -> Section {
        match self {
            ModelError::InvalidCreatedAt { .. } => Section::Metadata,
            ModelError::DuplicateGroup { .. }
            | ModelError::ForeignResource { .. }
            | ModelError::DuplicateResource { .. }
            | ModelError::ReservedAllResource { .. }
            | ModelError::UnknownRuleWhen { .. }
            | ModelError::ReservedAllRule { .. }
            | ModelError::SelfImplication { .. }
            | ModelError::DuplicateThen { .. }
            | ModelError::Label(_) => Section::Permissions,
            ModelError::DuplicateOrganization { .. } => Section::Organizations,
            ModelError::DuplicateRole { .. }
            | ModelError::ReservedRootRole { .. }
            | ModelError::UnknownRoleOrganization { .. } => Section::Roles,
            ModelError::ForeignGrant { section, .. }
            | ModelError::UnknownGrantPermission { section, .. } => *section,
        }
    }

    /// The offending label, when one exists.
    pub fn label(&self) -> Option<&str> {
        match self {
            ModelError::InvalidCreatedAt { value } => Some(value),
            ModelError::DuplicateGroup { label }
            | ModelError::DuplicateOrganization { label }
            | ModelError::DuplicateRole { label, .. }
            | ModelError::ReservedAllRule { label, .. }
            | ModelError::SelfImplication { label, .. }
            | ModelError::DuplicateThen { label, .. }
            | ModelError::ForeignGrant { label, .. }
            | ModelError::UnknownGrantPermission { label, .. } => Some(label),
            ModelError::ForeignResource { resource, .. }
            | ModelError::DuplicateResource { resource, .. }
            | ModelError::ReservedAllResource { resource, .. } => Some(resource),
            ModelError::UnknownRuleWhen { when, .. } => Some(when),
            ModelError::ReservedRootRole { organization } => Some(organization),
            ModelError::UnknownRoleOrganization { organization, .. } => Some(organization),
            ModelError::Label(_) => None,
        }
    }
}

/// Errors raised by [`crate::client::Client`] mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("role '{label}' does not exist in the policy model")]
    UnknownRole { label: String },

    #[error("organization '{label}' does not exist in the policy model")]
    UnknownOrganization { label: String },

    #[error("role '{role}' requires organization '{organization}' which the client has not joined")]
    OrganizationNotJoined { organization: String, role: String },

    #[error(transparent)]
    Label(#[from] LabelError),
}

/// Result type for model construction.
pub type ModelResult<T> = Result<T, ModelError>;
