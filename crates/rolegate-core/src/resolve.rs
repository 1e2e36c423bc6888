//! The resolution engine: ordered validation and rewrite passes that turn a
//! raw [`PolicyDeclaration`] into a resolved [`PolicyModel`].
//!
//! Pass order is explicit and fixed:
//! 1. metadata + uniqueness checks
//! 2. per-group structural validation
//! 3. synthetic `all` resource/rule injection
//! 4. grant referential integrity
//! 5. rule-closure expansion to a fixed point
//! 6. allow/deny collapse (deny is pure subtraction)
//! 7. root-role synthesis per organization
//! 8. reverse-index and container construction
//!
//! Every validating pass is fatal on first violation; a model is never
//! partially built.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, NaiveDateTime};
use tracing::debug;

use crate::declaration::{
    Grant, GrantKind, Metadata, PermissionGroup, PolicyDeclaration, Resource, Role, RoleMetadata,
    Rule, ALL_RESOURCE, ROOT_ROLE,
};
use crate::error::{ModelError, ModelResult, Section};
use crate::index;
use crate::label::{DoubleLabel, SingleLabel, TripleLabel};
use crate::model::PolicyModel;

/// Runs the full pipeline. Consumes the declaration since grants are
/// rewritten in place during expansion and collapse.
pub(crate) fn resolve(mut declaration: PolicyDeclaration) -> ModelResult<PolicyModel> {
    validate_metadata(&mut declaration.metadata)?;
    check_uniqueness(&declaration)?;
    for group in &declaration.permissions {
        group.validate_structure()?;
    }
    inject_all(&mut declaration.permissions);
    check_grant_references(&declaration)?;

    expand_and_collapse(&mut declaration);
    synthesize_root_roles(&mut declaration);

    let permission_to_role = index::build_role_index(&declaration.roles);
    let permission_to_organization = index::build_organization_index(&declaration.organizations);
    let (orgs, role_labels, perms) = index::build_containers(
        &declaration.permissions,
        &declaration.organizations,
        &declaration.roles,
    );
    debug!(
        groups = declaration.permissions.len(),
        organizations = declaration.organizations.len(),
        roles = declaration.roles.len(),
        indexed_permissions = permission_to_role.len(),
        "policy declaration resolved"
    );

    Ok(PolicyModel::from_resolved_parts(
        declaration,
        permission_to_role,
        permission_to_organization,
        orgs,
        role_labels,
        perms,
    ))
}

fn parse_iso8601(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

/// Validates `created_at` (filling it when absent) and stamps
/// `last_modified` with the resolution time.
fn validate_metadata(metadata: &mut Metadata) -> ModelResult<()> {
    let now = chrono::Utc::now().to_rfc3339();
    match &metadata.created_at {
        None => metadata.created_at = Some(now.clone()),
        Some(value) => {
            if !parse_iso8601(value) {
                return Err(ModelError::InvalidCreatedAt {
                    value: value.clone(),
                });
            }
        }
    }
    metadata.last_modified = Some(now);
    Ok(())
}

/// Pass 1: label uniqueness across all three sections, the reserved `root`
/// role label, and role -> organization references.
fn check_uniqueness(declaration: &PolicyDeclaration) -> ModelResult<()> {
    let mut group_labels: HashSet<&str> = HashSet::new();
    for group in &declaration.permissions {
        if !group_labels.insert(group.label()) {
            return Err(ModelError::DuplicateGroup {
                label: group.label().to_string(),
            });
        }
    }

    let mut organization_labels: HashSet<&str> = HashSet::new();
    for organization in &declaration.organizations {
        if !organization_labels.insert(organization.label()) {
            return Err(ModelError::DuplicateOrganization {
                label: organization.label().to_string(),
            });
        }
    }

    let mut role_pairs: HashSet<(&str, &str)> = HashSet::new();
    for role in &declaration.roles {
        if role.label() == ROOT_ROLE {
            return Err(ModelError::ReservedRootRole {
                organization: role.organization().to_string(),
            });
        }
        if !organization_labels.contains(role.organization()) {
            return Err(ModelError::UnknownRoleOrganization {
                organization: role.organization().to_string(),
                role: role.label().to_string(),
            });
        }
        if !role_pairs.insert((role.organization(), role.label())) {
            return Err(ModelError::DuplicateRole {
                organization: role.organization().to_string(),
                label: role.label().to_string(),
            });
        }
    }
    Ok(())
}

/// Pass 3: appends the `group.all` resource and the `group.all -> [every
/// declared resource]` rule to every non-empty group. Idempotent: nothing is
/// appended twice.
fn inject_all(groups: &mut [PermissionGroup]) {
    for group in groups {
        if group.resources.is_empty() {
            continue;
        }
        let all = DoubleLabel::from_parts(group.metadata.label.as_str(), ALL_RESOURCE);
        if !group.resources.iter().any(|r| r.label == all) {
            group.resources.push(Resource { label: all.clone() });
        }
        if !group.rules.iter().any(|r| r.when == all) {
            let then: Vec<DoubleLabel> = group
                .resources
                .iter()
                .filter(|r| r.label != all)
                .map(|r| r.label.clone())
                .collect();
            group.rules.push(Rule { when: all, then });
        }
    }
}

fn resources_by_group(groups: &[PermissionGroup]) -> HashMap<&str, HashSet<&str>> {
    groups
        .iter()
        .map(|group| {
            (
                group.label(),
                group.resources.iter().map(|r| r.label.as_str()).collect(),
            )
        })
        .collect()
}

fn rules_by_group(groups: &[PermissionGroup]) -> HashMap<&str, &[Rule]> {
    groups
        .iter()
        .map(|group| (group.label(), group.rules.as_slice()))
        .collect()
}

/// Pass 4: every grant must stay inside its owner's organization and point
/// at a resource that exists (the synthetic `all` included).
fn check_grant_references(declaration: &PolicyDeclaration) -> ModelResult<()> {
    let resources = resources_by_group(&declaration.permissions);

    let check = |section: Section, owner: &str, organization: &str, grants: &[Grant]| {
        for grant in grants {
            if grant.label.organization() != organization {
                return Err(ModelError::ForeignGrant {
                    section,
                    owner: owner.to_string(),
                    label: grant.label.to_string(),
                });
            }
            let known = resources
                .get(grant.label.group())
                .is_some_and(|set| set.contains(grant.label.to_double().as_str()));
            if !known {
                return Err(ModelError::UnknownGrantPermission {
                    section,
                    owner: owner.to_string(),
                    label: grant.label.to_string(),
                });
            }
        }
        Ok(())
    };

    for organization in &declaration.organizations {
        check(
            Section::Organizations,
            organization.label(),
            organization.label(),
            &organization.grants,
        )?;
    }
    for role in &declaration.roles {
        check(
            Section::Roles,
            &role.full_label(),
            role.organization(),
            &role.grants,
        )?;
    }
    Ok(())
}

/// Pass 5 for one grant list: a monotone worklist sweep that reaches the
/// fixed point of the implication closure. Each grant already in the list is
/// matched against its group's rules; every `then` target becomes a new
/// grant of the SAME allow/deny type. Grants are never re-added, so declared
/// rule cycles terminate instead of looping.
fn expand_grants(owner_organization: &str, grants: &mut Vec<Grant>, rules: &HashMap<&str, &[Rule]>) {
    let mut seen: HashSet<Grant> = grants.iter().cloned().collect();
    let mut i = 0;
    while i < grants.len() {
        let grant = grants[i].clone();
        let when = grant.label.to_double();
        if let Some(group_rules) = rules.get(grant.label.group()) {
            for rule in *group_rules {
                if rule.when != when {
                    continue;
                }
                for then in &rule.then {
                    let candidate = Grant {
                        kind: grant.kind,
                        label: TripleLabel::from_parts(owner_organization, then),
                    };
                    if seen.insert(candidate.clone()) {
                        grants.push(candidate);
                    }
                }
            }
        }
        i += 1;
    }
}

/// Pass 6 for one grant list: `allow_set - deny_set`, survivors re-typed
/// Allow. Deny never outlives this pass. Output is sorted for deterministic
/// serialization.
fn collapse_grants(grants: Vec<Grant>) -> Vec<Grant> {
    let mut allow: BTreeSet<TripleLabel> = BTreeSet::new();
    let mut deny: BTreeSet<TripleLabel> = BTreeSet::new();
    for grant in grants {
        match grant.kind {
            GrantKind::Allow => {
                allow.insert(grant.label);
            }
            GrantKind::Deny => {
                deny.insert(grant.label);
            }
        }
    }
    allow
        .into_iter()
        .filter(|label| !deny.contains(label))
        .map(Grant::allow)
        .collect()
}

fn expand_and_collapse(declaration: &mut PolicyDeclaration) {
    let rules = rules_by_group(&declaration.permissions);

    for organization in &mut declaration.organizations {
        let label = organization.metadata.label.as_str().to_string();
        expand_grants(&label, &mut organization.grants, &rules);
        organization.grants = collapse_grants(std::mem::take(&mut organization.grants));
    }
    for role in &mut declaration.roles {
        let organization = role.metadata.organization.as_str().to_string();
        expand_grants(&organization, &mut role.grants, &rules);
        role.grants = collapse_grants(std::mem::take(&mut role.grants));
    }
}

/// Pass 7: one `root` role per organization, granted every resource of every
/// group in the whole declaration regardless of the organization's own
/// grants.
fn synthesize_root_roles(declaration: &mut PolicyDeclaration) {
    let root = SingleLabel::from_validated(ROOT_ROLE);
    let mut synthesized = Vec::with_capacity(declaration.organizations.len());
    for organization in &declaration.organizations {
        let mut grants = Vec::new();
        for group in &declaration.permissions {
            for resource in &group.resources {
                grants.push(Grant::allow(TripleLabel::from_parts(
                    organization.label(),
                    &resource.label,
                )));
            }
        }
        synthesized.push(Role {
            metadata: RoleMetadata {
                label: root.clone(),
                organization: organization.metadata.label.clone(),
            },
            grants,
        });
    }
    declaration.roles.extend(synthesized);
}
