//! Label grammar for the three dotted label shapes.
//!
//! Every name in a policy document is one of:
//! - a single label (`user`) naming a permission group, organization or role,
//! - a double label (`user.read_basic`) naming a resource within a group,
//! - a triple label (`acme.user.read_basic`) naming a concrete grantable
//!   permission scoped to an organization.
//!
//! Segments are restricted to `[a-z_0-9]` and validated strictly: uppercase
//! or whitespace input fails, nothing is normalized. Labels compare, hash and
//! order by their canonical string form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Maximum length of one label segment.
pub const MAX_SEGMENT_LENGTH: usize = 128;

fn segment_is_well_formed(value: &str, segment: &str) -> Result<(), LabelError> {
    if segment.is_empty() || segment.len() > MAX_SEGMENT_LENGTH {
        return Err(LabelError::InvalidSegmentLength {
            value: value.to_string(),
        });
    }
    if !segment
        .bytes()
        .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_'))
    {
        return Err(LabelError::InvalidCharacters {
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validates that `value` has exactly `expected` dot-separated segments and
/// returns the byte offsets of the separating dots.
fn split_segments(value: &str, expected: usize) -> Result<Vec<usize>, LabelError> {
    let found = value.split('.').count();
    if found != expected {
        return Err(LabelError::SegmentCount {
            value: value.to_string(),
            expected,
            found,
        });
    }
    for segment in value.split('.') {
        segment_is_well_formed(value, segment)?;
    }
    Ok(value
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .map(|(i, _)| i)
        .collect())
}

/// One lowercase token, no dots (`user`, `acme`, `admin_role`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SingleLabel(String);

impl SingleLabel {
    pub fn new(value: impl Into<String>) -> Result<Self, LabelError> {
        let value = value.into();
        split_segments(&value, 1)?;
        Ok(Self(value))
    }

    /// Wraps a known-good segment such as the reserved `root` keyword.
    pub(crate) fn from_validated(value: &str) -> Self {
        debug_assert!(segment_is_well_formed(value, value).is_ok());
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `group.resource`: one resource within one permission group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DoubleLabel {
    full: String,
    dot: usize,
}

impl DoubleLabel {
    pub fn new(value: impl Into<String>) -> Result<Self, LabelError> {
        let full = value.into();
        let dots = split_segments(&full, 2)?;
        Ok(Self { full, dot: dots[0] })
    }

    /// Joins two already validated segments.
    pub(crate) fn from_parts(group: &str, resource: &str) -> Self {
        debug_assert!(segment_is_well_formed(group, group).is_ok());
        debug_assert!(segment_is_well_formed(resource, resource).is_ok());
        Self {
            full: format!("{group}.{resource}"),
            dot: group.len(),
        }
    }

    /// The permission-group segment.
    pub fn group(&self) -> &str {
        &self.full[..self.dot]
    }

    /// The resource segment.
    pub fn resource(&self) -> &str {
        &self.full[self.dot + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }
}

/// `organization.group.resource`: one grantable permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TripleLabel {
    full: String,
    first_dot: usize,
    second_dot: usize,
}

impl TripleLabel {
    pub fn new(value: impl Into<String>) -> Result<Self, LabelError> {
        let full = value.into();
        let dots = split_segments(&full, 3)?;
        Ok(Self {
            full,
            first_dot: dots[0],
            second_dot: dots[1],
        })
    }

    /// Scopes an already validated resource label to an organization.
    pub(crate) fn from_parts(organization: &str, resource: &DoubleLabel) -> Self {
        debug_assert!(segment_is_well_formed(organization, organization).is_ok());
        Self {
            full: format!("{organization}.{}", resource.as_str()),
            first_dot: organization.len(),
            second_dot: organization.len() + 1 + resource.group().len(),
        }
    }

    /// The organization segment.
    pub fn organization(&self) -> &str {
        &self.full[..self.first_dot]
    }

    /// The permission-group segment.
    pub fn group(&self) -> &str {
        &self.full[self.first_dot + 1..self.second_dot]
    }

    /// The resource segment.
    pub fn resource(&self) -> &str {
        &self.full[self.second_dot + 1..]
    }

    /// Drops the organization segment: `acme.user.read` -> `user.read`.
    pub fn to_double(&self) -> DoubleLabel {
        DoubleLabel {
            full: self.full[self.first_dot + 1..].to_string(),
            dot: self.second_dot - self.first_dot - 1,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }
}

/// `organization.role`: the fully qualified role form held by clients.
///
/// Shares the double-label grammar but with role semantics, so it gets its
/// own accessors instead of reusing [`DoubleLabel`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleLabel {
    full: String,
    dot: usize,
}

impl RoleLabel {
    pub fn new(value: impl Into<String>) -> Result<Self, LabelError> {
        let full = value.into();
        let dots = split_segments(&full, 2)?;
        Ok(Self { full, dot: dots[0] })
    }

    /// Joins an organization and role label.
    pub fn from_parts(organization: &SingleLabel, role: &SingleLabel) -> Self {
        Self {
            full: format!("{}.{}", organization.as_str(), role.as_str()),
            dot: organization.as_str().len(),
        }
    }

    /// The organization segment.
    pub fn organization(&self) -> &str {
        &self.full[..self.dot]
    }

    /// The role segment.
    pub fn role(&self) -> &str {
        &self.full[self.dot + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }
}

macro_rules! impl_label_traits {
    ($name:ident) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = LabelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = LabelError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(label: $name) -> String {
                label.as_str().to_string()
            }
        }
    };
}

impl_label_traits!(SingleLabel);
impl_label_traits!(DoubleLabel);
impl_label_traits!(TripleLabel);
impl_label_traits!(RoleLabel);
