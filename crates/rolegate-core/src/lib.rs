//! rolegate-core: policy resolution engine and runtime permission checks
//!
//! This crate compiles a declarative role/permission document into an
//! immutable, fully expanded access-control model and answers point lookups
//! ("does this client hold that permission") against it in O(1).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 rolegate-core                    │
//! ├─────────────────────────────────────────────────┤
//! │  label.rs       - single/double/triple grammar  │
//! │  declaration.rs - wire-format document types    │
//! │  resolve.rs     - multi-pass resolution engine  │
//! │  index.rs       - reverse indexes + containers  │
//! │  model.rs       - the resolved PolicyModel      │
//! │  client.rs      - session state + has_permission│
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Data flows one way: a [`declaration::PolicyDeclaration`] goes through
//! [`model::PolicyModel::resolve`], which validates, expands implication
//! rules to a fixed point, collapses allow/deny, synthesizes per-organization
//! `root` roles and builds the reverse indexes. The resulting model is
//! read-only and safe to share across any number of concurrent readers.

pub mod client;
pub mod declaration;
pub mod error;
pub mod index;
pub mod label;
#[cfg(test)]
mod label_proptest;
pub mod model;
mod resolve;

// Re-export the types embedding applications touch directly.
pub use client::{Client, OrganizationPolicy};
pub use declaration::{GrantKind, PolicyDeclaration, ALL_RESOURCE, ROOT_ROLE};
pub use error::{ClientError, LabelError, ModelError, ModelResult, Section};
pub use index::LabelContainer;
pub use label::{DoubleLabel, RoleLabel, SingleLabel, TripleLabel};
pub use model::PolicyModel;
