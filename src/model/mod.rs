//! Model builder.
//!
//! Turns raw instance data ([`Instance`]) into a validated, normalized
//! [`Model`], or rejects it with a [`ModelError`] naming the offending
//! entity. No search happens here.

mod builder;
mod error;
mod types;

pub use builder::{Assistant, Group, Model};
pub use error::ModelError;
pub use types::{AssistantSpec, GroupSpec, Instance, ObjectiveWeights};
