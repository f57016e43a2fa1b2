//! The résumé editing engine: an in-memory document, its keyed
//! sub-collections and the checks run before a save.

pub mod collection;
pub mod completeness;
pub mod dates;
pub mod document;
pub mod entities;
pub mod entity;
pub mod nested;
pub mod validation;

pub use collection::{EntityCollection, EntityId};
pub use document::{ResumeDocument, ScalarField, Section};
pub use entity::{EntityKind, FieldValue};
pub use validation::{validate, Rule, Violation};
