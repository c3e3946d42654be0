//! Schema types for survey-dash dashboards.
//!
//! A dashboard schema is a list of sections, each holding a tree of
//! [`ComponentDescriptor`]s that the evaluator interprets against a data
//! context.

pub mod descriptor;
pub mod document;
pub mod error;

pub use descriptor::{order_by_index, ComponentDescriptor};
pub use document::{SchemaDocument, Section, Subsection};
pub use error::{SchemaError, SchemaResult};
