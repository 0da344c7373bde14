//! Structural model for SQL statements.
//!
//! A statement is a tree of typed parts: contents nodes for the statement
//! kinds (SELECT, INSERT, transaction control, ...) and clause nodes for
//! everything below them (expressions, operations, FROM targets, joins).
//! On top of the tree this crate provides:
//!
//! - a post-order traversal engine shared by every whole-tree operation,
//! - a structural checker enforcing the schema-independent rules,
//! - a binder resolving named schema objects against a
//!   [`Dictionary`](sqltree_dict::Dictionary), with bindings that are
//!   invalidated in place when the underlying object is destroyed,
//! - a JSON serializer,
//! - a registry mapping statement kinds to their names and handlers.

pub mod ast;
mod binding;
mod error;
mod ident;
mod registry;
mod serialize;
mod statement;
mod traverse;
mod validate;

pub use ast::{NodeKind, Part, PartId, Tree};
pub use binding::{Binding, InvalidatedHandler};
pub use error::{Error, Result};
pub use ident::is_valid_identifier;
pub use registry::{contents_infos, string_to_type, type_to_string, ContentsInfo};
pub use serialize::serialize_part;
pub use statement::SqlStatement;
pub use traverse::{child_parts, foreach, foreach_mut};
pub use validate::{check_part, select_column_count};
