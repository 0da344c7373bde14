//! Error types for statement validation and serialization

use thiserror::Error;

use crate::ast::NodeKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The statement tree is malformed: a part violates a structural rule
    /// that holds regardless of any schema (wrong operand count, empty FROM,
    /// mismatched CASE branches, ...).
    #[error("Invalid structure: {0}")]
    StructureContents(String),

    /// A name cannot be used as an SQL identifier.
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),

    /// A part references a schema object the dictionary does not hold, or
    /// references it ambiguously.
    #[error("Missing or ambiguous dictionary element: {0}")]
    DictElementMissing(String),

    /// No contents handler is registered for this node kind. Statements can
    /// only be built from statement kinds, never from part kinds.
    #[error("No contents handler for node kind {0}")]
    Unimplemented(NodeKind),
}
