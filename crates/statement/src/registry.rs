//! Contents registry.
//!
//! Every statement kind has a [`ContentsInfo`] entry naming it and carrying
//! the hooks used to build, check and serialize its contents. Part kinds
//! have no entry; asking for one is a programming error surfaced as
//! [`Error::Unimplemented`].

use serde_json::Value;

use crate::ast::{NodeKind, Part, PartId, Tree};
use crate::error::{Error, Result};
use crate::{serialize, validate};

#[derive(Debug)]
pub struct ContentsInfo {
    pub kind: NodeKind,
    pub name: &'static str,
    /// Builds empty contents for this kind.
    pub construct: fn() -> Part,
    /// Statement-level structural check, run when the checker reaches the
    /// contents node itself (part-level checks have already passed).
    pub check_structure: Option<fn(&Tree, PartId) -> Result<()>>,
    /// Renders the `"contents"` value of the serialized form.
    pub serialize: fn(&Tree, PartId) -> Value,
}

macro_rules! info {
    ($kind:ident, $name:literal, $construct:expr, $check:expr, $serialize:expr) => {
        ContentsInfo {
            kind: NodeKind::$kind,
            name: $name,
            construct: $construct,
            check_structure: $check,
            serialize: $serialize,
        }
    };
}

static SELECT: ContentsInfo = info!(
    Select,
    "SELECT",
    construct::select,
    Some(validate::check_select),
    serialize::select_contents
);
static INSERT: ContentsInfo = info!(
    Insert,
    "INSERT",
    construct::insert,
    Some(validate::check_insert),
    serialize::insert_contents
);
static UPDATE: ContentsInfo = info!(
    Update,
    "UPDATE",
    construct::update,
    Some(validate::check_update),
    serialize::update_contents
);
static DELETE: ContentsInfo = info!(
    Delete,
    "DELETE",
    construct::delete,
    Some(validate::check_delete),
    serialize::delete_contents
);
static COMPOUND: ContentsInfo = info!(
    Compound,
    "COMPOUND",
    construct::compound,
    Some(validate::check_compound),
    serialize::compound_contents
);
static BEGIN: ContentsInfo = info!(
    Begin,
    "BEGIN",
    construct::begin,
    None,
    serialize::transaction_contents
);
static COMMIT: ContentsInfo = info!(
    Commit,
    "COMMIT",
    construct::commit,
    None,
    serialize::transaction_contents
);
static ROLLBACK: ContentsInfo = info!(
    Rollback,
    "ROLLBACK",
    construct::rollback,
    None,
    serialize::transaction_contents
);
static SAVEPOINT: ContentsInfo = info!(
    Savepoint,
    "SAVEPOINT",
    construct::savepoint,
    Some(validate::check_savepoint_name),
    serialize::transaction_contents
);
static ROLLBACK_SAVEPOINT: ContentsInfo = info!(
    RollbackSavepoint,
    "ROLLBACK_SAVEPOINT",
    construct::rollback_savepoint,
    Some(validate::check_savepoint_name),
    serialize::transaction_contents
);
static DELETE_SAVEPOINT: ContentsInfo = info!(
    DeleteSavepoint,
    "DELETE_SAVEPOINT",
    construct::delete_savepoint,
    Some(validate::check_savepoint_name),
    serialize::transaction_contents
);
static UNKNOWN: ContentsInfo = info!(
    Unknown,
    "UNKNOWN",
    construct::unknown,
    Some(validate::check_unknown),
    serialize::unknown_contents
);

mod construct {
    use crate::ast::*;

    pub fn select() -> Part {
        Part::Select(SelectContents::default())
    }
    pub fn insert() -> Part {
        Part::Insert(InsertContents::default())
    }
    pub fn update() -> Part {
        Part::Update(UpdateContents::default())
    }
    pub fn delete() -> Part {
        Part::Delete(DeleteContents::default())
    }
    pub fn compound() -> Part {
        Part::Compound(CompoundContents::default())
    }
    pub fn begin() -> Part {
        Part::Begin(TransactionContents::default())
    }
    pub fn commit() -> Part {
        Part::Commit(TransactionContents::default())
    }
    pub fn rollback() -> Part {
        Part::Rollback(TransactionContents::default())
    }
    pub fn savepoint() -> Part {
        Part::Savepoint(TransactionContents::default())
    }
    pub fn rollback_savepoint() -> Part {
        Part::RollbackSavepoint(TransactionContents::default())
    }
    pub fn delete_savepoint() -> Part {
        Part::DeleteSavepoint(TransactionContents::default())
    }
    pub fn unknown() -> Part {
        Part::Unknown(UnknownContents::default())
    }
}

/// The registry entry for a statement kind.
pub fn contents_infos(kind: NodeKind) -> Result<&'static ContentsInfo> {
    match kind {
        NodeKind::Select => Ok(&SELECT),
        NodeKind::Insert => Ok(&INSERT),
        NodeKind::Update => Ok(&UPDATE),
        NodeKind::Delete => Ok(&DELETE),
        NodeKind::Compound => Ok(&COMPOUND),
        NodeKind::Begin => Ok(&BEGIN),
        NodeKind::Commit => Ok(&COMMIT),
        NodeKind::Rollback => Ok(&ROLLBACK),
        NodeKind::Savepoint => Ok(&SAVEPOINT),
        NodeKind::RollbackSavepoint => Ok(&ROLLBACK_SAVEPOINT),
        NodeKind::DeleteSavepoint => Ok(&DELETE_SAVEPOINT),
        NodeKind::Unknown => Ok(&UNKNOWN),
        other => Err(Error::Unimplemented(other)),
    }
}

/// The display name of a statement kind, "NONE" for part kinds.
pub fn type_to_string(kind: NodeKind) -> &'static str {
    match contents_infos(kind) {
        Ok(info) => info.name,
        Err(_) => "NONE",
    }
}

/// The statement kind a display name maps to. Dispatches on the leading
/// characters, so any name produced by [`type_to_string`] round-trips.
pub fn string_to_type(name: &str) -> Option<NodeKind> {
    let mut chars = name.chars();
    let kind = match chars.next()? {
        'B' => NodeKind::Begin,
        'C' if name.starts_with("COMP") => NodeKind::Compound,
        'C' => NodeKind::Commit,
        'D' if name == "DELETE" => NodeKind::Delete,
        'D' => NodeKind::DeleteSavepoint,
        'I' => NodeKind::Insert,
        'R' if name == "ROLLBACK" => NodeKind::Rollback,
        'R' => NodeKind::RollbackSavepoint,
        'S' if chars.next() == Some('E') => NodeKind::Select,
        'S' => NodeKind::Savepoint,
        'U' if name.as_bytes().get(1) == Some(&b'N') => NodeKind::Unknown,
        'U' => NodeKind::Update,
        _ => return None,
    };
    Some(kind)
}
