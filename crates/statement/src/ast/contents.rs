//! Per-kind statement contents.

use crate::PartId;

/// Contents of a SELECT statement. Child ids reference nodes in the owning
/// tree; the comment on each field names the part kind expected there.
#[derive(Clone, Debug, Default)]
pub struct SelectContents {
    pub distinct: bool,
    /// Expr. DISTINCT ON expression; only meaningful with `distinct`.
    pub distinct_expr: Option<PartId>,
    /// SelectField list, the projection.
    pub fields: Vec<PartId>,
    /// SelectFrom.
    pub from: Option<PartId>,
    /// Expr. WHERE condition.
    pub where_cond: Option<PartId>,
    /// Expr list. GROUP BY expressions.
    pub group_by: Vec<PartId>,
    /// Expr. HAVING condition.
    pub having_cond: Option<PartId>,
    /// SelectOrder list.
    pub order_by: Vec<PartId>,
    /// Expr. LIMIT row count.
    pub limit_count: Option<PartId>,
    /// Expr. LIMIT offset; requires `limit_count`.
    pub limit_offset: Option<PartId>,
}

/// Contents of an INSERT statement. Exactly one of `values_list` and
/// `select` supplies the rows.
#[derive(Clone, Debug, Default)]
pub struct InsertContents {
    pub on_conflict: Option<String>,
    /// Table.
    pub table: Option<PartId>,
    /// Field list, the named columns.
    pub fields: Vec<PartId>,
    /// Rows of Expr nodes.
    pub values_list: Vec<Vec<PartId>>,
    /// Select or Compound node supplying the rows.
    pub select: Option<PartId>,
}

/// Contents of an UPDATE statement. `fields` and `expr_list` are parallel:
/// `SET fields[i] = expr_list[i]`.
#[derive(Clone, Debug, Default)]
pub struct UpdateContents {
    pub on_conflict: Option<String>,
    /// Table.
    pub table: Option<PartId>,
    /// Field list.
    pub fields: Vec<PartId>,
    /// Expr list, parallel to `fields`.
    pub expr_list: Vec<PartId>,
    /// Expr. WHERE condition.
    pub cond: Option<PartId>,
}

/// Contents of a DELETE statement.
#[derive(Clone, Debug, Default)]
pub struct DeleteContents {
    /// Table.
    pub table: Option<PartId>,
    /// Expr. WHERE condition.
    pub cond: Option<PartId>,
}

/// Set operation combining SELECTs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompoundType {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
    Except,
    ExceptAll,
}

impl CompoundType {
    pub fn as_str(self) -> &'static str {
        match self {
            CompoundType::Union => "UNION",
            CompoundType::UnionAll => "UNION ALL",
            CompoundType::Intersect => "INTERSECT",
            CompoundType::IntersectAll => "INTERSECT ALL",
            CompoundType::Except => "EXCEPT",
            CompoundType::ExceptAll => "EXCEPT ALL",
        }
    }
}

/// Contents of a compound statement: members are Select or Compound nodes.
#[derive(Clone, Debug)]
pub struct CompoundContents {
    pub compound_type: CompoundType,
    pub stmts: Vec<PartId>,
}

impl Default for CompoundContents {
    fn default() -> Self {
        CompoundContents {
            compound_type: CompoundType::Union,
            stmts: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IsolationLevel {
    Unknown,
    ReadCommitted,
    ReadUncommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            IsolationLevel::Unknown => "",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

/// Contents shared by the six transaction statement kinds. Savepoint kinds
/// require `trans_name`; the others treat every field as optional.
#[derive(Clone, Debug)]
pub struct TransactionContents {
    pub isolation_level: IsolationLevel,
    pub trans_mode: Option<String>,
    pub trans_name: Option<String>,
}

impl Default for TransactionContents {
    fn default() -> Self {
        TransactionContents {
            isolation_level: IsolationLevel::Unknown,
            trans_mode: None,
            trans_name: None,
        }
    }
}

/// Contents of an unparsed statement: the raw token run, held as a list of
/// Expr nodes (literals, identifiers and parameter placeholders).
#[derive(Clone, Debug, Default)]
pub struct UnknownContents {
    /// Expr list.
    pub expressions: Vec<PartId>,
}
