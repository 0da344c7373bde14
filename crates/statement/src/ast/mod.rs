//! Statement trees.
//!
//! A statement is stored as a flat arena of [`Node`]s. Every node carries a
//! [`Part`] payload and an optional parent link; parts reference their
//! children by [`PartId`], so the arena owns every allocation and parent
//! links never form ownership cycles.

pub mod contents;
pub mod parts;

pub use contents::{
    CompoundContents, CompoundType, DeleteContents, InsertContents, IsolationLevel,
    SelectContents, TransactionContents, UnknownContents, UpdateContents,
};
pub use parts::{
    CaseExpr, Expr, Field, Function, JoinType, Operation, Operator, ParamSpec, SelectField,
    SelectFrom, SelectJoin, SelectOrder, SelectTarget, Table,
};

use std::fmt;

/// Discriminates every node a statement tree can hold: the twelve statement
/// kinds plus the eleven part kinds that appear below them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Statement kinds
    Select,
    Insert,
    Update,
    Delete,
    Compound,
    Begin,
    Commit,
    Rollback,
    Savepoint,
    RollbackSavepoint,
    DeleteSavepoint,
    Unknown,
    // Part kinds
    Expr,
    Field,
    Table,
    Function,
    Operation,
    Case,
    SelectField,
    SelectTarget,
    SelectJoin,
    SelectFrom,
    SelectOrder,
}

impl NodeKind {
    /// Whether this kind is a statement kind (one that can be the root of a
    /// statement) rather than a part kind.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Select
                | NodeKind::Insert
                | NodeKind::Update
                | NodeKind::Delete
                | NodeKind::Compound
                | NodeKind::Begin
                | NodeKind::Commit
                | NodeKind::Rollback
                | NodeKind::Savepoint
                | NodeKind::RollbackSavepoint
                | NodeKind::DeleteSavepoint
                | NodeKind::Unknown
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Index of a node within its [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub(crate) u32);

impl PartId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// One node of a statement tree: a payload plus a parent link.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) part: Part,
    pub(crate) parent: Option<PartId>,
}

/// The payload of a tree node. Statement contents and clause parts share the
/// same arena, so nested statements (a sub-SELECT inside an expression, the
/// members of a compound) are ordinary nodes.
#[derive(Clone, Debug)]
pub enum Part {
    Select(SelectContents),
    Insert(InsertContents),
    Update(UpdateContents),
    Delete(DeleteContents),
    Compound(CompoundContents),
    Begin(TransactionContents),
    Commit(TransactionContents),
    Rollback(TransactionContents),
    Savepoint(TransactionContents),
    RollbackSavepoint(TransactionContents),
    DeleteSavepoint(TransactionContents),
    Unknown(UnknownContents),
    Expr(Expr),
    Field(Field),
    Table(Table),
    Function(Function),
    Operation(Operation),
    Case(CaseExpr),
    SelectField(SelectField),
    SelectTarget(SelectTarget),
    SelectJoin(SelectJoin),
    SelectFrom(SelectFrom),
    SelectOrder(SelectOrder),
}

impl Part {
    pub fn kind(&self) -> NodeKind {
        match self {
            Part::Select(_) => NodeKind::Select,
            Part::Insert(_) => NodeKind::Insert,
            Part::Update(_) => NodeKind::Update,
            Part::Delete(_) => NodeKind::Delete,
            Part::Compound(_) => NodeKind::Compound,
            Part::Begin(_) => NodeKind::Begin,
            Part::Commit(_) => NodeKind::Commit,
            Part::Rollback(_) => NodeKind::Rollback,
            Part::Savepoint(_) => NodeKind::Savepoint,
            Part::RollbackSavepoint(_) => NodeKind::RollbackSavepoint,
            Part::DeleteSavepoint(_) => NodeKind::DeleteSavepoint,
            Part::Unknown(_) => NodeKind::Unknown,
            Part::Expr(_) => NodeKind::Expr,
            Part::Field(_) => NodeKind::Field,
            Part::Table(_) => NodeKind::Table,
            Part::Function(_) => NodeKind::Function,
            Part::Operation(_) => NodeKind::Operation,
            Part::Case(_) => NodeKind::Case,
            Part::SelectField(_) => NodeKind::SelectField,
            Part::SelectTarget(_) => NodeKind::SelectTarget,
            Part::SelectJoin(_) => NodeKind::SelectJoin,
            Part::SelectFrom(_) => NodeKind::SelectFrom,
            Part::SelectOrder(_) => NodeKind::SelectOrder,
        }
    }
}

/// Arena holding the nodes of one statement.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Tree::default()
    }

    /// Appends a node and returns its id. The parent link is purely
    /// navigational; the parent's contents must reference the child
    /// separately for it to be reachable by traversal.
    pub fn push(&mut self, parent: Option<PartId>, part: Part) -> PartId {
        let id = PartId(self.nodes.len() as u32);
        self.nodes.push(Node { part, parent });
        id
    }

    pub fn part(&self, id: PartId) -> &Part {
        &self.nodes[id.index()].part
    }

    pub fn part_mut(&mut self, id: PartId) -> &mut Part {
        &mut self.nodes[id.index()].part
    }

    pub fn parent(&self, id: PartId) -> Option<PartId> {
        self.nodes[id.index()].parent
    }

    pub fn kind(&self, id: PartId) -> NodeKind {
        self.part(id).kind()
    }

    /// Walks parent links from `id` (exclusive) to the root, returning the
    /// first ancestor of the requested kind.
    pub fn ancestor_of_kind(&self, id: PartId, kind: NodeKind) -> Option<PartId> {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if self.kind(p) == kind {
                return Some(p);
            }
            cur = self.parent(p);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
