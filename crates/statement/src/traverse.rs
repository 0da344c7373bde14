//! Tree traversal.
//!
//! [`foreach`] visits every node of a subtree in post order: all children of
//! a node are visited (recursively) before the node itself, children in
//! clause order. The visitor returns a `Result`; the first error aborts the
//! walk and is returned to the caller. The structural checker, the binder
//! and the unbinder are all built on this walk, so they agree on which
//! nodes a statement contains.

use crate::ast::{Part, PartId, Tree};
use crate::error::Result;

/// The child ids of one node, in clause order.
pub fn child_parts(tree: &Tree, id: PartId) -> Vec<PartId> {
    let mut out = Vec::new();
    match tree.part(id) {
        Part::Select(s) => {
            out.extend(s.distinct_expr);
            out.extend_from_slice(&s.fields);
            out.extend(s.from);
            out.extend(s.where_cond);
            out.extend_from_slice(&s.group_by);
            out.extend(s.having_cond);
            out.extend_from_slice(&s.order_by);
            out.extend(s.limit_count);
            out.extend(s.limit_offset);
        }
        Part::Insert(i) => {
            out.extend(i.table);
            out.extend_from_slice(&i.fields);
            for row in &i.values_list {
                out.extend_from_slice(row);
            }
            out.extend(i.select);
        }
        Part::Update(u) => {
            out.extend(u.table);
            out.extend_from_slice(&u.fields);
            out.extend_from_slice(&u.expr_list);
            out.extend(u.cond);
        }
        Part::Delete(d) => {
            out.extend(d.table);
            out.extend(d.cond);
        }
        Part::Compound(c) => out.extend_from_slice(&c.stmts),
        Part::Begin(_)
        | Part::Commit(_)
        | Part::Rollback(_)
        | Part::Savepoint(_)
        | Part::RollbackSavepoint(_)
        | Part::DeleteSavepoint(_) => {}
        Part::Unknown(u) => out.extend_from_slice(&u.expressions),
        Part::Expr(e) => {
            out.extend(e.func);
            out.extend(e.cond);
            out.extend(e.select);
            out.extend(e.case_expr);
        }
        Part::Field(_) | Part::Table(_) => {}
        Part::Function(f) => out.extend_from_slice(&f.args_list),
        Part::Operation(o) => out.extend_from_slice(&o.operands),
        Part::Case(c) => {
            out.extend(c.base_expr);
            out.extend_from_slice(&c.when_list);
            out.extend_from_slice(&c.then_list);
            out.extend(c.else_expr);
        }
        Part::SelectField(f) => out.extend(f.expr),
        Part::SelectTarget(t) => out.extend(t.expr),
        Part::SelectJoin(j) => {
            out.extend(j.cond);
            out.extend_from_slice(&j.using);
        }
        Part::SelectFrom(f) => {
            out.extend_from_slice(&f.targets);
            out.extend_from_slice(&f.joins);
        }
        Part::SelectOrder(o) => out.extend(o.expr),
    }
    out
}

/// Post-order walk over the subtree rooted at `root`.
pub fn foreach<F>(tree: &Tree, root: PartId, f: &mut F) -> Result<()>
where
    F: FnMut(&Tree, PartId) -> Result<()>,
{
    for child in child_parts(tree, root) {
        foreach(tree, child, f)?;
    }
    f(tree, root)
}

/// Post-order walk with mutable access to the tree. The child list is
/// snapshotted before descending, so a visitor must not restructure the
/// subtree it is being called on.
pub fn foreach_mut<F>(tree: &mut Tree, root: PartId, f: &mut F) -> Result<()>
where
    F: FnMut(&mut Tree, PartId) -> Result<()>,
{
    for child in child_parts(tree, root) {
        foreach_mut(tree, child, f)?;
    }
    f(tree, root)
}
